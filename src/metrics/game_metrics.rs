use std::time::{Duration, Instant};

use crate::game::CollisionType;

/// Session metrics shown while a human plays
///
/// Survives restarts: only the round timer is reset when a new game begins.
pub struct GameMetrics {
    round_started: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub longest_snake: usize,
    pub games_played: u32,
    pub border_deaths: u32,
    pub self_collisions: u32,
    /// What ended the most recent game
    pub last_collision: Option<CollisionType>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            longest_snake: 0,
            games_played: 0,
            border_deaths: 0,
            self_collisions: 0,
            last_collision: None,
        }
    }

    /// Refresh the round timer
    pub fn update(&mut self) {
        self.elapsed_time = self.round_started.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.round_started = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.last_collision = None;
    }

    /// Fold a finished game into the session totals
    pub fn on_game_over(&mut self, score: u32, length: usize, cause: Option<CollisionType>) {
        self.games_played += 1;
        self.high_score = self.high_score.max(score);
        self.longest_snake = self.longest_snake.max(length);

        match cause {
            Some(CollisionType::Border) => self.border_deaths += 1,
            Some(CollisionType::SelfCollision) => self.self_collisions += 1,
            None => {}
        }
        self.last_collision = cause;
    }

    /// Round time as `MM:SS`
    pub fn format_time(&self) -> String {
        let secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Short description of how the last game ended
    pub fn describe_last_collision(&self) -> &'static str {
        match self.last_collision {
            Some(CollisionType::Border) => "hit the wall",
            Some(CollisionType::SelfCollision) => "ran into itself",
            None => "",
        }
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        let mut metrics = GameMetrics::new();

        for (secs, expected) in [(0, "00:00"), (59, "00:59"), (125, "02:05"), (3661, "61:01")] {
            metrics.elapsed_time = Duration::from_secs(secs);
            assert_eq!(metrics.format_time(), expected);
        }
    }

    #[test]
    fn test_session_bests_only_grow() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10, 12, Some(CollisionType::Border));
        metrics.on_game_over(5, 7, Some(CollisionType::SelfCollision));

        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.longest_snake, 12);

        metrics.on_game_over(15, 17, Some(CollisionType::Border));
        assert_eq!(metrics.high_score, 15);
        assert_eq!(metrics.longest_snake, 17);
    }

    #[test]
    fn test_collision_causes_are_counted() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(0, 2, Some(CollisionType::Border));
        metrics.on_game_over(1, 3, Some(CollisionType::Border));
        metrics.on_game_over(4, 6, Some(CollisionType::SelfCollision));

        assert_eq!(metrics.border_deaths, 2);
        assert_eq!(metrics.self_collisions, 1);
        assert_eq!(metrics.describe_last_collision(), "ran into itself");

        metrics.on_game_start();
        assert_eq!(metrics.last_collision, None);
        assert_eq!(metrics.describe_last_collision(), "");
        // Totals survive a restart
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_game_start_resets_round_timer() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();
        assert!(metrics.elapsed_time >= Duration::from_millis(50));

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time < Duration::from_millis(50));
    }
}

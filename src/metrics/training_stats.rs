//! Rolling statistics for the training log

use std::collections::VecDeque;

/// Fixed-length window of recent values
#[derive(Debug, Clone)]
struct Window {
    values: VecDeque<f32>,
    len: usize,
}

impl Window {
    fn new(len: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(len),
            len,
        }
    }

    fn push(&mut self, value: f32) {
        if self.values.len() >= self.len {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// 0.0 while empty
    fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }
}

/// Per-episode outcomes averaged over the last `window_size` episodes
///
/// Totals and the best score cover the whole run.
///
/// ```rust
/// use q_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(-25.0, 40, 1);
/// stats.record_loss(12.5);
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert!(stats.format_summary().contains("Loss: 12.5000"));
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    rewards: Window,
    lengths: Window,
    scores: Window,
    /// Mean TD loss of each episode that replayed anything
    losses: Window,
    total_episodes: usize,
    total_steps: usize,
    best_score: u32,
    window_size: usize,
}

impl TrainingStats {
    pub fn new(window_size: usize) -> Self {
        Self {
            rewards: Window::new(window_size),
            lengths: Window::new(window_size),
            scores: Window::new(window_size),
            losses: Window::new(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            window_size,
        }
    }

    /// Record a finished episode: summed reward, steps taken and food eaten
    pub fn record_episode(&mut self, reward: f32, length: usize, score: u32) {
        self.rewards.push(reward);
        self.lengths.push(length as f32);
        self.scores.push(score as f32);
        self.total_episodes += 1;
        self.total_steps += length;
        self.best_score = self.best_score.max(score);
    }

    pub fn record_loss(&mut self, loss: f32) {
        self.losses.push(loss);
    }

    pub fn mean_episode_reward(&self) -> f32 {
        self.rewards.mean()
    }

    pub fn mean_episode_length(&self) -> f32 {
        self.lengths.mean()
    }

    /// Mean food eaten per episode
    pub fn mean_episode_score(&self) -> f32 {
        self.scores.mean()
    }

    pub fn mean_loss(&self) -> f32 {
        self.losses.mean()
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One log line, e.g.
    /// `Episodes: 1 | Steps: 40 | Reward: -25.00 | Score: 1.00 | Best: 1 | Len: 40.0 | Loss: 12.5000`
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | Loss: {:.4}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            self.mean_loss(),
        )
    }
}

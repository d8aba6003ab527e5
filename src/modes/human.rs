use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Direction, GameConfig, GridEnvironment};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-driven play on the same grid world the agent trains in
pub struct HumanMode {
    env: GridEnvironment,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Latest requested turn, consumed by the next game tick
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let env = match seed {
            Some(seed) => GridEnvironment::with_seed(config, seed)?,
            None => GridEnvironment::new(config, StdRng::from_entropy())?,
        };

        Ok(Self {
            env,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        if let Err(err) = execute!(stderr, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("Failed to enter alternate screen");
        }
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(std::io::stderr(), LeaveAlternateScreen);
                return Err(err).context("Failed to create terminal");
            }
        };

        let result = self.run_game_loop(&mut terminal).await;

        // Restore the terminal before any loop error reaches the caller
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let mut event_stream = EventStream::new();

        // Game ticks at 8 Hz (125ms per tick)
        let mut tick_timer = interval(Duration::from_millis(125));

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    if self.env.is_running() {
                        self.update_game()?;
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.env, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.pending_direction = Some(direction);
                }
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Direction for the next step: the latest key press, or straight ahead
    fn next_direction(&mut self) -> Direction {
        self.pending_direction
            .take()
            .unwrap_or(self.env.snake().heading)
    }

    fn update_game(&mut self) -> Result<()> {
        let probability = self.env.config().food_probability;
        self.env.generate_food(probability);

        let direction = self.next_direction();
        let result = self.env.step(direction)?;

        if result.done {
            self.metrics.on_game_over(
                self.env.score(),
                self.env.snake().len(),
                result.info.collision_type,
            );
        }

        Ok(())
    }

    fn reset_game(&mut self) {
        self.env.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::default(), Some(5)).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.env.is_running());
        assert_eq!(mode.env.score(), 0);
        assert_eq!(mode.env.snake().len(), 2);
        assert!(mode.pending_direction.is_none());
    }

    #[test]
    fn test_latest_key_press_wins() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Up));
        mode.handle_event(key(KeyCode::Down));
        assert_eq!(mode.pending_direction, Some(Direction::Down));

        mode.update_game().unwrap();
        assert_eq!(mode.env.snake().heading, Direction::Down);
        // The press is consumed by the tick
        assert!(mode.pending_direction.is_none());
    }

    #[test]
    fn test_no_key_press_keeps_heading() {
        let mut mode = mode();
        let head = mode.env.snake().head;

        mode.update_game().unwrap();

        assert_eq!(mode.env.snake().heading, Direction::Right);
        assert_eq!(mode.env.snake().head, head.moved_in_direction(Direction::Right));
    }

    #[test]
    fn test_reverse_request_is_ignored() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Left));

        mode.update_game().unwrap();

        assert!(mode.env.is_running());
        assert_eq!(mode.env.snake().heading, Direction::Right);
    }

    #[test]
    fn test_game_over_is_recorded_and_reset_restarts() {
        let mut mode = mode();
        // Head starts one row below the top border
        mode.handle_event(key(KeyCode::Up));
        mode.update_game().unwrap();
        mode.update_game().unwrap();

        assert!(!mode.env.is_running());
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.border_deaths, 1);

        mode.handle_event(key(KeyCode::Char('r')));
        assert!(mode.env.is_running());
        assert_eq!(mode.env.steps(), 0);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}

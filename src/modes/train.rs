//! Training mode for the Q-learning agent
//!
//! Runs episodes in the grid world, storing every transition in replay memory
//! and updating the value network on a random minibatch after each step.
//!
//! # Example
//!
//! ```rust,ignore
//! use q_snake::modes::{TrainMode, TrainConfig};
//! use q_snake::rl::{default_device, TrainingBackend};
//!
//! let train_config = TrainConfig {
//!     num_episodes: 500,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let device = default_device();
//! let mut train_mode = TrainMode::<TrainingBackend>::new(train_config, device)?;
//! train_mode.run()?;
//! ```

use anyhow::{anyhow, Context, Result};
use burn::tensor::backend::Backend;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{
    get_action, Experience, QLearningConfig, ReplayMemory, SnakeEnvironment, ValueNetwork,
};

/// Configuration for training mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Print the board after every step
    pub render: bool,

    /// Pause after each rendered frame
    pub render_delay_ms: u64,

    /// Stop an episode after this many steps even if the snake is alive
    ///
    /// `None` lets an episode run until the snake collides.
    pub max_episode_steps: Option<usize>,

    /// Seed for every RNG in the run; entropy when absent
    pub seed: Option<u64>,

    /// Game configuration (grid size, food, rewards)
    pub game_config: GameConfig,

    /// Q-learning hyperparameters
    pub q_config: QLearningConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1000,
            log_frequency: 100,
            render: false,
            render_delay_ms: 50,
            max_episode_steps: None,
            seed: None,
            game_config: GameConfig::default(),
            q_config: QLearningConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    ///
    /// # Example
    ///
    /// ```rust
    /// use q_snake::modes::TrainConfig;
    ///
    /// let config = TrainConfig::new(10000);
    /// assert_eq!(config.num_episodes, 10000);
    /// ```
    pub fn new(num_episodes: usize) -> Self {
        Self {
            num_episodes,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Check every nested configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.log_frequency == 0 {
            return Err("log_frequency must be positive".to_string());
        }
        if self.max_episode_steps == Some(0) {
            return Err("max_episode_steps must be positive when set".to_string());
        }
        self.game_config.validate()?;
        self.q_config.validate()
    }
}

/// Outcome of one training episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    /// Sum of step rewards
    pub reward: f32,
    /// Steps taken
    pub steps: usize,
    /// Food eaten
    pub score: u32,
    /// Mean TD loss over every replayed transition, if any were replayed
    pub mean_loss: Option<f32>,
    /// Exploration rate after the episode's per-step decay
    pub epsilon: f64,
}

/// Training mode for the Q-learning agent
///
/// Owns the environment, network, replay memory and RNG of one run.
pub struct TrainMode<B: Backend> {
    /// Grid world the agent acts in
    env: SnakeEnvironment<B>,

    /// Value network being trained
    network: ValueNetwork<B>,

    /// Replay memory of past transitions
    memory: ReplayMemory<B>,

    /// Exploration and minibatch sampling
    rng: StdRng,

    /// Training statistics tracker
    stats: TrainingStats,

    /// Training configuration
    config: TrainConfig,

    /// Current exploration rate
    epsilon: f64,
}

impl<B: Backend> TrainMode<B> {
    /// Create a new training mode
    ///
    /// All RNGs of the run are derived from `config.seed`, so a fixed seed
    /// reproduces the run exactly.
    pub fn new(config: TrainConfig, device: B::Device) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid training configuration: {e}"))?;

        let mut seed_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let env_rng = StdRng::seed_from_u64(seed_rng.gen());
        let env = SnakeEnvironment::new(config.game_config.clone(), env_rng, device.clone())?;

        let input_size = config.game_config.grid_width * config.game_config.grid_height;
        let network = ValueNetwork::new(
            input_size,
            config.q_config.hidden_size,
            &mut seed_rng,
            &device,
        );

        let memory = ReplayMemory::new(config.q_config.replay_capacity);
        let rng = StdRng::seed_from_u64(seed_rng.gen());

        // Stats tracker (100-episode rolling window)
        let stats = TrainingStats::new(100);

        Ok(Self {
            env,
            network,
            memory,
            rng,
            stats,
            epsilon: config.q_config.epsilon_start,
            config,
        })
    }

    /// Run the configured number of episodes
    pub fn run(&mut self) -> Result<()> {
        self.print_header();
        self.run_training(self.config.num_episodes)?;

        tracing::info!("Training complete");
        tracing::info!("Final statistics: {}", self.stats.format_summary());

        Ok(())
    }

    /// Train for `n_episodes`, resetting the world before each one
    ///
    /// There is no early stopping; every episode in the budget is played.
    pub fn run_training(&mut self, n_episodes: usize) -> Result<()> {
        for episode in 0..n_episodes {
            self.env.reset();

            let report = self.run_episode(self.epsilon)?;
            self.epsilon = report.epsilon;

            self.stats
                .record_episode(report.reward, report.steps, report.score);
            if let Some(loss) = report.mean_loss {
                self.stats.record_loss(loss);
            }

            tracing::debug!(
                episode = episode + 1,
                reward = report.reward,
                steps = report.steps,
                score = report.score,
                epsilon = report.epsilon,
                "episode finished"
            );

            if (episode + 1) % self.config.log_frequency == 0 {
                self.print_progress(episode + 1, n_episodes);
            }
        }

        Ok(())
    }

    /// Play one episode from the current state, learning after every step
    ///
    /// `epsilon` is decayed after each step and the decayed value is returned
    /// in the report. The environment is not reset here.
    pub fn run_episode(&mut self, epsilon: f64) -> Result<EpisodeReport> {
        let q_config = self.config.q_config.clone();
        let food_probability = self.config.game_config.food_probability;

        let mut epsilon = epsilon;
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;
        let mut loss_sum = 0.0;
        let mut loss_count = 0usize;

        while self.env.is_running() {
            if self
                .config
                .max_episode_steps
                .is_some_and(|max| episode_steps >= max)
            {
                break;
            }

            self.env.generate_food(food_probability);

            let old_state = self.env.encode()?;
            let q_values = self.network.forward(&old_state)?;
            let action = get_action(&q_values, epsilon, &mut self.rng);

            let result = self.env.step(action)?;
            let new_state = self.env.encode()?;

            self.memory.push(Experience {
                old_state,
                new_state,
                action,
                reward: result.reward,
                done: result.done,
            });

            for experience in self.memory.sample_batch(q_config.batch_size, &mut self.rng) {
                loss_sum += self
                    .network
                    .train_step(experience, q_config.gamma, q_config.learning_rate)?;
                loss_count += 1;
            }

            episode_reward += result.reward;
            episode_steps += 1;
            epsilon *= q_config.epsilon_decay;

            if self.config.render {
                self.render();
            }
        }

        let mean_loss = (loss_count > 0).then(|| loss_sum / loss_count as f32);

        Ok(EpisodeReport {
            reward: episode_reward,
            steps: episode_steps,
            score: self.env.grid().score(),
            mean_loss,
            epsilon,
        })
    }

    /// Print the board and pause so a person can follow along
    fn render(&self) {
        println!("{}", self.env.grid());
        std::thread::sleep(Duration::from_millis(self.config.render_delay_ms));
    }

    pub fn env(&self) -> &SnakeEnvironment<B> {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut SnakeEnvironment<B> {
        &mut self.env
    }

    pub fn network(&self) -> &ValueNetwork<B> {
        &self.network
    }

    pub fn memory(&self) -> &ReplayMemory<B> {
        &self.memory
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Get the current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Log training header information
    fn print_header(&self) {
        let game = &self.config.game_config;
        let q = &self.config.q_config;
        tracing::info!("Q-learning training - Snake");
        tracing::info!("Episodes: {}", self.config.num_episodes);
        tracing::info!(
            "Game config: {}x{} grid, max food {}, food probability {}",
            game.grid_width,
            game.grid_height,
            game.max_food,
            game.food_probability
        );
        tracing::info!(
            "Q-learning config: hidden {}, learning rate {}, gamma {}, batch {}, memory {}",
            q.hidden_size,
            q.learning_rate,
            q.gamma,
            q.batch_size,
            q.replay_capacity
        );
        tracing::info!(
            "Exploration: epsilon {} decaying by {} per step",
            q.epsilon_start,
            q.epsilon_decay
        );
        match self.config.seed {
            Some(seed) => tracing::info!("Seed: {seed}"),
            None => tracing::info!("Seed: from entropy"),
        }
    }

    /// Log training progress
    fn print_progress(&self, episode: usize, n_episodes: usize) {
        tracing::info!(
            "[Episode {}/{}] {} | Epsilon: {:.4}",
            episode,
            n_episodes,
            self.stats.format_summary(),
            self.epsilon
        );
    }
}

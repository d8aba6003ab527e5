//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Q-learning agent
///
/// Defaults are the values the agent was tuned with on a 10×10 board.
///
/// # Example
///
/// ```rust
/// use q_snake::rl::QLearningConfig;
///
/// // Use default hyperparameters
/// let config = QLearningConfig::default();
/// assert_eq!(config.hidden_size, 48);
///
/// // Or customize specific parameters
/// let config = QLearningConfig {
///     learning_rate: 0.01,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Width of the hidden layer
    ///
    /// Default: 48
    pub hidden_size: usize,

    /// Step size for plain stochastic gradient descent
    ///
    /// Default: 0.1
    pub learning_rate: f32,

    /// Discount factor for the Bellman target
    ///
    /// Default: 0.3
    pub gamma: f32,

    /// Number of replayed transitions trained on after every environment step
    ///
    /// Fewer are used while the replay memory holds less than this.
    ///
    /// Default: 7
    pub batch_size: usize,

    /// Capacity of the replay memory
    ///
    /// Default: 1000
    pub replay_capacity: usize,

    /// Exploration rate at the start of training
    ///
    /// Default: 1.0
    pub epsilon_start: f64,

    /// Multiplicative decay applied to epsilon after every step
    ///
    /// Default: 0.999
    pub epsilon_decay: f64,
}

impl QLearningConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.hidden_size == 0 {
            return Err("hidden_size must be at least 1".to_string());
        }

        if !(self.learning_rate > 0.0) {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.replay_capacity == 0 {
            return Err("replay_capacity must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return Err(format!(
                "epsilon_start must be in [0, 1], got {}",
                self.epsilon_start
            ));
        }

        if !(0.0..=1.0).contains(&self.epsilon_decay) {
            return Err(format!(
                "epsilon_decay must be in [0, 1], got {}",
                self.epsilon_decay
            ));
        }

        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            hidden_size: 48,
            learning_rate: 0.1,
            gamma: 0.3,
            batch_size: 7,
            replay_capacity: 1000,
            epsilon_start: 1.0,
            epsilon_decay: 0.999,
        }
    }
}

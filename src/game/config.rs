use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid, border included
    pub grid_width: usize,
    /// Height of the game grid, border included
    pub grid_height: usize,
    /// Maximum number of food cells on the board at once
    pub max_food: usize,
    /// Chance per tick that a food spawn is attempted
    pub food_probability: f64,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Reward for an ordinary move
    pub step_penalty: f32,
    /// Penalty for dying
    pub death_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 10,
            grid_height: 10,
            max_food: 1,
            food_probability: 0.2,
            food_reward: 100.0,
            step_penalty: -1.0,
            death_penalty: -500.0,
        }
    }
}

impl GameConfig {
    /// Smallest grid that still fits the border ring plus the starting snake
    pub const MIN_WIDTH: usize = 6;
    pub const MIN_HEIGHT: usize = 4;

    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < Self::MIN_WIDTH || self.grid_height < Self::MIN_HEIGHT {
            return Err(format!(
                "grid must be at least {}x{}, got {}x{}",
                Self::MIN_WIDTH,
                Self::MIN_HEIGHT,
                self.grid_width,
                self.grid_height
            ));
        }

        if !(0.0..=1.0).contains(&self.food_probability) {
            return Err(format!(
                "food_probability must be in [0, 1], got {}",
                self.food_probability
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 10);
        assert_eq!(config.grid_height, 10);
        assert_eq!(config.max_food, 1);
        assert_eq!(config.food_reward, 100.0);
        assert_eq!(config.step_penalty, -1.0);
        assert_eq!(config.death_penalty, -500.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.max_food, 1);
    }

    #[test]
    fn test_validation_rejects_tiny_grid() {
        assert!(GameConfig::new(5, 10).validate().is_err());
        assert!(GameConfig::new(10, 3).validate().is_err());
        assert!(GameConfig::new(6, 4).validate().is_ok());
    }

    #[test]
    fn test_validation_food_probability() {
        let mut config = GameConfig::default();
        config.food_probability = 1.5;
        assert!(config.validate().is_err());

        config.food_probability = -0.1;
        assert!(config.validate().is_err());
    }
}

use anyhow::{anyhow, Result};
use burn::tensor::backend::Backend;

use super::matrix::Matrix;
use super::observation::create_observation;
use crate::game::{Direction, GameConfig, GridEnvironment, StepResult};
use rand::rngs::StdRng;

/// Snake environment for reinforcement learning
///
/// Wraps the grid world and provides:
/// - Matrix observations shaped like the board
/// - Discrete action space (4 actions: Up, Down, Left, Right)
/// - Standard RL interface (reset, step)
pub struct SnakeEnvironment<B: Backend> {
    grid: GridEnvironment,
    device: B::Device,
}

impl<B: Backend> SnakeEnvironment<B> {
    /// Create a new Snake environment
    pub fn new(config: GameConfig, rng: StdRng, device: B::Device) -> Result<Self> {
        Ok(Self {
            grid: GridEnvironment::new(config, rng)?,
            device,
        })
    }

    /// Reset the environment in place
    pub fn reset(&mut self) {
        self.grid.reset();
    }

    /// Encode the current board for the network
    ///
    /// Returns: matrix with shape [height, width]
    pub fn encode(&self) -> Result<Matrix<B>> {
        create_observation(self.grid.board(), &self.device)
    }

    /// Step the environment with a discrete action
    ///
    /// Actions:
    /// - 0: Move Up
    /// - 1: Move Down
    /// - 2: Move Left
    /// - 3: Move Right
    pub fn step(&mut self, action_idx: usize) -> Result<StepResult> {
        let direction = Direction::from_index(action_idx)
            .ok_or_else(|| anyhow!("action index {action_idx} is out of range"))?;
        self.grid.step(direction)
    }

    /// Maybe spawn food, see [`GridEnvironment::generate_food`]
    pub fn generate_food(&mut self, probability: f64) -> bool {
        self.grid.generate_food(probability)
    }

    pub fn is_running(&self) -> bool {
        self.grid.is_running()
    }

    /// Get the device used by this environment
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Get reference to the grid world
    pub fn grid(&self) -> &GridEnvironment {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridEnvironment {
        &mut self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Point;
    use crate::rl::matrix;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use rand::SeedableRng;

    type TestBackend = NdArray<f32>;

    fn env(config: GameConfig) -> SnakeEnvironment<TestBackend> {
        SnakeEnvironment::new(config, StdRng::seed_from_u64(3), NdArrayDevice::default()).unwrap()
    }

    #[test]
    fn test_environment_creation() {
        let env = env(GameConfig::default());

        assert!(env.is_running());
        assert_eq!(env.grid().score(), 0);
        assert_eq!(env.grid().steps(), 0);
    }

    #[test]
    fn test_encode_shape() {
        let env = env(GameConfig::new(12, 8));
        let obs = env.encode().unwrap();
        assert_eq!(matrix::shape(&obs), (8, 12));
    }

    #[test]
    fn test_step_with_directional_actions() {
        let mut env = env(GameConfig::small());

        for action_idx in 0..4 {
            env.reset();
            let result = env.step(action_idx).unwrap();
            assert!(result.reward.is_finite());
        }
    }

    #[test]
    fn test_invalid_action_is_an_error() {
        let mut env = env(GameConfig::small());
        assert!(env.step(4).is_err());
    }

    #[test]
    fn test_terminal_state_handling() {
        let mut env = env(GameConfig::small());
        env.grid_mut()
            .place_snake(&[Point::new(2, 5), Point::new(1, 5)], Direction::Left)
            .unwrap();

        let result = env.step(2).unwrap();

        assert!(result.done);
        assert!(!env.is_running());
    }

    #[test]
    fn test_observation_changes_after_step() {
        let mut env = env(GameConfig::small());

        let obs1 = matrix::to_vec(&env.encode().unwrap()).unwrap();
        env.step(3).unwrap();
        let obs2 = matrix::to_vec(&env.encode().unwrap()).unwrap();

        assert_ne!(obs1, obs2);
    }

    #[test]
    fn test_multiple_episodes() {
        let mut env = env(GameConfig::small());

        for _ in 0..2 {
            env.reset();
            let mut steps = 0;
            let mut done = false;

            // Heading Right forever hits the border within the grid width
            while !done && steps < 100 {
                done = env.step(3).unwrap().done;
                steps += 1;
            }

            assert!(done);
            assert!(steps <= 10);
        }
    }
}

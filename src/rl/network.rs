//! Two-layer Q-value network with a hand-written backward pass
//!
//! # Architecture
//!
//! ```text
//! Input: board matrix [H, W]
//!   ↓ Flatten: x [H*W, 1]
//!   ↓ z1 = W1·x + b1            W1 [hidden, H*W], b1 [hidden, 1]
//!   ↓ h  = ReLU(z1)
//!   ↓ q  = W2·h + b2            W2 [4, hidden],  b2 [4, 1]
//! Output: 4 raw Q-values (Up, Down, Left, Right)
//! ```
//!
//! [`ValueNetwork::forward_trace`] records every intermediate of that graph
//! and [`ValueNetwork::backward`] differentiates exactly those values, so a
//! gradient can always be checked against the forward pass that produced it.
//!
//! # Example
//!
//! ```rust
//! use q_snake::rl::{default_device, matrix, TrainingBackend, ValueNetwork};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let device = default_device();
//! let mut rng = StdRng::seed_from_u64(0);
//! let network = ValueNetwork::<TrainingBackend>::new(100, 48, &mut rng, &device);
//!
//! let board = matrix::zeros(10, 10, &device);
//! let q_values = network.forward(&board).unwrap();
//! assert_eq!(q_values.len(), 4);
//! ```

use anyhow::{ensure, Result};
use burn::tensor::{backend::Backend, Tensor, TensorData};
use rand::Rng;

use super::matrix::{self, Matrix};
use super::memory::Experience;
use crate::game::NUM_ACTIONS;

/// Intermediate values of one forward pass
#[derive(Debug, Clone)]
pub struct ForwardTrace<B: Backend> {
    /// Flattened input column [input, 1]
    pub input: Matrix<B>,
    /// Hidden pre-activation z1 [hidden, 1]
    pub hidden_pre: Matrix<B>,
    /// Hidden activation ReLU(z1) [hidden, 1]
    pub hidden: Matrix<B>,
    /// Q-values [4, 1]
    pub output: Matrix<B>,
}

/// Loss gradients for every parameter, shaped like the parameters
#[derive(Debug, Clone)]
pub struct Gradients<B: Backend> {
    pub w1: Matrix<B>,
    pub b1: Matrix<B>,
    pub w2: Matrix<B>,
    pub b2: Matrix<B>,
}

/// Dense → ReLU → dense network mapping a board to one Q-value per action
#[derive(Debug, Clone)]
pub struct ValueNetwork<B: Backend> {
    w1: Matrix<B>,
    b1: Matrix<B>,
    w2: Matrix<B>,
    b2: Matrix<B>,
}

impl<B: Backend> ValueNetwork<B> {
    /// Create a network with uniform ±1/√fan_in weights and zero biases
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        rng: &mut R,
        device: &B::Device,
    ) -> Self {
        let w1 = random_weights(hidden_size, input_size, rng, device);
        let w2 = random_weights(NUM_ACTIONS, hidden_size, rng, device);

        Self {
            w1,
            b1: matrix::zeros(hidden_size, 1, device),
            w2,
            b2: matrix::zeros(NUM_ACTIONS, 1, device),
        }
    }

    /// Assemble a network from explicit parameters
    pub fn from_parameters(
        w1: Matrix<B>,
        b1: Matrix<B>,
        w2: Matrix<B>,
        b2: Matrix<B>,
    ) -> Result<Self> {
        let (hidden, _input) = matrix::shape(&w1);
        ensure!(
            matrix::shape(&b1) == (hidden, 1),
            "b1 must be {hidden}x1, got {:?}",
            matrix::shape(&b1)
        );
        ensure!(
            matrix::shape(&w2) == (NUM_ACTIONS, hidden),
            "w2 must be {NUM_ACTIONS}x{hidden}, got {:?}",
            matrix::shape(&w2)
        );
        ensure!(
            matrix::shape(&b2) == (NUM_ACTIONS, 1),
            "b2 must be {NUM_ACTIONS}x1, got {:?}",
            matrix::shape(&b2)
        );
        Ok(Self { w1, b1, w2, b2 })
    }

    /// Forward pass keeping every intermediate
    pub fn forward_trace(&self, state: &Matrix<B>) -> Result<ForwardTrace<B>> {
        let input = matrix::flatten(state);
        let hidden_pre = matrix::add(&matrix::matmul(&self.w1, &input)?, &self.b1)?;
        let hidden = matrix::relu(&hidden_pre);
        let output = matrix::add(&matrix::matmul(&self.w2, &hidden)?, &self.b2)?;

        Ok(ForwardTrace {
            input,
            hidden_pre,
            hidden,
            output,
        })
    }

    /// Q-values for a board, indexed by action
    pub fn forward(&self, state: &Matrix<B>) -> Result<Vec<f32>> {
        let trace = self.forward_trace(state)?;
        matrix::to_vec(&trace.output)
    }

    /// Gradients of the loss given `output_grad` = dL/dq [4, 1]
    pub fn backward(&self, trace: &ForwardTrace<B>, output_grad: &Matrix<B>) -> Result<Gradients<B>> {
        // Layer 2
        let w2 = matrix::matmul(output_grad, &matrix::transpose(&trace.hidden))?;
        let b2 = matrix::copy(output_grad);
        let hidden_grad = matrix::matmul(&matrix::transpose(&self.w2), output_grad)?;

        // ReLU passes gradient only where z1 > 0
        let hidden_pre_grad =
            matrix::hadamard(&hidden_grad, &matrix::relu_mask(&trace.hidden_pre))?;

        // Layer 1
        let w1 = matrix::matmul(&hidden_pre_grad, &matrix::transpose(&trace.input))?;
        let b1 = hidden_pre_grad;

        Ok(Gradients { w1, b1, w2, b2 })
    }

    /// One plain SGD step: θ ← θ − lr·∇θ
    pub fn apply_gradients(&mut self, grads: &Gradients<B>, learning_rate: f32) -> Result<()> {
        self.w1 = matrix::scaled_sub(&self.w1, &grads.w1, learning_rate)?;
        self.b1 = matrix::scaled_sub(&self.b1, &grads.b1, learning_rate)?;
        self.w2 = matrix::scaled_sub(&self.w2, &grads.w2, learning_rate)?;
        self.b2 = matrix::scaled_sub(&self.b2, &grads.b2, learning_rate)?;
        Ok(())
    }

    /// Regression target for a transition
    ///
    /// Terminal transitions use the reward alone and never run the network on
    /// the next state.
    pub fn bellman_target(&self, experience: &Experience<B>, gamma: f32) -> Result<f32> {
        if experience.done {
            return Ok(experience.reward);
        }
        let next_q = self.forward(&experience.new_state)?;
        let best = next_q.into_iter().fold(f32::NEG_INFINITY, f32::max);
        Ok(experience.reward + gamma * best)
    }

    /// Q-learning update on a single transition
    ///
    /// Only the taken action's output receives gradient from
    /// `(Q[a] - target)^2`; the other three outputs get zero. Returns the loss
    /// measured before the update.
    pub fn train_step(
        &mut self,
        experience: &Experience<B>,
        gamma: f32,
        learning_rate: f32,
    ) -> Result<f32> {
        ensure!(
            experience.action < NUM_ACTIONS,
            "action index {} is out of range",
            experience.action
        );

        let trace = self.forward_trace(&experience.old_state)?;
        let q_values = matrix::to_vec(&trace.output)?;
        let target = self.bellman_target(experience, gamma)?;

        let error = q_values[experience.action] - target;
        let mut grad = vec![0.0; NUM_ACTIONS];
        grad[experience.action] = 2.0 * error;
        let output_grad = matrix::from_vec(grad, NUM_ACTIONS, 1, &trace.output.device())?;

        let grads = self.backward(&trace, &output_grad)?;
        self.apply_gradients(&grads, learning_rate)?;

        Ok(error * error)
    }

    pub fn input_size(&self) -> usize {
        matrix::shape(&self.w1).1
    }

    pub fn hidden_size(&self) -> usize {
        matrix::shape(&self.w1).0
    }

    pub fn w1(&self) -> &Matrix<B> {
        &self.w1
    }

    pub fn b1(&self) -> &Matrix<B> {
        &self.b1
    }

    pub fn w2(&self) -> &Matrix<B> {
        &self.w2
    }

    pub fn b2(&self) -> &Matrix<B> {
        &self.b2
    }
}

fn random_weights<B: Backend, R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    rng: &mut R,
    device: &B::Device,
) -> Matrix<B> {
    let bound = 1.0 / (cols.max(1) as f32).sqrt();
    let data: Vec<f32> = (0..rows * cols).map(|_| rng.gen_range(-bound..bound)).collect();
    Tensor::from_data(TensorData::new(data, [rows, cols]), device)
}

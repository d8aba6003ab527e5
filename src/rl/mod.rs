//! Reinforcement learning for the Snake grid world
//!
//! Provides:
//! - Board observations as single-channel matrices
//! - Shape-checked matrix primitives over Burn tensors
//! - A two-layer Q-value network with a hand-written backward pass
//! - A fixed-capacity replay memory
//! - Epsilon-greedy action selection

pub mod backend;
pub mod config;
pub mod environment;
pub mod matrix;
pub mod memory;
pub mod network;
pub mod observation;
pub mod policy;

pub use backend::{default_device, TrainingBackend};
pub use config::QLearningConfig;
pub use environment::SnakeEnvironment;
pub use memory::{Experience, ReplayMemory};
pub use network::{ForwardTrace, Gradients, ValueNetwork};
pub use observation::create_observation;
pub use policy::{argmax, get_action};

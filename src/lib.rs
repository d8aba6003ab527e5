//! Q Snake - a Snake grid world with a Q-learning agent
//!
//! This library provides:
//! - Core game logic: board, direction-map snake, rewards (game module)
//! - Q-learning: board encoding, value network with a manual backward pass,
//!   replay memory, epsilon-greedy policy (rl module)
//! - Training and human-play drivers (modes module)
//! - TUI rendering and keyboard input for human play (render, input modules)
//! - Training statistics and session metrics (metrics module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;

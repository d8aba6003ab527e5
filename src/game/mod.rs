//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is shared by human play and RL training.

pub mod action;
pub mod config;
pub mod engine;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, NUM_ACTIONS};
pub use config::GameConfig;
pub use engine::{CollisionType, EpisodeState, GridEnvironment, StepInfo, StepResult};
pub use snake::SnakeState;
pub use state::{Board, Cell, Point};

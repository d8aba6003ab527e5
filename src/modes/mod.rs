pub mod human;
pub mod train;

pub use human::HumanMode;
pub use train::{EpisodeReport, TrainConfig, TrainMode};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use q_snake::logging::init_logging;
use q_snake::modes::{HumanMode, TrainConfig, TrainMode};
use q_snake::rl::{default_device, TrainingBackend};

#[derive(Parser)]
#[command(name = "q_snake")]
#[command(version, about = "Snake grid world with a Q-learning agent")]
struct Cli {
    /// Run mode
    #[arg(long, value_enum, default_value = "train")]
    mode: Mode,

    /// Grid width, border included
    #[arg(long)]
    width: Option<usize>,

    /// Grid height, border included
    #[arg(long)]
    height: Option<usize>,

    /// Number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Seed for every RNG of the run
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with a training configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the board after every training step
    #[arg(long)]
    render: bool,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Train the Q-learning agent
    Train,
    /// Play snake with keyboard controls
    Human,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    fn train_config(&self) -> Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::from_json_file(path)?,
            None => TrainConfig::default(),
        };

        if let Some(width) = self.width {
            config.game_config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game_config.grid_height = height;
        }
        if let Some(episodes) = self.episodes {
            config.num_episodes = episodes;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.render {
            config.render = true;
        }

        Ok(config)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.train_config()?;

    match cli.mode {
        Mode::Train => {
            let device = default_device();
            let mut train_mode = TrainMode::<TrainingBackend>::new(config, device)?;
            train_mode.run()?;
        }
        Mode::Human => {
            let mut human_mode = HumanMode::new(config.game_config, config.seed)?;
            human_mode.run().await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    if let Err(err) = run(cli).await {
        tracing::error!("{err:#}");
        return Err(err);
    }

    Ok(())
}

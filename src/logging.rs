use anyhow::{Context, Result};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` selects what is shown; without it everything at `info` and above
/// is printed. Logs go to stderr so a rendered board on stdout stays intact.
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set up tracing subscriber")
}

//! Power BI Actions - command line entry point

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use types::diagnostics::debug_mode_from_env;

mod cli;
mod commands;

use cli::{Cli, LogFormat};

fn main() -> Result<()> {
    // Load .env file if it exists
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();
    let debug_mode = debug_mode_from_env();

    init_logging(cli.log_format, debug_mode)?;

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Could not load .env file: {}", e),
    }

    info!("Starting Power BI Actions v{}", env!("CARGO_PKG_VERSION"));

    commands::run(cli, debug_mode)
}

/// Initialize logging on stderr; stdout is reserved for command output
fn init_logging(format: LogFormat, debug_mode: bool) -> Result<()> {
    let default_level = if debug_mode { "debug" } else { "info" };
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        LogFormat::Json => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    debug!("Log level: {}", log_level);
    if debug_mode {
        debug!("DEBUG_MODE enabled - verbose diagnostics will be emitted");
    }

    Ok(())
}

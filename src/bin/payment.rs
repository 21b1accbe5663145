//! Payment demo.
//!
//! The transaction logger runs as a detached task while the payment status is
//! updated in `main`. When `main` returns the logger is cut off, finished or
//! not. Runs without arguments.

use anyhow::Result;
use clap::Parser;
use handoff::{cli::Cli, config::Config, logging, output::StdoutOutput, payment};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli).unwrap_or_else(|err| {
        logging::init("error");
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });
    logging::init(&config.log_level);
    info!(?config.payment, "Configuration loaded");

    payment::run(&config.payment, Arc::new(StdoutOutput::new())).await;

    Ok(())
}

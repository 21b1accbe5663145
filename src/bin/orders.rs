//! Order notification demo.
//!
//! Validated orders are handed one by one through a rendezvous channel to a
//! dispatcher that fans each out to email, push and SMS tasks. Runs without
//! arguments.

use anyhow::Result;
use clap::Parser;
use handoff::{cli::Cli, config::Config, logging, orders, output::StdoutOutput};
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
    info!(?config.orders, "Configuration loaded");

    orders::run(&config.orders, Arc::new(StdoutOutput::new())).await?;

    // Returning drops the runtime: any notification still pending is abandoned.
    Ok(())
}

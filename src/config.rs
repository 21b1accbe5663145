//! Configuration management for the demos.
//!
//! This module defines the main `Config` struct and its sub-structs. It uses the
//! `figment` crate to layer, in order: built-in defaults, an optional TOML file,
//! `HANDOFF_`-prefixed environment variables and command-line flags.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "handoff.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The logging level for diagnostics on stderr.
    pub log_level: String,
    /// Settings for the payment simulation.
    pub payment: PaymentConfig,
    /// Settings for the order notification simulation.
    pub orders: OrdersConfig,
}

/// Settings for the payment simulation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PaymentConfig {
    /// Steps of the status update run in the calling flow.
    pub status_steps: u32,
    /// Steps of the detached transaction logger.
    pub log_steps: u32,
    /// Delay after every step, in milliseconds.
    pub step_delay_ms: u64,
    /// Return without updating the status, leaving only the detached logger.
    pub skip_status_update: bool,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            status_steps: 5,
            log_steps: 5,
            step_delay_ms: 100,
            skip_status_update: false,
        }
    }
}

/// Settings for the order notification simulation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OrdersConfig {
    /// Users whose orders are validated, in order.
    pub users: Vec<String>,
    /// Pause after every this many orders. Zero disables pausing.
    pub batch_size: usize,
    /// Length of the pause between batches, in milliseconds.
    pub batch_delay_ms: u64,
    /// How long to linger after the last order before exiting, in milliseconds.
    pub grace_period_ms: u64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            users: ["adi", "budi", "caca", "dedi"]
                .into_iter()
                .map(String::from)
                .collect(),
            batch_size: 2,
            batch_delay_ms: 1000,
            grace_period_ms: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            payment: PaymentConfig::default(),
            orders: OrdersConfig::default(),
        }
    }
}

impl Config {
    /// Builds the layered `Figment` without extracting it.
    pub fn figment(cli: &Cli) -> Figment {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE).to_path_buf());

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // e.g. HANDOFF_ORDERS__BATCH_SIZE=3
            .merge(Env::prefixed("HANDOFF_").split("__"))
            .merge(cli.clone())
    }

    /// Loads the configuration from every source.
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config: Config = Self::figment(cli).extract()?;
        Ok(config)
    }
}

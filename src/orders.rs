//! The order notification simulation.
//!
//! A producer validates orders and hands them one at a time through a
//! rendezvous channel to a detached dispatcher, which fans every order out to
//! email, push and SMS notification tasks. Nothing waits for the dispatcher or
//! the notifications: after the last order the demo lingers for a grace period
//! and then returns, abandoning whatever is still running.

use crate::channel::rendezvous;
use crate::config::OrdersConfig;
use crate::dispatcher::Dispatcher;
use crate::notification::ConsoleNotifier;
use crate::output::SharedOutput;
use crate::producer::{BatchPolicy, Producer, ProducerReport};
use crate::task::spawn_detached;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Runs the order demo with `config`, writing status lines to `output`.
pub async fn run(config: &OrdersConfig, output: SharedOutput) -> Result<ProducerReport> {
    info!(
        users = config.users.len(),
        batch_size = config.batch_size,
        batch_delay_ms = config.batch_delay_ms,
        "Order simulation starting"
    );

    let (tx, rx) = rendezvous::<String>();

    // The shutdown sender is never signalled. The dispatcher keeps receiving
    // until this function returns and drops `tx`, which closes the channel; in
    // the binary that is also the moment the runtime goes away.
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let notifier = Arc::new(ConsoleNotifier::new(output.clone()));
    let dispatcher = Dispatcher::new(notifier, output.clone());
    spawn_detached(async move {
        dispatcher.run(rx, shutdown_rx).await;
    });

    let policy = BatchPolicy::new(
        config.batch_size,
        Duration::from_millis(config.batch_delay_ms),
    );
    let report = Producer::new(output, policy)
        .run(config.users.iter().cloned(), &tx)
        .await
        .map_err(|e| anyhow::anyhow!("order for {} was not delivered: {}", e.0, e))?;

    // Demo only: gives detached notification tasks a chance to run. It is not a
    // completion guarantee.
    tokio::time::sleep(Duration::from_millis(config.grace_period_ms)).await;

    info!(sent = report.sent, pauses = report.pauses, "Order simulation finished");
    Ok(report)
}

//! The payment simulation: logging a transaction in the background while the
//! payment status is updated in the calling flow.
//!
//! The background logger is detached. Nothing waits for it, so when the
//! calling flow finishes first and the process exits, logging is cut off.

use crate::config::PaymentConfig;
use crate::output::SharedOutput;
use crate::task::spawn_detached;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Runs `steps` numbered steps of `activity`, sleeping `delay` after each.
async fn run_steps(output: &SharedOutput, activity: &str, steps: u32, delay: Duration) {
    for step in 1..=steps {
        output.write_line(&format!("{}... [step {}]", activity, step));
        if step == steps {
            output.write_line(&format!("[done] {}", activity));
        }
        tokio::time::sleep(delay).await;
    }
}

/// Logs the transaction step by step.
pub async fn log_transaction(output: SharedOutput, steps: u32, delay: Duration) {
    run_steps(&output, "Logging transaction", steps, delay).await;
}

/// Updates the payment status step by step.
pub async fn update_payment_status(output: SharedOutput, steps: u32, delay: Duration) {
    run_steps(&output, "Updating payment status", steps, delay).await;
}

/// Starts the background logger, then updates the status in the calling flow.
///
/// Returns as soon as the status update is done; the logger may still be
/// running. With `skip_status_update` it returns immediately.
#[instrument(skip_all)]
pub async fn process_payment(config: &PaymentConfig, output: SharedOutput) {
    let delay = Duration::from_millis(config.step_delay_ms);

    debug!(steps = config.log_steps, "Launching detached transaction logger");
    spawn_detached(log_transaction(output.clone(), config.log_steps, delay));

    if config.skip_status_update {
        info!("Skipping payment status update; nothing keeps the logger alive.");
        return;
    }
    update_payment_status(output, config.status_steps, delay).await;
}

/// Entry point of the payment demo.
pub async fn run(config: &PaymentConfig, output: SharedOutput) {
    info!(
        status_steps = config.status_steps,
        log_steps = config.log_steps,
        step_delay_ms = config.step_delay_ms,
        "Payment simulation starting"
    );
    process_payment(config, output).await;
    info!("Payment simulation finished; pending background work is abandoned.");
}

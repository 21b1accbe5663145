//! The order producer: validates each order and hands it to the dispatcher
//! through the rendezvous channel, pausing between batches.

use crate::channel::{SendError, Sender};
use crate::output::SharedOutput;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Pause `delay` after every `size` sends. A `size` of zero never pauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub size: usize,
    pub delay: Duration,
}

impl BatchPolicy {
    pub fn new(size: usize, delay: Duration) -> Self {
        Self { size, delay }
    }

    /// Whether a pause is due after `sent` items have gone out.
    pub fn pause_due(&self, sent: usize) -> bool {
        self.size > 0 && sent > 0 && sent % self.size == 0
    }
}

/// Outcome of a producer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    /// Items handed off to a receiver.
    pub sent: usize,
    /// Batch pauses taken.
    pub pauses: usize,
}

pub struct Producer {
    output: SharedOutput,
    policy: BatchPolicy,
}

impl Producer {
    pub fn new(output: SharedOutput, policy: BatchPolicy) -> Self {
        Self { output, policy }
    }

    /// Validates and sends every item in order.
    ///
    /// Each send waits for the receiver. Fails only if the channel has no
    /// receiver left, returning the item that could not be delivered.
    #[instrument(skip_all)]
    pub async fn run<I, T>(&self, items: I, tx: &Sender<T>) -> Result<ProducerReport, SendError<T>>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let mut report = ProducerReport::default();

        for item in items {
            self.validate(&item);
            tx.send(item).await?;
            report.sent += 1;
            debug!(sent = report.sent, "Order handed off");

            if self.policy.pause_due(report.sent) {
                self.output.write_line("[⏳] Sleeping between batches...");
                tokio::time::sleep(self.policy.delay).await;
                report.pauses += 1;
            }
        }

        info!(sent = report.sent, pauses = report.pauses, "Producer finished.");
        Ok(report)
    }

    /// Order validation. Has no effect besides the status lines.
    fn validate<T: Display>(&self, item: &T) {
        self.output
            .write_line(&format!("[🔍] Validating order for {}...", item));
        self.output
            .write_line(&format!("[✅] Finished validating order for {}", item));
    }
}

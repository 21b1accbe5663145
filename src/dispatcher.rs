//! The notification dispatcher: receives validated orders from a rendezvous
//! channel and fans each one out to every notification kind.

use crate::channel::Receiver;
use crate::notification::{NotificationKind, Notifier};
use crate::output::SharedOutput;
use crate::task::Launcher;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

/// Renders `time` as `HH:MM:SS.fffff`, e.g. `15:04:05.01234`.
///
/// chrono has no five-digit fraction specifier, so the fraction is appended by
/// hand from the microseconds.
fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    // Leap seconds report up to 1_999_999 microseconds.
    let fraction = time.timestamp_subsec_micros().min(999_999) / 10;
    format!("{}.{:05}", time.format("%H:%M:%S"), fraction)
}

/// Outcome of a dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of items received and fanned out.
    pub dispatched: usize,
}

/// Receives items and launches one notification task per kind for each.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    output: SharedOutput,
    launcher: Launcher,
}

impl Dispatcher {
    /// Creates a dispatcher whose notification tasks are detached.
    pub fn new(notifier: Arc<dyn Notifier>, output: SharedOutput) -> Self {
        Self {
            notifier,
            output,
            launcher: Launcher::Detached,
        }
    }

    /// Replaces the way notification tasks are launched.
    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }

    /// Runs the dispatch loop.
    ///
    /// Ends when a shutdown signal is sent on `shutdown_rx` or the channel
    /// closes. Dropping the shutdown sender without signalling is not a
    /// shutdown: the loop keeps receiving. Otherwise it never returns.
    #[instrument(skip_all)]
    pub async fn run<T>(
        self,
        rx: Receiver<T>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> DispatchReport
    where
        T: Display + Send + 'static,
    {
        let mut report = DispatchReport::default();
        let mut shutdown_open = true;
        info!("Dispatcher started.");

        loop {
            self.output.write_line(&format!(
                "[📦] Waiting for completed order at {}...",
                format_timestamp(&Local::now())
            ));

            let received = loop {
                tokio::select! {
                    biased;
                    res = shutdown_rx.changed(), if shutdown_open => match res {
                        Ok(()) => break None,
                        Err(_) => {
                            debug!("Shutdown sender dropped without a signal, still dispatching.");
                            shutdown_open = false;
                        }
                    },
                    res = rx.recv() => break Some(res),
                }
            };

            let Some(received) = received else {
                info!("Dispatcher received shutdown signal.");
                break;
            };

            let item = match received {
                Ok(item) => item,
                Err(_) => {
                    info!("Order channel closed, dispatcher shutting down.");
                    break;
                }
            };

            let recipient = item.to_string();
            self.output.write_line(&format!(
                "[📬] Dispatching notifications for {} at {}...",
                recipient,
                format_timestamp(&Local::now())
            ));
            self.fan_out(&recipient);
            report.dispatched += 1;
        }

        info!(dispatched = report.dispatched, "Dispatcher finished.");
        report
    }

    /// Launches one task per notification kind and returns without waiting.
    fn fan_out(&self, recipient: &str) {
        for kind in NotificationKind::ALL {
            let notifier = self.notifier.clone();
            let recipient = recipient.to_string();
            debug!(%kind, recipient = %recipient, "Launching notification task");
            self.launcher.launch(kind.task_name(), async move {
                if let Err(e) = notifier.notify(kind, &recipient).await {
                    error!(%kind, recipient = %recipient, "Notification failed: {}", e);
                }
            });
        }
    }
}

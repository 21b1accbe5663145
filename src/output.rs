//! Destinations for the human-readable status lines both demos print.

use std::sync::Arc;

/// Receives status lines.
pub trait Output: Send + Sync {
    /// A short name used in logs.
    fn name(&self) -> &str;

    /// Writes one line. Must not block for long: it is called from inside tasks.
    fn write_line(&self, line: &str);
}

/// Shared handle to an output, cloned into every task that prints.
pub type SharedOutput = Arc<dyn Output>;

/// Prints every line to standard output.
#[derive(Debug, Clone, Default)]
pub struct StdoutOutput;

impl StdoutOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for StdoutOutput {
    fn name(&self) -> &str {
        "stdout"
    }

    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::RecordingOutput;

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use super::Output;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// An output that keeps every line in memory.
    #[derive(Clone, Debug, Default)]
    pub struct RecordingOutput {
        lines: Arc<Mutex<Vec<String>>>,
        notifier: Arc<Notify>,
    }

    impl RecordingOutput {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of all lines written so far, in write order.
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        /// Number of lines containing `needle`.
        pub fn count_containing(&self, needle: &str) -> usize {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|line| line.contains(needle))
                .count()
        }

        /// Lines containing `needle`, in write order.
        pub fn lines_containing(&self, needle: &str) -> Vec<String> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|line| line.contains(needle))
                .cloned()
                .collect()
        }

        /// Waits until at least `target` lines contain `needle`.
        ///
        /// # Panics
        /// Panics if that does not happen within `timeout_duration`.
        pub async fn wait_for(&self, needle: &str, target: usize, timeout_duration: Duration) {
            let wait_future = async {
                loop {
                    let notified = self.notifier.notified();
                    if self.count_containing(needle) >= target {
                        break;
                    }
                    notified.await;
                }
            };

            tokio::time::timeout(timeout_duration, wait_future)
                .await
                .unwrap_or_else(|_| {
                    panic!(
                        "Timed out waiting for {} lines containing {:?}; got {:?}",
                        target,
                        needle,
                        self.lines()
                    )
                });
        }
    }

    impl Output for RecordingOutput {
        fn name(&self) -> &str {
            "recording"
        }

        fn write_line(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
            self.notifier.notify_waiters();
        }
    }
}

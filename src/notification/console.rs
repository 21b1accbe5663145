//! A notifier that announces each notification on an [`Output`].

use super::{NotificationKind, Notifier};
use crate::output::SharedOutput;
use async_trait::async_trait;
use tracing::trace;

/// Writes a line per notification instead of contacting a real service.
#[derive(Clone)]
pub struct ConsoleNotifier {
    output: SharedOutput,
}

impl ConsoleNotifier {
    pub fn new(output: SharedOutput) -> Self {
        Self { output }
    }

    fn format_line(kind: NotificationKind, recipient: &str) -> String {
        let icon = match kind {
            NotificationKind::Email => "📧",
            NotificationKind::Push => "🔔",
            NotificationKind::Sms => "📱",
        };
        format!("{} Sending {} to {}...", icon, kind, recipient)
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, kind: NotificationKind, recipient: &str) -> anyhow::Result<()> {
        trace!(output = self.output.name(), %kind, recipient, "Sending notification");
        self.output.write_line(&Self::format_line(kind, recipient));
        Ok(())
    }
}

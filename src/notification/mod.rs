//! Follow-up notifications sent once an order has been validated.
//!
//! A [`Notifier`] delivers one notification of one kind to one recipient. The
//! dispatcher launches one task per kind and never waits for them, so a
//! notifier has no way to report back other than logging.
pub mod console;

pub use console::ConsoleNotifier;

use async_trait::async_trait;
use std::fmt;

/// The channels a notification can go out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Email,
    Push,
    Sms,
}

impl NotificationKind {
    /// Every kind, in the order the dispatcher launches them.
    pub const ALL: [NotificationKind; 3] = [
        NotificationKind::Email,
        NotificationKind::Push,
        NotificationKind::Sms,
    ];

    /// A static task name, used when tasks are tracked.
    pub fn task_name(self) -> &'static str {
        match self {
            NotificationKind::Email => "notify-email",
            NotificationKind::Push => "notify-push",
            NotificationKind::Sms => "notify-sms",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Email => write!(f, "email"),
            NotificationKind::Push => write!(f, "push notification"),
            NotificationKind::Sms => write!(f, "SMS"),
        }
    }
}

/// Delivers notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a notification of `kind` to `recipient`.
    ///
    /// # Returns
    /// * `Ok(())` once the notification is handed off
    /// * `Err` if delivery failed; the caller only logs it
    async fn notify(&self, kind: NotificationKind, recipient: &str) -> anyhow::Result<()>;
}

// Notification surface - the UI capability the engine calls into
//
// The engine never renders anything. Toasts go through `notify`, blocking
// reminder prompts through `prompt`, which resolves with the user's choice.

use async_trait::async_trait;
use std::fmt;
use tracing::{error, info, warn};

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::reminder::ReminderSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        write!(f, "{label}")
    }
}

/// The two affordances of a reminder prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    RemindAgain,
    Acknowledge,
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    /// Non-blocking toast
    fn notify(&self, level: NotificationLevel, message: &str);

    /// Blocking prompt; resolves once the user picks an action
    async fn prompt(&self, reminder: &ReminderSpec) -> PromptChoice;
}

/// Surface that only writes to the log, used by the CLI
///
/// Prompts resolve to `RemindAgain` since nobody is there to confirm.
#[derive(Debug, Default, Clone)]
pub struct LogSurface;

#[async_trait]
impl NotificationSurface for LogSurface {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Error => error!(%level, "{}", message),
            NotificationLevel::Warning => warn!(%level, "{}", message),
            NotificationLevel::Info | NotificationLevel::Success => info!(%level, "{}", message),
        }
    }

    async fn prompt(&self, reminder: &ReminderSpec) -> PromptChoice {
        warn!(
            reminder = %reminder.key,
            title = %reminder.title,
            "{}",
            reminder.message
        );
        PromptChoice::RemindAgain
    }
}

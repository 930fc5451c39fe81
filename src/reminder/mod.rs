// Recurring reminders for out-of-band obligations
//
// A reminder nags the user at a fixed interval until they confirm the
// external action (for example publishing a notice in a newspaper).

pub mod machine;
pub mod scheduler;

pub use machine::{ReminderEvent, ReminderPhase, ReminderState, ReminderStateMachine};
pub use scheduler::{ArmOutcome, ReminderScheduler};

/// What a reminder tracks and how it is worded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSpec {
    pub key: String,
    pub title: String,
    pub message: String,
}

impl ReminderSpec {
    pub fn new(key: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}

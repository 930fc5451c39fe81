// Error taxonomy for the workflow engine
//
// Persistence errors are recoverable and leave the draft untouched.
// Content-provider errors never abort the workflow.

use thiserror::Error;

use crate::store::{RecordId, RecordStatus};

/// Operation invoked while the session is in a state that does not allow it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("submit is only allowed from the terminal step (current step {current}, terminal step {terminal})")]
    SubmitBeforeTerminalStep { current: usize, terminal: usize },

    #[error("unknown step: {0}")]
    UnknownStep(String),

    #[error("session already closed with status {status}")]
    SessionClosed { status: RecordStatus },

    #[error("a save or submit is already in flight for this session")]
    OperationInFlight,

    #[error("unknown notice field path: {0}")]
    UnknownNoticeField(String),

    #[error("cannot resume a {status} record")]
    NotResumable { status: RecordStatus },
}

/// The persistence collaborator failed
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("record not found: {id}")]
    NotFound { id: RecordId },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// The optional notice generation call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentProviderError {
    #[error("content provider unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("content provider returned malformed data: {reason}")]
    Malformed { reason: String },

    #[error("notice generation is not enabled for this account")]
    NotEntitled,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid export filename: {0}")]
    InvalidFilename(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error("reminder '{reminder}' cannot be armed outside a tokio runtime")]
    NoRuntime { reminder: String },
}

/// Errors surfaced by `WorkflowSession`
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl SessionError {
    /// Whether the user can retry the same action without re-entering data
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::Persistence(_))
    }
}

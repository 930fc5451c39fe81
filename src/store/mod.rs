// Persistence collaborator for drafts and submitted workflows

pub mod filesystem;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::draft::DraftRecord;
use crate::error::PersistenceError;
use crate::workflow::WorkflowKind;

pub use filesystem::FileSystemDraftStore;
pub use memory::InMemoryDraftStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Draft,
    Submitted,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Draft => write!(f, "draft"),
            RecordStatus::Submitted => write!(f, "submitted"),
        }
    }
}

/// What the store receives: the draft's fields plus a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub workflow: WorkflowKind,
    pub status: RecordStatus,
    pub fields: DraftRecord,
    pub saved_at: DateTime<Utc>,
}

impl PersistedRecord {
    pub fn new(workflow: WorkflowKind, status: RecordStatus, fields: DraftRecord) -> Self {
        Self {
            workflow,
            status,
            fields,
            saved_at: Utc::now(),
        }
    }
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Persist a new record and return its identifier
    async fn create(&self, record: &PersistedRecord) -> Result<RecordId, PersistenceError>;

    /// Replace an existing record
    async fn update(&self, id: &RecordId, record: &PersistedRecord) -> Result<PersistedRecord, PersistenceError>;

    /// Fetch a record to re-open it
    async fn get(&self, id: &RecordId) -> Result<PersistedRecord, PersistenceError>;
}

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use super::{DraftStore, PersistedRecord, RecordId};
use crate::error::PersistenceError;

/// One pretty-printed JSON file per record
#[derive(Debug, Clone)]
pub struct FileSystemDraftStore {
    directory: PathBuf,
}

impl FileSystemDraftStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path of the file holding `id`
    pub fn record_path(&self, id: &RecordId) -> PathBuf {
        self.directory.join(format!("{id}.json"))
    }

    async fn write_record(&self, id: &RecordId, record: &PersistedRecord) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.directory).await?;

        let path = self.record_path(id);
        let staging = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(record)?;

        // Readers never observe a partially written record
        fs::write(&staging, json).await?;
        fs::rename(&staging, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl DraftStore for FileSystemDraftStore {
    async fn create(&self, record: &PersistedRecord) -> Result<RecordId, PersistenceError> {
        let id = RecordId::generate();
        self.write_record(&id, record).await?;

        info!(
            record_id = %id,
            status = %record.status,
            path = %self.record_path(&id).display(),
            "Record saved"
        );
        Ok(id)
    }

    async fn update(&self, id: &RecordId, record: &PersistedRecord) -> Result<PersistedRecord, PersistenceError> {
        if !fs::try_exists(self.record_path(id)).await? {
            return Err(PersistenceError::NotFound { id: id.clone() });
        }

        self.write_record(id, record).await?;
        debug!(record_id = %id, status = %record.status, "Record updated");
        Ok(record.clone())
    }

    async fn get(&self, id: &RecordId) -> Result<PersistedRecord, PersistenceError> {
        let path = self.record_path(id);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound { id: id.clone() });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&contents)?)
    }
}

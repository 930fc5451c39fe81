use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use super::{DraftStore, PersistedRecord, RecordId};
use crate::error::PersistenceError;

/// Store backed by a map, with optional latency and failure injection
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    records: Mutex<HashMap<RecordId, PersistedRecord>>,
    latency: Option<Duration>,
    failures_remaining: AtomicU32,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, simulating a network round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next `count` create/update calls fail
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn records(&self) -> Vec<(RecordId, PersistedRecord)> {
        let records = self.records.lock().await;
        let mut all: Vec<_> = records
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    async fn simulate_round_trip(&self) -> Result<(), PersistenceError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let injected = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| remaining.checked_sub(1))
            .is_ok();
        if injected {
            return Err(PersistenceError::Unavailable {
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn create(&self, record: &PersistedRecord) -> Result<RecordId, PersistenceError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.simulate_round_trip().await?;

        let id = RecordId::generate();
        self.records.lock().await.insert(id.clone(), record.clone());
        debug!(record_id = %id, status = %record.status, "Record created in memory");
        Ok(id)
    }

    async fn update(&self, id: &RecordId, record: &PersistedRecord) -> Result<PersistedRecord, PersistenceError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.simulate_round_trip().await?;

        let mut records = self.records.lock().await;
        match records.get_mut(id) {
            Some(existing) => {
                *existing = record.clone();
                debug!(record_id = %id, status = %record.status, "Record updated in memory");
                Ok(existing.clone())
            }
            None => Err(PersistenceError::NotFound { id: id.clone() }),
        }
    }

    async fn get(&self, id: &RecordId) -> Result<PersistedRecord, PersistenceError> {
        self.records
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound { id: id.clone() })
    }
}

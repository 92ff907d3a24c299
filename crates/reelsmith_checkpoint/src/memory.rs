//! In-memory checkpoint store.

use crate::{CheckpointStore, FieldMap};
use reelsmith_core::JobId;
use reelsmith_error::ReelsmithResult;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local checkpoint store.
///
/// Nothing survives the process; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    jobs: RwLock<HashMap<JobId, FieldMap>>,
    writes: RwLock<usize>,
}

impl MemoryCheckpointStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls that reached the store.
    pub async fn write_count(&self) -> usize {
        *self.writes.read().await
    }
}

#[async_trait::async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn get(&self, job_id: &JobId, field: &str) -> ReelsmithResult<Option<Value>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(job_id).and_then(|fields| fields.get(field).cloned()))
    }

    async fn set(&self, job_id: &JobId, field: &str, value: Value) -> ReelsmithResult<()> {
        let mut jobs = self.jobs.write().await;
        jobs.entry(job_id.clone())
            .or_default()
            .insert(field.to_string(), value);
        *self.writes.write().await += 1;
        Ok(())
    }

    async fn exists(&self, job_id: &JobId) -> ReelsmithResult<bool> {
        Ok(self.jobs.read().await.contains_key(job_id))
    }

    async fn load(&self, job_id: &JobId) -> ReelsmithResult<FieldMap> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(job_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, job_id: &JobId, field: &str) -> ReelsmithResult<bool> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs
            .get_mut(job_id)
            .is_some_and(|fields| fields.remove(field).is_some()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

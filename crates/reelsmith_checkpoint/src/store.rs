//! Checkpoint store trait.

use async_trait::async_trait;
use reelsmith_core::JobId;
use reelsmith_error::ReelsmithResult;
use serde_json::Value;
use std::collections::BTreeMap;

/// All populated fields of a job, keyed by field name.
pub type FieldMap = BTreeMap<String, Value>;

/// Field-level persistence for job state.
///
/// A field that is present is populated, even when its value is JSON `null`.
/// Writes are durable and visible to later reads of the same job in the same
/// process.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Read one field.
    ///
    /// Returns `None` when the job or the field does not exist.
    async fn get(&self, job_id: &JobId, field: &str) -> ReelsmithResult<Option<Value>>;

    /// Write one field.
    async fn set(&self, job_id: &JobId, field: &str, value: Value) -> ReelsmithResult<()>;

    /// True when any checkpoint exists for the job.
    async fn exists(&self, job_id: &JobId) -> ReelsmithResult<bool>;

    /// Read every populated field of a job.
    ///
    /// An unknown job yields an empty map.
    async fn load(&self, job_id: &JobId) -> ReelsmithResult<FieldMap>;

    /// Remove one field so the step producing it runs again.
    ///
    /// Returns whether the field was present.
    async fn clear(&self, job_id: &JobId, field: &str) -> ReelsmithResult<bool>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

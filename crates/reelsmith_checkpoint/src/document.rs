//! On-disk checkpoint representation.

use crate::FieldMap;
use chrono::{DateTime, Utc};
use reelsmith_core::JobId;
use serde::{Deserialize, Serialize};

/// The JSON document stored for one job.
///
/// # Examples
///
/// ```
/// use reelsmith_checkpoint::CheckpointDocument;
/// use reelsmith_core::JobId;
///
/// let mut doc = CheckpointDocument::new("job-1".parse::<JobId>().unwrap());
/// doc.fields.insert("script".to_string(), serde_json::json!("Hello"));
/// let text = serde_json::to_string(&doc).unwrap();
/// assert!(text.contains("\"job_id\":\"job-1\""));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CheckpointDocument {
    /// Owning job
    #[getter(skip)]
    pub job_id: JobId,
    /// When the job was first checkpointed
    created_at: DateTime<Utc>,
    /// When any field last changed
    updated_at: DateTime<Utc>,
    /// Populated fields
    #[getter(skip)]
    pub fields: FieldMap,
}

impl CheckpointDocument {
    /// Start an empty document for a job.
    pub fn new(job_id: JobId) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            created_at: now,
            updated_at: now,
            fields: FieldMap::new(),
        }
    }

    /// Record a modification.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

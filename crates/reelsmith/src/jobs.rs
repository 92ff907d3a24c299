//! Job inspection and maintenance that needs only the checkpoint store.

use reelsmith_checkpoint::CheckpointStore;
use reelsmith_core::JobId;
use reelsmith_error::{PersistenceError, PersistenceErrorKind, PipelineError, PipelineErrorKind, ReelsmithResult};
use reelsmith_pipeline::{JobState, StepRegistry};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

const PREVIEW_CHARS: usize = 60;

/// Snapshot of one job's progress.
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct JobStatus {
    /// Job inspected
    job_id: JobId,
    /// Populated fields with a short preview of each value
    fields: Vec<(String, String)>,
    /// First step still to run, if any
    next_step: Option<String>,
    /// Whether the job reached its terminal step
    ready: bool,
    /// Published video, once known
    artifact: Option<PathBuf>,
}

fn preview(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("[{} entries]", items.len()),
        other => other.to_string(),
    };
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head.replace('\n', " "))
    } else {
        head.replace('\n', " ")
    }
}

/// Read a job's progress.
///
/// # Errors
///
/// Returns `UnknownJob` if nothing is checkpointed under `job_id`.
#[tracing::instrument(skip(store, registry), fields(job_id = %job_id))]
pub async fn job_status(
    store: &dyn CheckpointStore,
    registry: &StepRegistry,
    job_id: &JobId,
) -> ReelsmithResult<JobStatus> {
    if !store.exists(job_id).await? {
        return Err(PersistenceError::new(PersistenceErrorKind::UnknownJob(job_id.to_string())).into());
    }
    let job = JobState::new(job_id.clone(), store.load(job_id).await?);

    let fields = job
        .fields()
        .iter()
        .map(|(name, value)| (name.clone(), preview(value)))
        .collect();

    Ok(JobStatus {
        job_id: job_id.clone(),
        fields,
        next_step: job.next_step(registry).map(String::from),
        ready: job.is_ready(),
        artifact: job.artifact_path(),
    })
}

/// Clear one field of a job so the step producing it runs again.
///
/// Only fields produced by a registered step can be cleared. Returns
/// whether the field was present.
///
/// # Errors
///
/// Returns `UnknownJob` for a missing job, or `UnknownField` when `field`
/// is not produced by any step.
#[tracing::instrument(skip(store, registry), fields(job_id = %job_id))]
pub async fn clear_job_field(
    store: &dyn CheckpointStore,
    registry: &StepRegistry,
    job_id: &JobId,
    field: &str,
) -> ReelsmithResult<bool> {
    let Some(producer) = registry.producer_of(field) else {
        return Err(PipelineError::new(PipelineErrorKind::UnknownField(field.to_string())).into());
    };
    if !store.exists(job_id).await? {
        return Err(PersistenceError::new(PersistenceErrorKind::UnknownJob(job_id.to_string())).into());
    }

    let cleared = store.clear(job_id, field).await?;
    tracing::info!(field, step = producer.name(), cleared, "Cleared field");
    Ok(cleared)
}

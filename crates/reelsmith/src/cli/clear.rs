//! Field clearing command handler.

use reelsmith::{JobId, ReelsmithConfig, ReelsmithResult, build_store, clear_job_field, video_registry};

/// Clear one field so the next run recomputes it.
pub async fn clear_field(config: &ReelsmithConfig, job: &str, field: &str) -> ReelsmithResult<()> {
    let job_id: JobId = job.parse()?;
    let store = build_store(config)?;

    if clear_job_field(store.as_ref(), &video_registry(), &job_id, field).await? {
        println!("Cleared '{}' on job {}", field, job_id);
    } else {
        println!("'{}' was not set on job {}", field, job_id);
    }

    Ok(())
}

//! Job status command handler.

use reelsmith::{JobId, ReelsmithConfig, ReelsmithResult, build_store, job_status, video_registry};

/// Print a job's populated fields and next step.
pub async fn show_status(config: &ReelsmithConfig, job: &str) -> ReelsmithResult<()> {
    let job_id: JobId = job.parse()?;
    let store = build_store(config)?;
    let status = job_status(store.as_ref(), &video_registry(), &job_id).await?;

    println!("Job {}", status.job_id());
    println!("{:-<80}", "");
    for (field, value) in status.fields() {
        println!("{:<24} {}", field, value);
    }
    println!("{:-<80}", "");
    match status.next_step() {
        Some(step) => println!("Next step: {}", step),
        None if *status.ready() => println!("Ready to upload"),
        None => println!("All steps complete"),
    }
    if let Some(artifact) = status.artifact() {
        println!("Video: {}", artifact.display());
    }

    Ok(())
}

//! Job execution command handler.

use super::RunArgs;
use reelsmith::{
    JobId, JobSeed, PipelineError, PipelineErrorKind, PipelineRun, ReelsmithConfig,
    ReelsmithResult, build_executor,
};

fn invalid_seed(message: String) -> reelsmith::ReelsmithError {
    PipelineError::new(PipelineErrorKind::InvalidSeed(message)).into()
}

async fn seed_from(args: &RunArgs) -> ReelsmithResult<Option<JobSeed>> {
    let script = match (&args.script, &args.script_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(tokio::fs::read_to_string(path).await.map_err(|e| {
            invalid_seed(format!("cannot read script file {}: {}", path.display(), e))
        })?),
        (None, None) => None,
    };

    if script.is_none() && args.prompt.is_none() {
        return Ok(None);
    }

    let mut builder = JobSeed::builder();
    builder.language(args.language).format_vertical(args.vertical);
    if let Some(script) = script {
        builder.script(script);
    }
    if let Some(prompt) = &args.prompt {
        builder.script_prompt(prompt.clone());
    }
    if let Some(music) = &args.music {
        builder.background_music_name(music.clone());
    }

    let seed = builder.build().map_err(|e| invalid_seed(e.to_string()))?;
    Ok(Some(seed))
}

/// Create a job from the arguments and run it, or resume `--job`.
pub async fn run_job(config: &ReelsmithConfig, args: RunArgs) -> ReelsmithResult<PipelineRun> {
    let job_id = args.job.as_deref().map(str::parse::<JobId>).transpose()?;
    let seed = seed_from(&args).await?;

    let executor = build_executor(config)?;

    let run = match (seed, job_id) {
        (Some(seed), Some(job_id)) => {
            let mut job = executor.create_job_with_id(job_id, &seed).await?;
            executor.run(&mut job).await?
        }
        (Some(seed), None) => {
            let mut job = executor.create_job(&seed).await?;
            println!("Created job {}", job.job_id());
            executor.run(&mut job).await?
        }
        (None, Some(job_id)) => executor.resume(&job_id).await?,
        (None, None) => {
            return Err(invalid_seed(
                "pass --script, --script-file or --prompt, or --job to resume".to_string(),
            ));
        }
    };

    if run.was_noop() {
        println!("Job {} was already complete", run.job_id());
    } else {
        println!(
            "Job {}: ran {} step(s), skipped {}",
            run.job_id(),
            run.executed().len(),
            run.skipped().len()
        );
    }
    if let Some(artifact) = run.artifact() {
        println!("Video: {}", artifact.display());
    }

    Ok(run)
}

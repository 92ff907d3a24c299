//! Voice-over synthesis and measurement.

use super::step_failed;
use crate::{JobState, Step, StepContext, StepOutput};
use async_trait::async_trait;
use reelsmith_core::{Language, fields};
use reelsmith_error::{PersistenceError, PersistenceErrorKind, ReelsmithResult};
use std::path::PathBuf;

const NARRATION_FILE: &str = "narration.wav";

/// Speaks the script into `work_dir/<job>/narration.wav`.
pub struct SynthesizeNarration;

#[async_trait]
impl Step for SynthesizeNarration {
    fn name(&self) -> &'static str {
        "synthesize_narration"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::SPOKEN_SCRIPT, fields::LANGUAGE]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::AUDIO_PATH]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let script: String = job.get(fields::SPOKEN_SCRIPT)?;
        let language: Language = job.get(fields::LANGUAGE)?;

        let job_dir = ctx.config().job_dir(job.job_id());
        tokio::fs::create_dir_all(&job_dir).await.map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::DirectoryCreation(format!(
                "{}: {}",
                job_dir.display(),
                e
            )))
        })?;

        let target = job_dir.join(NARRATION_FILE);
        let audio = ctx
            .bounded(
                "synthesize",
                ctx.narrator().synthesize(&script, language, &target),
            )
            .await?;

        tracing::info!(path = %audio.display(), %language, "Synthesized narration");
        StepOutput::new().with(fields::AUDIO_PATH, audio)
    }
}

/// Records the voice-over length; it drives the whole timeline.
pub struct MeasureNarration;

#[async_trait]
impl Step for MeasureNarration {
    fn name(&self) -> &'static str {
        "measure_narration"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::AUDIO_PATH]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::VOICEOVER_DURATION]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let audio: PathBuf = job.get(fields::AUDIO_PATH)?;
        let duration = ctx
            .bounded("measure", ctx.narrator().duration(&audio))
            .await?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(step_failed(
                self.name(),
                format!("narration has invalid duration {}", duration),
            ));
        }

        tracing::debug!(duration, "Measured narration");
        StepOutput::new().with(fields::VOICEOVER_DURATION, duration)
    }
}

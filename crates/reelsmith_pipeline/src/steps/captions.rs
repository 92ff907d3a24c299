//! Caption timing from the transcribed narration.

use super::step_failed;
use crate::{JobState, Step, StepContext, StepOutput, pack_captions};
use async_trait::async_trait;
use reelsmith_core::fields;
use reelsmith_error::ReelsmithResult;
use std::path::PathBuf;

/// Transcribes the narration and packs the words into short captions.
///
/// Captions are bounded by the measured narration length rather than the
/// transcriber's own estimate.
pub struct TimeCaptions;

#[async_trait]
impl Step for TimeCaptions {
    fn name(&self) -> &'static str {
        "time_captions"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[
            fields::AUDIO_PATH,
            fields::VOICEOVER_DURATION,
            fields::FORMAT_VERTICAL,
        ]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::TIMED_CAPTIONS]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let audio: PathBuf = job.get(fields::AUDIO_PATH)?;
        let duration: f64 = job.get(fields::VOICEOVER_DURATION)?;
        let vertical: bool = job.get(fields::FORMAT_VERTICAL)?;

        let transcript = ctx
            .bounded("transcribe", ctx.transcriber().transcribe(&audio))
            .await?;

        let max_chars = ctx.config().caption_chars(vertical);
        let captions = pack_captions(transcript.words(), max_chars, duration);
        if captions.is_empty() {
            return Err(step_failed(
                self.name(),
                "transcript has no words within the narration",
            ));
        }

        tracing::info!(
            captions = captions.len(),
            max_chars,
            duration,
            transcribed = transcript.duration(),
            "Timed captions"
        );
        StepOutput::new().with(fields::TIMED_CAPTIONS, captions)
    }
}

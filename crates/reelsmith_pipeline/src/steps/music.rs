//! Background music selection.

use crate::{JobState, Step, StepContext, StepOutput};
use async_trait::async_trait;
use reelsmith_core::fields;
use reelsmith_error::ReelsmithResult;

/// Looks the requested track up in the music library.
///
/// Produces `null` when no track was requested or the name is unknown.
pub struct ChooseBackgroundMusic;

#[async_trait]
impl Step for ChooseBackgroundMusic {
    fn name(&self) -> &'static str {
        "choose_background_music"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::BACKGROUND_MUSIC_URL]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let name: Option<String> = job.optional(fields::BACKGROUND_MUSIC_NAME)?;
        let url = match name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => {
                let found = ctx.bounded("music lookup", ctx.music().lookup(name)).await?;
                if found.is_none() {
                    tracing::warn!(name, "Background music not found, continuing without");
                }
                found
            }
            None => None,
        };

        StepOutput::new().with(fields::BACKGROUND_MUSIC_URL, url)
    }
}

//! The video production steps.
//!
//! | # | step | produces |
//! |---|---|---|
//! | 1 | `generate_script` | `script` |
//! | 2 | `guard_script_length` | `narration_script` |
//! | 3 | `translate_script` | `spoken_script` |
//! | 4 | `synthesize_narration` | `audio_path` |
//! | 5 | `measure_narration` | `voiceover_duration` |
//! | 6 | `time_captions` | `timed_captions` |
//! | 7 | `generate_image_queries` | `main_topic`, `image_queries` |
//! | 8 | `generate_video_search_terms` | `timed_video_searches` |
//! | 9 | `resolve_video_urls` | `timed_video_urls` |
//! | 10 | `resolve_image_urls` | `timed_image_urls` |
//! | 11 | `choose_background_music` | `background_music_url` |
//! | 12 | `render_video` | `rendered_video_path` |
//! | 13 | `write_metadata` | `title`, `description`, `video_path` |
//! | 14 | `publish_video` | `ready_to_upload` |

mod captions;
mod footage;
mod imagery;
mod music;
mod narration;
mod publish;
mod render;
mod script;

pub use captions::TimeCaptions;
pub use footage::{GenerateVideoSearchTerms, RawSegment, ResolveVideoUrls, normalize_segments};
pub use imagery::{GenerateImageQueries, ImageQuery, ResolveImageUrls, plan_image_overlays};
pub use music::ChooseBackgroundMusic;
pub use narration::{MeasureNarration, SynthesizeNarration};
pub use publish::{PublishVideo, WriteMetadata, sanitize_title};
pub use render::{RenderInputs, RenderVideo, build_render_plan};
pub use script::{GenerateScript, GuardScriptLength, TranslateScript, guard_word_count};

use crate::StepRegistry;
use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithError};

/// The fourteen-step registry that turns a script into a published video.
pub fn video_registry() -> StepRegistry {
    StepRegistry::new()
        .with(GenerateScript)
        .with(GuardScriptLength)
        .with(TranslateScript)
        .with(SynthesizeNarration)
        .with(MeasureNarration)
        .with(TimeCaptions)
        .with(GenerateImageQueries)
        .with(GenerateVideoSearchTerms)
        .with(ResolveVideoUrls)
        .with(ResolveImageUrls)
        .with(ChooseBackgroundMusic)
        .with(RenderVideo)
        .with(WriteMetadata)
        .with(PublishVideo)
}

fn step_failed(step: &str, message: impl Into<String>) -> ReelsmithError {
    PipelineError::new(PipelineErrorKind::StepFailed {
        step: step.to_string(),
        message: message.into(),
    })
    .into()
}

//! Render plan assembly and rendering.

use crate::{JobState, PipelineConfig, Step, StepContext, StepOutput};
use async_trait::async_trait;
use reelsmith_core::{CaptionStyle, Language, RenderLayer, RenderPlan, TimedEntry, fields};
use reelsmith_error::{PersistenceError, PersistenceErrorKind, ReelsmithResult};
use std::path::{Path, PathBuf};

const RENDERED_FILE: &str = "rendered_video.mp4";

/// Everything the render plan is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInputs {
    /// Voice-over file
    pub audio: PathBuf,
    /// Voice-over length in seconds
    pub duration: f64,
    /// Caption timeline
    pub captions: Vec<TimedEntry<String>>,
    /// Footage per segment
    pub videos: Vec<TimedEntry<String>>,
    /// Image overlays
    pub images: Vec<TimedEntry<String>>,
    /// Music track, if any
    pub music: Option<String>,
    /// Vertical output
    pub vertical: bool,
    /// Narration language
    pub language: Language,
}

impl RenderInputs {
    fn from_job(job: &JobState) -> ReelsmithResult<Self> {
        Ok(Self {
            audio: job.get(fields::AUDIO_PATH)?,
            duration: job.get(fields::VOICEOVER_DURATION)?,
            captions: job.get(fields::TIMED_CAPTIONS)?,
            videos: job.get(fields::TIMED_VIDEO_URLS)?,
            images: job.get(fields::TIMED_IMAGE_URLS)?,
            music: job.optional(fields::BACKGROUND_MUSIC_URL)?,
            vertical: job.get(fields::FORMAT_VERTICAL)?,
            language: job.get(fields::LANGUAGE)?,
        })
    }
}

/// Assemble the render plan for a job.
///
/// Captions are upper-cased and styled for the orientation and language.
/// Music plays at the configured volume, looped to the narration length. A
/// clip is added when the narration is longer than the maximum video length.
pub fn build_render_plan(
    inputs: &RenderInputs,
    config: &PipelineConfig,
    output: impl Into<PathBuf>,
) -> RenderPlan {
    let mut layers = vec![RenderLayer::Narration {
        path: inputs.audio.clone(),
    }];

    layers.extend(inputs.videos.iter().map(|v| RenderLayer::BackgroundVideo {
        url: v.payload.clone(),
        start: v.start,
        end: v.end,
    }));

    if let Some(url) = &inputs.music {
        layers.push(RenderLayer::BackgroundMusic {
            url: url.clone(),
            volume: *config.music_volume(),
            loop_until: inputs.duration,
        });
    }

    layers.extend(inputs.images.iter().map(|i| RenderLayer::ImageOverlay {
        url: i.payload.clone(),
        start: i.start,
        end: i.end,
    }));

    let style = CaptionStyle::select(inputs.vertical, inputs.language);
    layers.extend(inputs.captions.iter().map(|c| RenderLayer::Caption {
        text: c.payload.to_uppercase(),
        start: c.start,
        end: c.end,
        style,
    }));

    let max_seconds = *config.max_video_seconds();
    if inputs.duration > max_seconds {
        layers.push(RenderLayer::ClipDuration { max_seconds });
    }

    RenderPlan::new(output, layers)
}

/// Hands the render plan to the renderer.
///
/// A finished render left in the work directory by an interrupted run is
/// reused. Rendering is never retried.
pub struct RenderVideo;

#[async_trait]
impl Step for RenderVideo {
    fn name(&self) -> &'static str {
        "render_video"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[
            fields::AUDIO_PATH,
            fields::VOICEOVER_DURATION,
            fields::TIMED_CAPTIONS,
            fields::TIMED_VIDEO_URLS,
            fields::TIMED_IMAGE_URLS,
            fields::BACKGROUND_MUSIC_URL,
            fields::FORMAT_VERTICAL,
            fields::LANGUAGE,
        ]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::RENDERED_VIDEO_PATH]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let inputs = RenderInputs::from_job(job)?;
        let job_dir = ctx.config().job_dir(job.job_id());
        let output = job_dir.join(RENDERED_FILE);

        if is_nonempty_file(&output).await {
            tracing::info!(path = %output.display(), "Reusing existing render");
            return StepOutput::new().with(fields::RENDERED_VIDEO_PATH, output);
        }

        tokio::fs::create_dir_all(&job_dir).await.map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::DirectoryCreation(format!(
                "{}: {}",
                job_dir.display(),
                e
            )))
        })?;

        let plan = build_render_plan(&inputs, ctx.config(), output);
        tracing::info!(
            layers = plan.layers().len(),
            clip = ?plan.clip_seconds(),
            "Rendering video"
        );
        let rendered = ctx.bounded("render", ctx.renderer().render(&plan)).await?;

        StepOutput::new().with(fields::RENDERED_VIDEO_PATH, rendered)
    }
}

async fn is_nonempty_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

//! Pipeline tuning knobs.

use crate::TopicRule;
use reelsmith_resolver::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the video steps.
///
/// Loaded from the `[pipeline]` table of `reelsmith.toml`; every field has a
/// default so an empty table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PipelineConfig {
    /// Per-job scratch space for narration and renders
    #[serde(default = "default_work_dir")]
    work_dir: PathBuf,
    /// Destination of published videos
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    /// Scripts longer than this are truncated before narration
    #[serde(default = "default_max_script_words")]
    max_script_words: usize,
    /// Rendered videos are clipped to this length
    #[serde(default = "default_max_video_seconds")]
    max_video_seconds: f64,
    /// Caption length limit for vertical video
    #[serde(default = "default_vertical_caption_chars")]
    vertical_caption_chars: usize,
    /// Caption length limit for landscape video
    #[serde(default = "default_landscape_caption_chars")]
    landscape_caption_chars: usize,
    /// One image overlay per this many seconds of narration
    #[serde(default = "default_seconds_per_image")]
    seconds_per_image: f64,
    /// Fewest image overlays requested
    #[serde(default = "default_min_images")]
    min_images: usize,
    /// Most image overlays requested
    #[serde(default = "default_max_images")]
    max_images: usize,
    /// How long an overlay stays on screen
    #[serde(default = "default_image_display_seconds")]
    image_display_seconds: f64,
    /// Background music volume, 0.0 to 1.0
    #[serde(default = "default_music_volume")]
    music_volume: f64,
    /// Candidates requested per footage search
    #[serde(default = "default_video_top_n")]
    video_top_n: usize,
    /// Candidates requested per image search
    #[serde(default = "default_image_top_n")]
    image_top_n: usize,
    /// Query used when an image query cannot be repaired from the topic
    #[serde(default = "default_fallback_query")]
    fallback_query: String,
    /// Completion attempts allowed for a structured (JSON) answer
    #[serde(default = "default_json_attempts")]
    json_attempts: usize,
    /// Appended to the prompt of generated scripts
    #[serde(default = "default_script_suffix")]
    script_suffix: String,
    /// Bounded wait for narration, transcription and rendering
    #[serde(default = "default_collaborator_timeout_secs")]
    collaborator_timeout_secs: u64,
    /// Bounded wait and backoff for completion calls
    #[serde(default = "default_completion_retry")]
    completion_retry: RetryPolicy,
    /// Keyword table for main-topic detection
    #[serde(default)]
    topic_rules: Vec<TopicRule>,
    /// One-word image queries that need the topic prepended
    #[serde(default = "default_generic_terms")]
    generic_terms: Vec<String>,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".reelsmith/work")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("videos")
}

fn default_max_script_words() -> usize {
    90
}

fn default_max_video_seconds() -> f64 {
    30.0
}

fn default_vertical_caption_chars() -> usize {
    15
}

fn default_landscape_caption_chars() -> usize {
    30
}

fn default_seconds_per_image() -> f64 {
    5.0
}

fn default_min_images() -> usize {
    5
}

fn default_max_images() -> usize {
    10
}

fn default_image_display_seconds() -> f64 {
    4.0
}

fn default_music_volume() -> f64 {
    0.08
}

fn default_video_top_n() -> usize {
    15
}

fn default_image_top_n() -> usize {
    3
}

fn default_fallback_query() -> String {
    "car".to_string()
}

fn default_json_attempts() -> usize {
    4
}

fn default_script_suffix() -> String {
    " (must be under 30 seconds)".to_string()
}

fn default_collaborator_timeout_secs() -> u64 {
    900
}

fn default_completion_retry() -> RetryPolicy {
    RetryPolicy::default()
        .with_call_timeout_ms(120_000)
        .with_fatal_timeouts()
}

fn default_generic_terms() -> Vec<String> {
    [
        "car",
        "vehicle",
        "automobile",
        "sedan",
        "luxury",
        "warranty",
        "audio",
        "system",
        "years",
        "miles",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            output_dir: default_output_dir(),
            max_script_words: default_max_script_words(),
            max_video_seconds: default_max_video_seconds(),
            vertical_caption_chars: default_vertical_caption_chars(),
            landscape_caption_chars: default_landscape_caption_chars(),
            seconds_per_image: default_seconds_per_image(),
            min_images: default_min_images(),
            max_images: default_max_images(),
            image_display_seconds: default_image_display_seconds(),
            music_volume: default_music_volume(),
            video_top_n: default_video_top_n(),
            image_top_n: default_image_top_n(),
            fallback_query: default_fallback_query(),
            json_attempts: default_json_attempts(),
            script_suffix: default_script_suffix(),
            collaborator_timeout_secs: default_collaborator_timeout_secs(),
            completion_retry: default_completion_retry(),
            topic_rules: Vec::new(),
            generic_terms: default_generic_terms(),
        }
    }
}

impl PipelineConfig {
    /// Same configuration writing under different directories.
    pub fn with_dirs(mut self, work_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self.output_dir = output_dir.into();
        self
    }

    /// Same configuration with a different completion retry policy.
    pub fn with_completion_retry(mut self, retry: RetryPolicy) -> Self {
        self.completion_retry = retry;
        self
    }

    /// Same configuration with a different topic table.
    pub fn with_topic_rules(mut self, rules: Vec<TopicRule>) -> Self {
        self.topic_rules = rules;
        self
    }

    /// Maximum caption length for the orientation.
    pub fn caption_chars(&self, vertical: bool) -> usize {
        if vertical {
            self.vertical_caption_chars
        } else {
            self.landscape_caption_chars
        }
    }

    /// Number of image overlays for a narration of `duration` seconds.
    ///
    /// `clamp(round(duration / seconds_per_image), min_images, max_images)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_pipeline::PipelineConfig;
    ///
    /// let config = PipelineConfig::default();
    /// assert_eq!(config.image_count(12.0), 5);
    /// assert_eq!(config.image_count(32.6), 7);
    /// assert_eq!(config.image_count(240.0), 10);
    /// ```
    pub fn image_count(&self, duration: f64) -> usize {
        let per_image = if self.seconds_per_image > 0.0 {
            self.seconds_per_image
        } else {
            default_seconds_per_image()
        };
        let estimate = (duration.max(0.0) / per_image).round() as usize;
        estimate.clamp(self.min_images, self.max_images.max(self.min_images))
    }

    /// Scratch directory of one job.
    pub fn job_dir(&self, job_id: &reelsmith_core::JobId) -> PathBuf {
        self.work_dir.join(job_id.as_str())
    }
}

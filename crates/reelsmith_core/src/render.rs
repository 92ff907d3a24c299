//! Render plans handed to the renderer.

use crate::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Caption presentation, chosen from orientation and language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CaptionStyle {
    /// Large centred captions for vertical shorts
    Short,
    /// Right-to-left variant of [`CaptionStyle::Short`]
    ShortArabic,
    /// Lower-third captions for landscape video
    Landscape,
    /// Right-to-left variant of [`CaptionStyle::Landscape`]
    LandscapeArabic,
}

impl CaptionStyle {
    /// Pick the caption style for an orientation and narration language.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_core::{CaptionStyle, Language};
    ///
    /// assert_eq!(CaptionStyle::select(true, Language::English), CaptionStyle::Short);
    /// assert_eq!(CaptionStyle::select(false, Language::Arabic), CaptionStyle::LandscapeArabic);
    /// ```
    pub fn select(vertical: bool, language: Language) -> Self {
        match (vertical, language.is_arabic()) {
            (true, false) => CaptionStyle::Short,
            (true, true) => CaptionStyle::ShortArabic,
            (false, false) => CaptionStyle::Landscape,
            (false, true) => CaptionStyle::LandscapeArabic,
        }
    }
}

/// A single editing operation in a render plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderLayer {
    /// Voice-over track; defines the timeline
    Narration {
        /// Local audio file
        path: PathBuf,
    },
    /// Stock footage covering a time range
    BackgroundVideo {
        /// Video URL
        url: String,
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
    },
    /// Music bed mixed under the narration
    BackgroundMusic {
        /// Music URL or local path
        url: String,
        /// Linear volume, 0.0 to 1.0
        volume: f64,
        /// Loop the track until this many seconds
        loop_until: f64,
    },
    /// Still image shown over the footage
    ImageOverlay {
        /// Image URL
        url: String,
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
    },
    /// Burned-in caption text
    Caption {
        /// Caption text, already upper-cased
        text: String,
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
        /// Presentation style
        style: CaptionStyle,
    },
    /// Trim the final video
    ClipDuration {
        /// Maximum output length in seconds
        max_seconds: f64,
    },
}

impl RenderLayer {
    /// Position of this layer kind in the compositing order.
    pub fn rank(&self) -> u8 {
        match self {
            RenderLayer::Narration { .. } => 0,
            RenderLayer::BackgroundVideo { .. } => 1,
            RenderLayer::BackgroundMusic { .. } => 2,
            RenderLayer::ImageOverlay { .. } => 3,
            RenderLayer::Caption { .. } => 4,
            RenderLayer::ClipDuration { .. } => 5,
        }
    }
}

/// An ordered list of editing operations producing one output file.
///
/// Layers are kept in compositing order: narration, background video,
/// music, image overlays, captions, then the optional clip. Within a kind the
/// insertion order is preserved.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{RenderLayer, RenderPlan};
///
/// let plan = RenderPlan::new(
///     "out.mp4",
///     vec![
///         RenderLayer::ClipDuration { max_seconds: 30.0 },
///         RenderLayer::Narration { path: "voice.wav".into() },
///     ],
/// );
/// assert_eq!(plan.layers()[0].rank(), 0);
/// assert_eq!(plan.layers()[1].rank(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RenderPlan {
    /// Where the renderer must write the video
    output: PathBuf,
    /// Operations in compositing order
    layers: Vec<RenderLayer>,
}

impl RenderPlan {
    /// Create a plan, ordering layers by kind.
    pub fn new(output: impl Into<PathBuf>, mut layers: Vec<RenderLayer>) -> Self {
        layers.sort_by_key(RenderLayer::rank);
        Self {
            output: output.into(),
            layers,
        }
    }

    /// The clip length, if the plan trims its output.
    pub fn clip_seconds(&self) -> Option<f64> {
        self.layers.iter().find_map(|layer| match layer {
            RenderLayer::ClipDuration { max_seconds } => Some(*max_seconds),
            _ => None,
        })
    }
}

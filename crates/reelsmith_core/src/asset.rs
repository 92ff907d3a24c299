//! Visual assets returned by search providers.

use serde::{Deserialize, Serialize};

/// Target frame shape, expressed as a width/height pair.
///
/// # Examples
///
/// ```
/// use reelsmith_core::AspectRatio;
///
/// assert_eq!(AspectRatio::landscape().ratio(), 1920.0 / 1080.0);
/// assert_eq!(AspectRatio::square().ratio(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
}

impl AspectRatio {
    /// Create a target from explicit dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 1920x1080 background video.
    pub fn landscape() -> Self {
        Self::new(1920, 1080)
    }

    /// 1080x1920 background video for vertical shorts.
    pub fn vertical() -> Self {
        Self::new(1080, 1920)
    }

    /// 720x720 image overlays.
    pub fn square() -> Self {
        Self::new(720, 720)
    }

    /// Background video target for the given orientation.
    pub fn for_orientation(vertical: bool) -> Self {
        if vertical {
            Self::vertical()
        } else {
            Self::landscape()
        }
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// A candidate or chosen visual asset.
///
/// Assets with a zero dimension cannot be scored and are discarded by the
/// resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedAsset {
    /// Direct download URL
    pub url: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ResolvedAsset {
    /// Create an asset description.
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    /// True when both dimensions are non-zero.
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Distance between this asset's aspect ratio and the target's.
    ///
    /// Returns `None` for zero-dimension assets.
    pub fn aspect_distance(&self, target: &AspectRatio) -> Option<f64> {
        if !self.has_dimensions() {
            return None;
        }
        let ratio = f64::from(self.width) / f64::from(self.height);
        Some((ratio - target.ratio()).abs())
    }
}

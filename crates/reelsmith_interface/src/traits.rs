//! Collaborator traits consumed by pipeline steps.

use crate::CompletionRequest;
use async_trait::async_trait;
use reelsmith_core::{Language, RenderPlan, ResolvedAsset, Transcript};
use reelsmith_error::ProviderResult;
use std::path::{Path, PathBuf};

/// Text completion backend.
///
/// Implementations return the raw response text; callers that expect JSON
/// extract and parse it themselves.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a single prompt.
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String>;

    /// Provider name for logging (e.g., "openai").
    fn provider_name(&self) -> &str;
}

/// Image or video stock search backend.
#[async_trait]
pub trait AssetSearchProvider: Send + Sync {
    /// Return up to `count` candidates for `query`, best match first.
    async fn search(&self, query: &str, count: usize) -> ProviderResult<Vec<ResolvedAsset>>;

    /// Provider name for logging (e.g., "pexels-videos").
    fn provider_name(&self) -> &str;
}

/// Speech synthesis backend.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Speak `text` in `language`, writing audio to `output`.
    ///
    /// Returns the path actually written, which may differ from `output` if
    /// the backend picks its own extension.
    async fn synthesize(&self, text: &str, language: Language, output: &Path)
    -> ProviderResult<PathBuf>;

    /// Length of an audio file in seconds.
    async fn duration(&self, audio: &Path) -> ProviderResult<f64>;
}

/// Speech-to-text backend producing word timings.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file.
    async fn transcribe(&self, audio: &Path) -> ProviderResult<Transcript>;
}

/// Video compositor.
///
/// Render failures are never retried.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Execute the plan and return the written output file.
    async fn render(&self, plan: &RenderPlan) -> ProviderResult<PathBuf>;
}

/// Catalogue of background music tracks.
#[async_trait]
pub trait MusicLibrary: Send + Sync {
    /// Find the URL or path of a track by name.
    async fn lookup(&self, name: &str) -> ProviderResult<Option<String>>;
}

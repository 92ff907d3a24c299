//! Wiring configuration into a ready executor.

use crate::ReelsmithConfig;
use reelsmith_checkpoint::{CheckpointStore, FileCheckpointStore};
use reelsmith_error::{ConfigError, ReelsmithResult};
use reelsmith_interface::{
    AssetSearchProvider, CompletionProvider, MusicLibrary, Narrator, Renderer, Transcriber,
};
use reelsmith_models::{
    CommandNarrator, CommandRenderer, CommandTranscriber, DirectoryMusicLibrary, OpenAiCompletion,
    PexelsImageSearch, PexelsVideoSearch,
};
use reelsmith_pipeline::{PipelineExecutor, StepContext, video_registry};
use reelsmith_resolver::ResourceResolver;
use std::sync::Arc;

/// Step context backed by the configured concrete collaborators.
///
/// # Errors
///
/// Returns an `Auth` provider error when an API key variable is unset.
#[tracing::instrument(skip_all)]
pub fn build_context(config: &ReelsmithConfig) -> ReelsmithResult<StepContext> {
    let models = config.models();

    let completion = Arc::new(OpenAiCompletion::from_env(models.completion())?);
    let images = Arc::new(PexelsImageSearch::from_env(models.pexels())?);
    let videos = Arc::new(PexelsVideoSearch::from_env(models.pexels())?);

    let image_resolver =
        ResourceResolver::new(images as Arc<dyn AssetSearchProvider>, config.resolver().images());
    let video_resolver =
        ResourceResolver::new(videos as Arc<dyn AssetSearchProvider>, config.resolver().videos());

    let context = StepContext::builder()
        .config(config.pipeline().clone())
        .completion(completion as Arc<dyn CompletionProvider>)
        .narrator(Arc::new(CommandNarrator::new(models.narrator())) as Arc<dyn Narrator>)
        .transcriber(
            Arc::new(CommandTranscriber::new(models.transcriber())) as Arc<dyn Transcriber>
        )
        .renderer(Arc::new(CommandRenderer::new(models.renderer())) as Arc<dyn Renderer>)
        .music(Arc::new(DirectoryMusicLibrary::new(models.music())) as Arc<dyn MusicLibrary>)
        .video_resolver(Arc::new(video_resolver))
        .image_resolver(Arc::new(image_resolver))
        .build()
        .map_err(|e| ConfigError::new(format!("Incomplete step context: {}", e)))?;

    tracing::debug!("Built step context");
    Ok(context)
}

/// File-backed checkpoint store under the configured directory.
pub fn build_store(config: &ReelsmithConfig) -> ReelsmithResult<Arc<dyn CheckpointStore>> {
    let store = FileCheckpointStore::new(config.checkpoint_dir().clone())?;
    Ok(Arc::new(store))
}

/// Executor running the video registry against `context`.
pub fn build_executor_with(
    config: &ReelsmithConfig,
    context: StepContext,
) -> ReelsmithResult<PipelineExecutor> {
    PipelineExecutor::new(video_registry(), build_store(config)?, context)
}

/// Executor with every collaborator taken from configuration.
pub fn build_executor(config: &ReelsmithConfig) -> ReelsmithResult<PipelineExecutor> {
    build_executor_with(config, build_context(config)?)
}

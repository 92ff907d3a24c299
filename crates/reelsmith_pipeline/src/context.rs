//! Collaborators and settings shared by every step.

use crate::{PipelineConfig, parse_json};
use reelsmith_error::{ParseError, ProviderError, ProviderErrorKind, ProviderResult, ReelsmithResult};
use reelsmith_interface::{
    CompletionProvider, CompletionRequest, MusicLibrary, Narrator, Renderer, Transcriber,
};
use reelsmith_resolver::{ResourceResolver, call_with_retry};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Everything a step may call out to.
#[derive(Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct StepContext {
    /// Step tuning
    #[builder(default)]
    config: PipelineConfig,
    /// Text completion
    completion: Arc<dyn CompletionProvider>,
    /// Speech synthesis
    narrator: Arc<dyn Narrator>,
    /// Speech-to-text
    transcriber: Arc<dyn Transcriber>,
    /// Video compositor
    renderer: Arc<dyn Renderer>,
    /// Background music catalogue
    music: Arc<dyn MusicLibrary>,
    /// Stock footage lookup
    video_resolver: Arc<ResourceResolver>,
    /// Still image lookup
    image_resolver: Arc<ResourceResolver>,
}

impl StepContext {
    /// Creates a new context builder.
    pub fn builder() -> StepContextBuilder {
        StepContextBuilder::default()
    }

    /// Free-text completion.
    ///
    /// Transient provider failures are retried; a timeout is fatal.
    ///
    /// # Errors
    ///
    /// Returns the provider error once retries are exhausted.
    #[tracing::instrument(skip(self, request), fields(provider = self.completion.provider_name()))]
    pub async fn complete_text(&self, request: &CompletionRequest) -> ReelsmithResult<String> {
        let provider = Arc::clone(&self.completion);
        let outcome = call_with_retry(self.config.completion_retry(), || {
            let provider = Arc::clone(&provider);
            let request = request.clone();
            async move { provider.complete(&request).await }
        })
        .await;

        tracing::debug!(attempts = outcome.attempts, ok = outcome.result.is_ok(), "Completion finished");
        Ok(outcome.result?)
    }

    /// Completion that must yield JSON of shape `T`, post-processed by
    /// `interpret`.
    ///
    /// Malformed answers (no JSON, wrong shape, or rejected by `interpret`)
    /// are asked for again, up to the configured attempt budget.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] with the attempt count once the budget is spent,
    /// or the provider error if the provider itself fails.
    pub async fn complete_structured<T, U, F>(
        &self,
        request: &CompletionRequest,
        interpret: F,
    ) -> ReelsmithResult<U>
    where
        T: DeserializeOwned,
        F: Fn(T) -> Result<U, ParseError>,
    {
        let budget = (*self.config.json_attempts()).max(1);
        let mut last_error = None;

        for attempt in 1..=budget {
            let text = self.complete_text(request).await?;
            match parse_json::<T>(&text).and_then(&interpret) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(attempt, budget, error = %e.message, "Malformed structured completion");
                    last_error = Some(e);
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| ParseError::new("no completion attempts were made"))
            .with_attempts(budget);
        Err(error.into())
    }

    /// Completion that must yield JSON of shape `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        request: &CompletionRequest,
    ) -> ReelsmithResult<T> {
        self.complete_structured(request, Ok).await
    }

    /// Await a collaborator call with the configured bounded wait.
    ///
    /// # Errors
    ///
    /// Returns the call's own error, or a `Timeout` provider error.
    pub async fn bounded<T, Fut>(&self, operation: &str, call: Fut) -> ReelsmithResult<T>
    where
        Fut: Future<Output = ProviderResult<T>>,
    {
        let limit = Duration::from_secs(*self.config.collaborator_timeout_secs());
        match tokio::time::timeout(limit, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::error!(operation, limit_secs = limit.as_secs(), "Collaborator timed out");
                Err(ProviderError::new(ProviderErrorKind::Timeout(limit.as_millis() as u64)).into())
            }
        }
    }
}

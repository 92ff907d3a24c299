//! Query to asset resolution.

use crate::{QueryRewriter, ResolverConfig, RetryPolicy, best_match, call_with_retry};
use reelsmith_core::{AspectRatio, ResolvedAsset};
use reelsmith_error::ResolutionError;
use reelsmith_interface::AssetSearchProvider;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One resolution request.
///
/// # Examples
///
/// ```
/// use reelsmith_core::AspectRatio;
/// use reelsmith_resolver::ResolveRequest;
///
/// let request = ResolveRequest::builder()
///     .query("city skyline at night")
///     .target(AspectRatio::vertical())
///     .top_n(15_usize)
///     .build()
///     .unwrap();
/// assert_eq!(*request.max_attempts(), 3);
/// assert!(request.exclude().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ResolveRequest {
    /// Search text before repair
    query: String,
    /// Candidates requested per search
    #[builder(default = "5")]
    top_n: usize,
    /// Frame shape candidates are scored against
    #[builder(default = "AspectRatio::square()")]
    target: AspectRatio,
    /// Relaxed queries tried at most
    #[builder(default = "3")]
    max_attempts: usize,
    /// Subject used to anchor numeric queries
    #[builder(default)]
    main_topic: Option<String>,
    /// URLs that must not be chosen again
    #[builder(default)]
    exclude: HashSet<String>,
}

impl ResolveRequest {
    /// Creates a new request builder.
    pub fn builder() -> ResolveRequestBuilder {
        ResolveRequestBuilder::default()
    }
}

/// Successively simpler versions of a query.
///
/// The full query, then without its trailing word, then its first two
/// words. Duplicates are dropped.
///
/// # Examples
///
/// ```
/// use reelsmith_resolver::relaxations;
///
/// assert_eq!(
///     relaxations("red sports car on track"),
///     vec!["red sports car on track", "red sports car on", "red sports"]
/// );
/// assert_eq!(relaxations("sunset"), vec!["sunset"]);
/// ```
pub fn relaxations(query: &str) -> Vec<String> {
    let words: Vec<&str> = query.split_whitespace().collect();
    let mut steps = vec![words.join(" ")];

    if words.len() > 1 {
        steps.push(words[..words.len() - 1].join(" "));
    }
    if words.len() > 2 {
        steps.push(words[..2].join(" "));
    }

    steps.dedup();
    steps
}

/// Resolves text queries to assets through a search provider.
pub struct ResourceResolver {
    provider: Arc<dyn AssetSearchProvider>,
    rewriter: QueryRewriter,
    retry: RetryPolicy,
    top_n: usize,
    max_attempts: usize,
}

impl ResourceResolver {
    /// Create a resolver over `provider`.
    pub fn new(provider: Arc<dyn AssetSearchProvider>, config: &ResolverConfig) -> Self {
        Self {
            provider,
            rewriter: config.rewriter(),
            retry: config.retry().clone(),
            top_n: *config.top_n(),
            max_attempts: *config.max_attempts(),
        }
    }

    /// A request builder pre-filled with this resolver's configured limits.
    pub fn request(&self, query: impl Into<String>) -> ResolveRequestBuilder {
        let mut builder = ResolveRequest::builder();
        builder
            .query(query)
            .top_n(self.top_n)
            .max_attempts(self.max_attempts);
        builder
    }

    /// The query repair applied before the first search.
    pub fn rewriter(&self) -> &QueryRewriter {
        &self.rewriter
    }

    /// Find the best asset for a request.
    ///
    /// Returns `Ok(None)` when every relaxation came back without a usable
    /// candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the provider keeps failing or fails
    /// permanently.
    #[instrument(
        skip(self, request),
        fields(provider = self.provider.provider_name(), query = %request.query())
    )]
    pub async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<Option<ResolvedAsset>, ResolutionError> {
        let repaired = self
            .rewriter
            .repair(request.query(), request.main_topic().as_deref());
        let mut attempts = 0;

        for query in relaxations(&repaired)
            .into_iter()
            .take((*request.max_attempts()).max(1))
        {
            let provider = Arc::clone(&self.provider);
            let top_n = *request.top_n();
            let outcome = call_with_retry(&self.retry, || {
                let provider = Arc::clone(&provider);
                let query = query.clone();
                async move { provider.search(&query, top_n).await }
            })
            .await;
            attempts += outcome.attempts;

            let candidates = match outcome.result {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(query = %query, attempts, error = %e, "Search provider failed");
                    return Err(ResolutionError::new(query, attempts, e.to_string()));
                }
            };

            if let Some(asset) = best_match(&candidates, request.target(), request.exclude()) {
                info!(query = %query, url = %asset.url, "Resolved asset");
                return Ok(Some(asset));
            }

            debug!(
                query = %query,
                candidates = candidates.len(),
                "No usable candidate, relaxing query"
            );
        }

        warn!(query = %repaired, attempts, "No asset found after all relaxations");
        Ok(None)
    }
}

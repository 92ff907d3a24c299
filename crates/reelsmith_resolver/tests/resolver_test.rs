//! Resolver behaviour against scripted search providers.

use async_trait::async_trait;
use reelsmith_core::{AspectRatio, ResolvedAsset};
use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reelsmith_interface::AssetSearchProvider;
use reelsmith_resolver::{
    ResolveRequest, ResolverConfig, ResourceResolver, RetryPolicy, RewriteRule,
};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Replays scripted responses and records every query it receives.
struct ScriptedSearch {
    responses: Mutex<VecDeque<ProviderResult<Vec<ResolvedAsset>>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    fn new(responses: Vec<ProviderResult<Vec<ResolvedAsset>>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetSearchProvider for ScriptedSearch {
    async fn search(&self, query: &str, _count: usize) -> ProviderResult<Vec<ResolvedAsset>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

fn fast_config() -> ResolverConfig {
    ResolverConfig::default().with_retry(RetryPolicy::new(1_000, 2, 1))
}

fn unavailable() -> ProviderError {
    ProviderError::new(ProviderErrorKind::Http {
        status_code: 503,
        message: "Service unavailable".to_string(),
    })
}

#[tokio::test]
async fn test_scoring_picks_closest_aspect() {
    let provider = ScriptedSearch::new(vec![Ok(vec![
        ResolvedAsset::new("https://img/800x600", 800, 600),
        ResolvedAsset::new("https://img/720x720", 720, 720),
        ResolvedAsset::new("https://img/1000x500", 1000, 500),
    ])]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder()
        .query("mountain lake")
        .target(AspectRatio::new(1, 1))
        .build()
        .unwrap();
    let asset = resolver.resolve(&request).await.unwrap().unwrap();

    assert_eq!(asset, ResolvedAsset::new("https://img/720x720", 720, 720));
}

#[tokio::test]
async fn test_degrades_query_until_found() {
    let provider = ScriptedSearch::new(vec![
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec![ResolvedAsset::new("https://img/found", 720, 720)]),
    ]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder()
        .query("vintage red convertible coastal highway")
        .build()
        .unwrap();
    let asset = resolver.resolve(&request).await.unwrap();

    assert_eq!(asset.unwrap().url, "https://img/found");
    let queries = provider.queries();
    assert_eq!(queries.len(), 3);
    assert!(queries[2].split_whitespace().count() <= 2);
}

#[tokio::test]
async fn test_exhausted_relaxations_yield_none() {
    let provider = ScriptedSearch::new(vec![Ok(vec![]), Ok(vec![]), Ok(vec![])]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder()
        .query("obscure thing nobody photographs")
        .build()
        .unwrap();

    assert_eq!(resolver.resolve(&request).await.unwrap(), None);
    assert_eq!(provider.queries().len(), 3);
}

#[tokio::test]
async fn test_stops_when_no_relaxation_remains() {
    let provider = ScriptedSearch::new(vec![]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder()
        .query("sunset")
        .max_attempts(5_usize)
        .build()
        .unwrap();

    assert_eq!(resolver.resolve(&request).await.unwrap(), None);
    assert_eq!(provider.queries(), vec!["sunset".to_string()]);
}

#[tokio::test]
async fn test_numeric_query_anchored_to_topic() {
    let provider = ScriptedSearch::new(vec![Ok(vec![ResolvedAsset::new("u", 10, 10)])]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder()
        .query("87")
        .main_topic(Some("hyundai genesis".to_string()))
        .build()
        .unwrap();
    resolver.resolve(&request).await.unwrap();

    assert_eq!(provider.queries(), vec!["hyundai genesis 87".to_string()]);
}

#[tokio::test]
async fn test_rewrite_rules_from_config() {
    let provider = ScriptedSearch::new(vec![Ok(vec![ResolvedAsset::new("u", 10, 10)])]);
    let config =
        fast_config().with_rules(vec![RewriteRule::new("genesis", Some("hyundai"), "Hyundai")]);
    let resolver = ResourceResolver::new(provider.clone(), &config);

    let request = ResolveRequest::builder().query("genesis image").build().unwrap();
    resolver.resolve(&request).await.unwrap();

    assert_eq!(provider.queries(), vec!["Hyundai genesis".to_string()]);
}

#[tokio::test]
async fn test_transient_errors_retried_then_succeed() {
    let provider = ScriptedSearch::new(vec![
        Err(unavailable()),
        Ok(vec![ResolvedAsset::new("https://img/ok", 720, 720)]),
    ]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder().query("desert").build().unwrap();
    let asset = resolver.resolve(&request).await.unwrap();

    assert_eq!(asset.unwrap().url, "https://img/ok");
    assert_eq!(provider.queries(), vec!["desert".to_string(), "desert".to_string()]);
}

#[tokio::test]
async fn test_persistent_errors_become_resolution_error() {
    let provider = ScriptedSearch::new(vec![
        Err(unavailable()),
        Err(unavailable()),
        Err(unavailable()),
    ]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder().query("glacier").build().unwrap();
    let err = resolver.resolve(&request).await.unwrap_err();

    assert_eq!(err.query, "glacier");
    assert_eq!(err.attempts, 3);
    assert!(err.last_cause.contains("503"));
}

#[tokio::test]
async fn test_permanent_error_is_not_retried() {
    let provider = ScriptedSearch::new(vec![Err(ProviderError::new(ProviderErrorKind::Auth(
        "invalid key".to_string(),
    )))]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let request = ResolveRequest::builder().query("forest").build().unwrap();
    let err = resolver.resolve(&request).await.unwrap_err();

    assert_eq!(err.attempts, 1);
    assert_eq!(provider.queries().len(), 1);
}

#[tokio::test]
async fn test_excluded_urls_are_skipped() {
    let provider = ScriptedSearch::new(vec![Ok(vec![
        ResolvedAsset::new("https://vid/used", 1080, 1920),
        ResolvedAsset::new("https://vid/fresh", 720, 1280),
    ])]);
    let resolver = ResourceResolver::new(provider.clone(), &fast_config());

    let exclude: HashSet<String> = ["https://vid/used".to_string()].into_iter().collect();
    let request = ResolveRequest::builder()
        .query("neon street")
        .target(AspectRatio::vertical())
        .exclude(exclude)
        .build()
        .unwrap();

    let asset = resolver.resolve(&request).await.unwrap().unwrap();
    assert_eq!(asset.url, "https://vid/fresh");
}

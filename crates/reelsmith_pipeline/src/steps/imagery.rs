//! Image overlay planning and resolution.

use super::step_failed;
use crate::{
    JobState, PipelineConfig, Step, StepContext, StepOutput, detect_main_topic, is_generic_query,
    prompts,
};
use async_trait::async_trait;
use futures::future::join_all;
use reelsmith_core::{AspectRatio, TimedEntry, fields};
use reelsmith_error::{ParseError, ReelsmithResult};
use reelsmith_interface::CompletionRequest;
use reelsmith_resolver::is_numeric_query;
use serde::{Deserialize, Serialize};

/// One image moment proposed by the completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageQuery {
    /// Seconds into the narration
    pub timestamp: f64,
    /// Search text
    pub query: String,
}

impl ImageQuery {
    /// Create an image query.
    pub fn new(timestamp: f64, query: impl Into<String>) -> Self {
        Self {
            timestamp,
            query: query.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageQueriesResponse {
    image_queries: Vec<ImageQuery>,
}

fn total_duration(captions: &[TimedEntry<String>]) -> f64 {
    captions.iter().map(|c| c.end).fold(0.0, f64::max)
}

fn repair_image_query(query: &str, topic: Option<&str>, config: &PipelineConfig) -> String {
    let mut repaired = query.trim().to_string();
    for suffix in [" images", " image"] {
        if repaired.to_ascii_lowercase().ends_with(suffix) {
            repaired.truncate(repaired.len() - suffix.len());
            repaired = repaired.trim_end().to_string();
        }
    }

    if is_numeric_query(&repaired) {
        return match topic {
            Some(topic) => format!("{} {}", topic, repaired),
            None => config.fallback_query().clone(),
        };
    }
    if repaired.chars().count() < 3 {
        return topic
            .map(str::to_string)
            .unwrap_or_else(|| config.fallback_query().clone());
    }

    let single_word = repaired.split_whitespace().count() == 1;
    match topic {
        Some(topic) if single_word && is_generic_query(&repaired, config.generic_terms()) => {
            format!("{} {}", topic, repaired)
        }
        _ => repaired,
    }
}

/// Turn timestamped queries into overlay entries.
///
/// Timestamps outside `(0, total)` are clamped into `[1, total - 1]`. Each
/// overlay lasts until `min(t + display, next timestamp, total)`; overlays
/// left with no duration are dropped.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::steps::{ImageQuery, plan_image_overlays};
///
/// let overlays = plan_image_overlays(
///     vec![ImageQuery::new(6.0, "grille"), ImageQuery::new(2.0, "dashboard")],
///     10.0,
///     4.0,
/// );
/// assert_eq!(overlays.len(), 2);
/// assert_eq!((overlays[0].start, overlays[0].end), (2.0, 6.0));
/// assert_eq!((overlays[1].start, overlays[1].end), (6.0, 10.0));
/// ```
pub fn plan_image_overlays(
    mut queries: Vec<ImageQuery>,
    total: f64,
    display_seconds: f64,
) -> Vec<TimedEntry<String>> {
    let low = 1.0_f64.min(total / 2.0);
    let high = (total - 1.0).max(low);

    for query in &mut queries {
        if !query.timestamp.is_finite() || query.timestamp <= 0.0 || query.timestamp >= total {
            let t = if query.timestamp.is_finite() {
                query.timestamp
            } else {
                low
            };
            query.timestamp = t.clamp(low, high);
        }
    }
    queries.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let mut overlays = Vec::with_capacity(queries.len());
    for (i, query) in queries.iter().enumerate() {
        let start = query.timestamp;
        let mut end = (start + display_seconds).min(total);
        if let Some(next) = queries.get(i + 1) {
            end = end.min(next.timestamp);
        }
        if end > start {
            overlays.push(TimedEntry::new(start, end, query.query.clone()));
        }
    }
    overlays
}

/// Asks the completion provider where still images should appear.
pub struct GenerateImageQueries;

#[async_trait]
impl Step for GenerateImageQueries {
    fn name(&self) -> &'static str {
        "generate_image_queries"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::TIMED_CAPTIONS]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::MAIN_TOPIC, fields::IMAGE_QUERIES]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let captions: Vec<TimedEntry<String>> = job.get(fields::TIMED_CAPTIONS)?;
        let config = ctx.config();
        let total = total_duration(&captions);

        let text = captions
            .iter()
            .map(|c| c.payload.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let topic = detect_main_topic(&text, config.topic_rules());
        let count = config.image_count(total);

        let request = CompletionRequest::builder()
            .prompt(prompts::image_queries(&captions, count, total))
            .system(Some(prompts::IMAGE_QUERIES_SYSTEM.to_string()))
            .build()
            .map_err(|e| step_failed(self.name(), e.to_string()))?;

        let queries = ctx
            .complete_structured(&request, |response: ImageQueriesResponse| {
                if response.image_queries.is_empty() {
                    Err(ParseError::new("image_queries is empty"))
                } else {
                    Ok(response.image_queries)
                }
            })
            .await?;

        let repaired = queries
            .into_iter()
            .map(|q| {
                let query = repair_image_query(&q.query, topic.as_deref(), config);
                ImageQuery::new(q.timestamp, query)
            })
            .collect();
        let overlays = plan_image_overlays(repaired, total, *config.image_display_seconds());

        tracing::info!(
            topic = topic.as_deref().unwrap_or("none"),
            requested = count,
            overlays = overlays.len(),
            "Planned image overlays"
        );
        StepOutput::new()
            .with(fields::MAIN_TOPIC, topic)?
            .with(fields::IMAGE_QUERIES, overlays)
    }
}

/// Resolves every overlay query to an image URL.
///
/// Overlays resolve concurrently; one that finds nothing is left out.
pub struct ResolveImageUrls;

#[async_trait]
impl Step for ResolveImageUrls {
    fn name(&self) -> &'static str {
        "resolve_image_urls"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::IMAGE_QUERIES, fields::MAIN_TOPIC]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::TIMED_IMAGE_URLS]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let overlays: Vec<TimedEntry<String>> = job.get(fields::IMAGE_QUERIES)?;
        let topic: Option<String> = job.optional(fields::MAIN_TOPIC)?;
        let resolver = ctx.image_resolver();

        let mut requests = Vec::with_capacity(overlays.len());
        for overlay in &overlays {
            let request = resolver
                .request(overlay.payload.clone())
                .top_n(*ctx.config().image_top_n())
                .target(AspectRatio::square())
                .main_topic(topic.clone())
                .build()
                .map_err(|e| step_failed(self.name(), e.to_string()))?;
            requests.push(request);
        }

        let lookups = overlays.iter().zip(&requests).map(|(overlay, request)| async move {
            if overlay.payload.starts_with("http") {
                return Some(overlay.with_payload(overlay.payload.clone()));
            }
            match resolver.resolve(request).await {
                Ok(Some(asset)) => Some(overlay.with_payload(asset.url)),
                Ok(None) => {
                    tracing::warn!(query = %overlay.payload, "No image found, skipping overlay");
                    None
                }
                Err(e) => {
                    tracing::warn!(query = %overlay.payload, error = %e, "Image search failed, skipping overlay");
                    None
                }
            }
        });
        let resolved: Vec<TimedEntry<String>> = join_all(lookups).await.into_iter().flatten().collect();

        tracing::info!(
            overlays = overlays.len(),
            resolved = resolved.len(),
            "Resolved image overlays"
        );
        StepOutput::new().with(fields::TIMED_IMAGE_URLS, resolved)
    }
}

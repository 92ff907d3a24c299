//! Stock footage search terms and resolution.

use super::step_failed;
use crate::{JobState, Step, StepContext, StepOutput, prompts};
use async_trait::async_trait;
use reelsmith_core::{AspectRatio, TimedEntry, fields};
use reelsmith_error::{ParseError, ReelsmithResult};
use reelsmith_interface::CompletionRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const QUERIES_PER_SEGMENT: usize = 3;

/// A footage segment as answered by the completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    /// `[start, end]` in seconds
    pub time_range: Vec<f64>,
    /// Search queries, least specific first
    #[serde(default)]
    pub queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VideoSegmentsResponse {
    video_segments: Vec<RawSegment>,
}

/// Keep segments with a valid range inside `[0, total]`, each with exactly
/// three queries, ordered by start time.
///
/// Missing queries are padded by repeating the last one; extra queries are
/// dropped. Segments with no usable query are dropped.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::steps::{RawSegment, normalize_segments};
///
/// let segments = normalize_segments(
///     vec![
///         RawSegment { time_range: vec![0.0, 3.0], queries: vec!["forest".into()] },
///         RawSegment { time_range: vec![3.0, 2.0], queries: vec!["river".into()] },
///     ],
///     10.0,
/// );
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].payload, vec!["forest", "forest", "forest"]);
/// ```
pub fn normalize_segments(raw: Vec<RawSegment>, total: f64) -> Vec<TimedEntry<Vec<String>>> {
    let mut segments: Vec<TimedEntry<Vec<String>>> = raw
        .into_iter()
        .filter_map(|segment| {
            let [start, end] = segment.time_range[..] else {
                return None;
            };
            let entry = TimedEntry::new(start, end, ());
            if !entry.is_within(total) {
                return None;
            }

            let mut queries: Vec<String> = segment
                .queries
                .into_iter()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .collect();
            let last = queries.last()?.clone();
            queries.resize(QUERIES_PER_SEGMENT, last);
            Some(entry.with_payload(queries))
        })
        .collect();
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
}

/// Asks the completion provider for footage queries per time segment.
pub struct GenerateVideoSearchTerms;

#[async_trait]
impl Step for GenerateVideoSearchTerms {
    fn name(&self) -> &'static str {
        "generate_video_search_terms"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::TIMED_CAPTIONS]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::TIMED_VIDEO_SEARCHES]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let captions: Vec<TimedEntry<String>> = job.get(fields::TIMED_CAPTIONS)?;
        let total = captions.iter().map(|c| c.end).fold(0.0, f64::max);

        let request = CompletionRequest::builder()
            .prompt(prompts::video_searches(&captions, total))
            .system(Some(prompts::VIDEO_SEARCH_SYSTEM.to_string()))
            .build()
            .map_err(|e| step_failed(self.name(), e.to_string()))?;

        let segments = ctx
            .complete_structured(&request, |response: VideoSegmentsResponse| {
                let segments = normalize_segments(response.video_segments, total);
                if segments.is_empty() {
                    Err(ParseError::new("no valid video segments"))
                } else {
                    Ok(segments)
                }
            })
            .await?;

        tracing::info!(segments = segments.len(), "Generated footage queries");
        StepOutput::new().with(fields::TIMED_VIDEO_SEARCHES, segments)
    }
}

/// Picks one stock clip per segment.
///
/// Segments resolve in order so that no clip is used twice.
pub struct ResolveVideoUrls;

#[async_trait]
impl Step for ResolveVideoUrls {
    fn name(&self) -> &'static str {
        "resolve_video_urls"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::TIMED_VIDEO_SEARCHES, fields::FORMAT_VERTICAL]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::TIMED_VIDEO_URLS]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let segments: Vec<TimedEntry<Vec<String>>> = job.get(fields::TIMED_VIDEO_SEARCHES)?;
        let vertical: bool = job.get(fields::FORMAT_VERTICAL)?;
        let target = AspectRatio::for_orientation(vertical);
        let resolver = ctx.video_resolver();

        let mut used: HashSet<String> = HashSet::new();
        let mut resolved = Vec::with_capacity(segments.len());

        for segment in &segments {
            let mut chosen = None;
            for query in segment.payload.iter().rev() {
                let request = resolver
                    .request(query.clone())
                    .top_n(*ctx.config().video_top_n())
                    .target(target)
                    .exclude(used.clone())
                    .build()
                    .map_err(|e| step_failed(self.name(), e.to_string()))?;

                match resolver.resolve(&request).await {
                    Ok(Some(asset)) => {
                        chosen = Some(asset.url);
                        break;
                    }
                    Ok(None) => tracing::debug!(query = %query, "No footage for query"),
                    Err(e) => tracing::warn!(query = %query, error = %e, "Footage search failed"),
                }
            }

            match chosen {
                Some(url) => {
                    used.insert(url.clone());
                    resolved.push(segment.with_payload(url));
                }
                None => tracing::warn!(
                    start = segment.start,
                    end = segment.end,
                    "No footage for segment, leaving it uncovered"
                ),
            }
        }

        tracing::info!(
            segments = segments.len(),
            resolved = resolved.len(),
            "Resolved footage"
        );
        StepOutput::new().with(fields::TIMED_VIDEO_URLS, resolved)
    }
}

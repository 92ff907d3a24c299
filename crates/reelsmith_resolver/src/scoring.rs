//! Candidate scoring.

use reelsmith_core::{AspectRatio, ResolvedAsset};
use std::collections::HashSet;

/// Pick the candidate whose aspect ratio is closest to `target`.
///
/// Zero-dimension and excluded candidates are discarded. Ties go to the
/// candidate seen first.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{AspectRatio, ResolvedAsset};
/// use reelsmith_resolver::best_match;
/// use std::collections::HashSet;
///
/// let candidates = vec![
///     ResolvedAsset::new("a", 800, 600),
///     ResolvedAsset::new("b", 720, 720),
///     ResolvedAsset::new("c", 1000, 500),
/// ];
/// let best = best_match(&candidates, &AspectRatio::square(), &HashSet::new()).unwrap();
/// assert_eq!(best.url, "b");
/// ```
pub fn best_match(
    candidates: &[ResolvedAsset],
    target: &AspectRatio,
    exclude: &HashSet<String>,
) -> Option<ResolvedAsset> {
    let mut best: Option<(&ResolvedAsset, f64)> = None;

    for candidate in candidates {
        if exclude.contains(&candidate.url) {
            continue;
        }
        let Some(distance) = candidate.aspect_distance(target) else {
            continue;
        };
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(asset, _)| asset.clone())
}

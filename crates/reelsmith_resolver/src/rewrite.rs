//! Deterministic query repair.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static IMAGE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bimages?\b").expect("Valid image-word regex")
});

/// A brand or synonym rule applied to search queries.
///
/// When the lower-cased query contains `contains` and does not contain
/// `unless`, `prepend` is placed in front of it.
///
/// # Examples
///
/// ```
/// use reelsmith_resolver::RewriteRule;
///
/// let rule = RewriteRule::new("genesis", Some("hyundai"), "Hyundai");
/// assert_eq!(rule.apply("genesis interior").as_deref(), Some("Hyundai genesis interior"));
/// assert_eq!(rule.apply("hyundai genesis"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RewriteRule {
    /// Lower-case term that triggers the rule
    contains: String,
    /// Lower-case term that suppresses the rule
    #[serde(default)]
    unless: Option<String>,
    /// Text placed before the query
    prepend: String,
}

impl RewriteRule {
    /// Create a rule.
    pub fn new(
        contains: impl Into<String>,
        unless: Option<&str>,
        prepend: impl Into<String>,
    ) -> Self {
        Self {
            contains: contains.into().to_lowercase(),
            unless: unless.map(str::to_lowercase),
            prepend: prepend.into(),
        }
    }

    /// The rewritten query, or `None` if the rule does not apply.
    pub fn apply(&self, query: &str) -> Option<String> {
        let lower = query.to_lowercase();
        if !lower.contains(&self.contains) {
            return None;
        }
        if self.unless.as_deref().is_some_and(|u| lower.contains(u)) {
            return None;
        }
        Some(format!("{} {}", self.prepend, query))
    }
}

/// True when the query is only digits, ignoring thousands separators.
///
/// # Examples
///
/// ```
/// use reelsmith_resolver::is_numeric_query;
///
/// assert!(is_numeric_query("87"));
/// assert!(is_numeric_query(" 10,000 "));
/// assert!(!is_numeric_query("87 mph"));
/// assert!(!is_numeric_query(""));
/// ```
pub fn is_numeric_query(query: &str) -> bool {
    let digits: String = query.trim().chars().filter(|c| *c != ',').collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Repairs queries before they reach the search provider.
#[derive(Debug, Clone, PartialEq, Default, derive_getters::Getters)]
pub struct QueryRewriter {
    /// Brand and synonym rules, applied in order
    rules: Vec<RewriteRule>,
    /// Query used when a numeric query has no topic to anchor it
    numeric_fallback: String,
}

impl QueryRewriter {
    /// Create a rewriter.
    pub fn new(rules: Vec<RewriteRule>, numeric_fallback: impl Into<String>) -> Self {
        Self {
            rules,
            numeric_fallback: numeric_fallback.into(),
        }
    }

    /// Repair a query.
    ///
    /// Removes the word "image", anchors numeric queries to the topic (or the
    /// fallback), then applies the rule table.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_resolver::QueryRewriter;
    ///
    /// let rewriter = QueryRewriter::new(vec![], "car");
    /// assert_eq!(rewriter.repair("87", Some("hyundai genesis")), "hyundai genesis 87");
    /// assert_eq!(rewriter.repair("87", None), "car");
    /// assert_eq!(rewriter.repair("dashboard image", None), "dashboard");
    /// ```
    pub fn repair(&self, query: &str, topic: Option<&str>) -> String {
        let stripped = IMAGE_WORD.replace_all(query, " ");
        let mut repaired = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        let topic = topic.map(str::trim).filter(|t| !t.is_empty());

        if is_numeric_query(&repaired) {
            repaired = match topic {
                Some(topic) => format!("{} {}", topic, repaired),
                None => self.numeric_fallback.clone(),
            };
        } else if repaired.is_empty() {
            repaired = topic
                .map(str::to_string)
                .unwrap_or_else(|| self.numeric_fallback.clone());
        }

        for rule in &self.rules {
            if let Some(rewritten) = rule.apply(&repaired) {
                tracing::debug!(from = %repaired, to = %rewritten, "Applied rewrite rule");
                repaired = rewritten;
            }
        }

        repaired
    }
}

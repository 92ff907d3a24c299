//! Resolver configuration.

use crate::{QueryRewriter, RetryPolicy, RewriteRule};
use serde::{Deserialize, Serialize};

/// Settings shared by every resolution in a run.
///
/// Loaded from the `[resolver]` table of `reelsmith.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ResolverConfig {
    /// Candidates requested per search
    #[serde(default = "default_top_n")]
    top_n: usize,
    /// Query relaxations tried per resolution
    #[serde(default = "default_max_attempts")]
    max_attempts: usize,
    /// Query used for numeric queries with no known topic
    #[serde(default = "default_numeric_fallback")]
    numeric_fallback: String,
    /// Bounded wait and backoff for search calls
    #[serde(default)]
    retry: RetryPolicy,
    /// Brand and synonym rewrites
    #[serde(default)]
    rules: Vec<RewriteRule>,
}

fn default_top_n() -> usize {
    5
}

fn default_max_attempts() -> usize {
    3
}

fn default_numeric_fallback() -> String {
    "car".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            max_attempts: default_max_attempts(),
            numeric_fallback: default_numeric_fallback(),
            retry: RetryPolicy::default(),
            rules: Vec::new(),
        }
    }
}

impl ResolverConfig {
    /// Same configuration with a different retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Same configuration with a different rule table.
    pub fn with_rules(mut self, rules: Vec<RewriteRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Build the query rewriter described by this configuration.
    pub fn rewriter(&self) -> QueryRewriter {
        QueryRewriter::new(self.rules.clone(), self.numeric_fallback.clone())
    }
}

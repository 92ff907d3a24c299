//! Resource resolution for Reelsmith.
//!
//! Turns a text query into a single visual asset: the query is repaired,
//! sent to an [`AssetSearchProvider`](reelsmith_interface::AssetSearchProvider),
//! candidates are scored against a target aspect ratio, and the query is
//! relaxed when nothing usable comes back.
//!
//! Transient provider failures are retried with exponential backoff via
//! [`call_with_retry`], which the pipeline also uses for completion calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod resolver;
mod retry;
mod rewrite;
mod scoring;

pub use config::ResolverConfig;
pub use resolver::{ResolveRequest, ResolveRequestBuilder, ResourceResolver, relaxations};
pub use retry::{RetryOutcome, RetryPolicy, call_with_retry};
pub use rewrite::{QueryRewriter, RewriteRule, is_numeric_query};
pub use scoring::best_match;

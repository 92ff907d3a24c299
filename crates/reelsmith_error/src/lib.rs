//! Error types for the Reelsmith pipeline.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! [`ReelsmithError`] unifies them for use across crate boundaries.
//!
//! # Examples
//!
//! ```
//! use reelsmith_error::{ReelsmithResult, ConfigError};
//!
//! fn load() -> ReelsmithResult<String> {
//!     Err(ConfigError::new("missing checkpoint_dir"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod parse;
mod persistence;
mod pipeline;
mod provider;
mod resolution;

pub use config::ConfigError;
pub use error::{ReelsmithError, ReelsmithErrorKind, ReelsmithResult, StepError};
pub use parse::ParseError;
pub use persistence::{PersistenceError, PersistenceErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use provider::{ProviderError, ProviderErrorKind, ProviderResult, RetryableError};
pub use resolution::ResolutionError;

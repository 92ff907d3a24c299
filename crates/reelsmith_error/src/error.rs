//! Top-level error wrapper types.

use crate::{
    ConfigError, ParseError, PersistenceError, PipelineError, ProviderError, ResolutionError,
};

/// The foundation error enum.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithError, ConfigError};
///
/// let err: ReelsmithError = ConfigError::new("bad value").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReelsmithErrorKind {
    /// Executor-level failure, including precondition violations
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// External collaborator failure
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Unparseable provider response
    #[from(ParseError)]
    Parse(ParseError),
    /// Resolver gave up on a query
    #[from(ResolutionError)]
    Resolution(ResolutionError),
    /// Checkpoint read/write failure
    #[from(PersistenceError)]
    Persistence(PersistenceError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Failure escaping a step body, annotated with job and step
    #[from(StepError)]
    Step(StepError),
}

/// Reelsmith error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reelsmith Error: {}", _0)]
pub struct ReelsmithError(Box<ReelsmithErrorKind>);

impl ReelsmithError {
    /// Create a new error from a kind.
    pub fn new(kind: ReelsmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelsmithErrorKind {
        &self.0
    }

    /// The innermost error, looking through step annotations.
    pub fn root_kind(&self) -> &ReelsmithErrorKind {
        match self.kind() {
            ReelsmithErrorKind::Step(step) => step.cause.root_kind(),
            kind => kind,
        }
    }

    /// Name of the missing field when the root cause is a precondition failure.
    pub fn missing_field(&self) -> Option<&str> {
        match self.root_kind() {
            ReelsmithErrorKind::Pipeline(err) => err.missing_field(),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to ReelsmithErrorKind
impl<T> From<T> for ReelsmithError
where
    T: Into<ReelsmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// A failure that escaped a step body, with enough context to resume later.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ParseError, ReelsmithError, StepError};
///
/// let cause: ReelsmithError = ParseError::new("no JSON").into();
/// let err = StepError::new("job-7", "generate_image_queries", cause);
/// assert!(format!("{}", err).contains("job-7"));
/// assert!(format!("{}", err).contains("generate_image_queries"));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Step '{}' failed for job {}: {}", step, job_id, cause)]
pub struct StepError {
    /// Job being executed
    pub job_id: String,
    /// Step that failed
    pub step: String,
    /// Underlying error
    #[error(source)]
    pub cause: Box<ReelsmithError>,
}

impl StepError {
    /// Annotate an error with its job and step.
    pub fn new(job_id: impl Into<String>, step: impl Into<String>, cause: ReelsmithError) -> Self {
        Self {
            job_id: job_id.into(),
            step: step.into(),
            cause: Box::new(cause),
        }
    }
}

/// Result type for Reelsmith operations.
pub type ReelsmithResult<T> = std::result::Result<T, ReelsmithError>;

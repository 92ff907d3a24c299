//! Pipeline executor error types.

/// Specific error conditions raised by the executor itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// A step's required field is not populated.
    ///
    /// This is a step-ordering bug, never a user error, and is never retried.
    #[display("Step '{}' of job {} requires field '{}' which is not populated", step, job_id, field)]
    MissingField {
        /// Job being executed
        job_id: String,
        /// Step whose precondition failed
        step: String,
        /// Name of the missing field
        field: String,
    },
    /// A step body returned without one of its declared outputs
    #[display("Step '{}' did not produce declared field '{}'", step, field)]
    MissingOutput {
        /// Step that misbehaved
        step: String,
        /// Field it failed to produce
        field: String,
    },
    /// A step body returned a field it did not declare
    #[display("Step '{}' produced undeclared field '{}'", step, field)]
    UndeclaredOutput {
        /// Step that misbehaved
        step: String,
        /// Field it should not have written
        field: String,
    },
    /// A populated field holds a value of the wrong shape
    #[display("Field '{}' has unexpected shape: {}", field, message)]
    FieldType {
        /// Field name
        field: String,
        /// Decoder message
        message: String,
    },
    /// Step registry violates ordering rules
    #[display("Invalid step registry: {}", _0)]
    InvalidRegistry(String),
    /// Seed fields supplied by the caller are unusable
    #[display("Invalid job seed: {}", _0)]
    InvalidSeed(String),
    /// Field is not produced by any registered step
    #[display("No step produces field '{}'", _0)]
    UnknownField(String),
    /// A step could not complete its own work
    #[display("Step '{}' failed: {}", step, message)]
    StepFailed {
        /// Step name
        step: String,
        /// What went wrong
        message: String,
    },
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::MissingField {
///     job_id: "job-1".to_string(),
///     step: "time_captions".to_string(),
///     field: "audio_path".to_string(),
/// });
/// assert!(format!("{}", err).contains("audio_path"));
/// assert_eq!(err.missing_field(), Some("audio_path"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Name of the missing field when this is a precondition failure.
    pub fn missing_field(&self) -> Option<&str> {
        match &self.kind {
            PipelineErrorKind::MissingField { field, .. } => Some(field),
            _ => None,
        }
    }
}

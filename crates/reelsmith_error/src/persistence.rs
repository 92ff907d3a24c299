//! Checkpoint persistence error types.

/// Kinds of checkpoint persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PersistenceErrorKind {
    /// Failed to create the checkpoint directory
    #[display("Failed to create checkpoint directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a checkpoint file
    #[display("Failed to write checkpoint: {}", _0)]
    FileWrite(String),
    /// Failed to read a checkpoint file
    #[display("Failed to read checkpoint: {}", _0)]
    FileRead(String),
    /// Failed to delete a checkpoint file
    #[display("Failed to delete checkpoint: {}", _0)]
    FileDelete(String),
    /// Checkpoint content is not valid JSON
    #[display("Corrupt checkpoint for job {}: {}", job_id, message)]
    Corrupt {
        /// Job whose checkpoint is unreadable
        job_id: String,
        /// Decoder message
        message: String,
    },
    /// Value could not be serialized
    #[display("Failed to serialize field '{}': {}", field, message)]
    Serialization {
        /// Field being written
        field: String,
        /// Encoder message
        message: String,
    },
    /// No checkpoint exists for the job
    #[display("No checkpoint for job {}", _0)]
    UnknownJob(String),
    /// Job id cannot be mapped to a storage location
    #[display("Invalid job id '{}'", _0)]
    InvalidJobId(String),
}

/// Persistence error with location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{PersistenceError, PersistenceErrorKind};
///
/// let err = PersistenceError::new(PersistenceErrorKind::InvalidJobId("../x".to_string()));
/// assert!(format!("{}", err).contains("Invalid job id"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Persistence Error: {} at line {} in {}", kind, line, file)]
pub struct PersistenceError {
    /// The kind of error that occurred
    pub kind: PersistenceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PersistenceError {
    /// Create a new persistence error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PersistenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

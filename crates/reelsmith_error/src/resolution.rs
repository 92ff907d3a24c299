//! Resource resolution error types.

/// The resolver could not obtain candidates for a query.
///
/// Steps downgrade this to "no asset for this segment" instead of failing
/// the run.
///
/// # Examples
///
/// ```
/// use reelsmith_error::ResolutionError;
///
/// let err = ResolutionError::new("hyundai genesis interior", 5, "HTTP 503 error");
/// assert_eq!(err.attempts, 5);
/// assert!(format!("{}", err).contains("hyundai genesis interior"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Resolution Error: no asset for '{}' after {} attempt(s), last cause: {} at line {} in {}",
    query,
    attempts,
    last_cause,
    line,
    file
)]
pub struct ResolutionError {
    /// Query as last sent to the provider
    pub query: String,
    /// Provider calls made, including retries
    pub attempts: usize,
    /// Description of the final failure
    pub last_cause: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ResolutionError {
    /// Create a new ResolutionError at the current location.
    #[track_caller]
    pub fn new(query: impl Into<String>, attempts: usize, last_cause: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            query: query.into(),
            attempts,
            last_cause: last_cause.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

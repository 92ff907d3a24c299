//! Errors for provider responses that could not be interpreted.

/// A provider answered, but not with the structured data the caller expected.
///
/// For retry purposes this behaves like a transient provider failure: the
/// completion helper asks again until its attempt budget is spent.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} after {} attempt(s) at line {} in {}", message, attempts, line, file)]
pub struct ParseError {
    /// What could not be parsed
    pub message: String,
    /// Number of attempts made before giving up
    pub attempts: usize,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError for a single failed attempt.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_error::ParseError;
    ///
    /// let err = ParseError::new("no JSON object in response").with_attempts(4);
    /// assert_eq!(err.attempts, 4);
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            attempts: 1,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Record how many attempts were made.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }
}

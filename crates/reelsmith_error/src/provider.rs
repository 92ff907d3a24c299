//! External collaborator error types and retry classification.

/// Failure conditions reported by completion, search, narration,
/// transcription and rendering collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Credentials missing or rejected
    #[display("Authentication failed: {}", _0)]
    Auth(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Provider asked the caller to slow down
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// No answer within the bounded wait
    #[display("Timed out after {}ms", _0)]
    Timeout(u64),
    /// TLS handshake or certificate failure
    #[display("TLS failure: {}", _0)]
    Tls(String),
    /// Connection-level failure
    #[display("Network failure: {}", _0)]
    Network(String),
    /// Response body did not match the provider's documented shape
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
    /// External command exited unsuccessfully
    #[display("Command '{}' failed: {}", program, message)]
    Command {
        /// Program that was run
        program: String,
        /// Exit status or stderr excerpt
        message: String,
    },
    /// Renderer could not produce the output file
    #[display("Render failed: {}", _0)]
    Render(String),
}

impl ProviderErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ProviderErrorKind::RateLimited(_) => true,
            ProviderErrorKind::Timeout(_) => true,
            ProviderErrorKind::Tls(_) => true,
            ProviderErrorKind::Network(_) => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            ProviderErrorKind::Http { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 5, 60),
            },
            ProviderErrorKind::RateLimited(_) => (5000, 3, 40),
            ProviderErrorKind::Tls(_) => (1000, 5, 10),
            ProviderErrorKind::Timeout(_) => (1000, 3, 10),
            _ => (2000, 5, 60),
        }
    }
}

/// Collaborator error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Http {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let auth = ProviderError::new(ProviderErrorKind::Auth("bad key".to_string()));
/// assert!(!auth.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for collaborator calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Trait for errors that support retry logic.
///
/// Transient conditions like 503, 429 or a timed-out request return true;
/// permanent ones like 401 or a malformed request return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 5, 60)
    }
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}

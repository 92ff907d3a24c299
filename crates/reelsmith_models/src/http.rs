//! Mapping HTTP failures onto provider errors.

use reelsmith_error::{ProviderError, ProviderErrorKind};

/// Classify an unsuccessful HTTP status.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ProviderErrorKind, RetryableError};
/// use reelsmith_models::status_error;
///
/// assert!(matches!(status_error(401, "no").kind, ProviderErrorKind::Auth(_)));
/// assert!(status_error(429, "slow down").is_retryable());
/// assert!(!status_error(400, "bad").is_retryable());
/// ```
pub fn status_error(status: u16, body: &str) -> ProviderError {
    let message = body.trim().chars().take(500).collect::<String>();
    let kind = match status {
        401 | 403 => ProviderErrorKind::Auth(message),
        429 => ProviderErrorKind::RateLimited(message),
        _ => ProviderErrorKind::Http {
            status_code: status,
            message,
        },
    };
    ProviderError::new(kind)
}

/// Classify a transport-level failure.
pub fn request_error(error: reqwest::Error) -> ProviderError {
    let text = error.to_string();
    let kind = if error.is_timeout() {
        ProviderErrorKind::Timeout(0)
    } else if text.contains("certificate") || text.to_lowercase().contains("tls") {
        ProviderErrorKind::Tls(text)
    } else if error.is_decode() {
        ProviderErrorKind::InvalidResponse(text)
    } else if let Some(status) = error.status() {
        return status_error(status.as_u16(), &text);
    } else {
        ProviderErrorKind::Network(text)
    };
    ProviderError::new(kind)
}

/// Read a JSON body, mapping unsuccessful statuses first.
pub(crate) async fn json_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Provider returned an error status");
        return Err(status_error(status.as_u16(), &body));
    }
    response.json::<T>().await.map_err(|e| {
        ProviderError::new(ProviderErrorKind::InvalidResponse(format!(
            "Failed to parse response: {}",
            e
        )))
    })
}

/// Read an API key from the named environment variable.
pub(crate) fn api_key(env_var: &str) -> Result<String, ProviderError> {
    std::env::var(env_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ProviderError::new(ProviderErrorKind::Auth(format!("{} not set", env_var))))
}

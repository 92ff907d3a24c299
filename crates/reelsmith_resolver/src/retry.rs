//! Bounded calls with exponential backoff.

use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult, RetryableError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, warn};

/// How a provider call is bounded and retried.
///
/// Backoff parameters left unset fall back to the error-specific strategy of
/// the first failure (see [`RetryableError::retry_strategy_params`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Maximum wait for a single call, in milliseconds
    #[serde(default = "default_call_timeout_ms")]
    call_timeout_ms: u64,
    /// Whether a timed-out call is retried or fatal
    #[serde(default = "default_retry_timeouts")]
    retry_timeouts: bool,
    /// Override for the number of retries after the first call
    #[serde(default)]
    max_retries: Option<usize>,
    /// Override for the first backoff delay
    #[serde(default)]
    initial_backoff_ms: Option<u64>,
    /// Override for the backoff ceiling
    #[serde(default)]
    max_delay_secs: Option<u64>,
}

fn default_call_timeout_ms() -> u64 {
    30_000
}

fn default_retry_timeouts() -> bool {
    true
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            call_timeout_ms: default_call_timeout_ms(),
            retry_timeouts: default_retry_timeouts(),
            max_retries: None,
            initial_backoff_ms: None,
            max_delay_secs: None,
        }
    }
}

impl RetryPolicy {
    /// Policy with explicit backoff parameters.
    pub fn new(call_timeout_ms: u64, max_retries: usize, initial_backoff_ms: u64) -> Self {
        Self {
            call_timeout_ms,
            retry_timeouts: true,
            max_retries: Some(max_retries),
            initial_backoff_ms: Some(initial_backoff_ms),
            max_delay_secs: None,
        }
    }

    /// Same policy, but timeouts end the call immediately.
    pub fn with_fatal_timeouts(mut self) -> Self {
        self.retry_timeouts = false;
        self
    }

    /// Same policy with a different per-call timeout.
    pub fn with_call_timeout_ms(mut self, call_timeout_ms: u64) -> Self {
        self.call_timeout_ms = call_timeout_ms;
        self
    }

    fn strategy_for(&self, error: &ProviderError) -> (u64, usize, u64) {
        let (initial_ms, retries, max_delay) = error.retry_strategy_params();
        (
            self.initial_backoff_ms.unwrap_or(initial_ms),
            self.max_retries.unwrap_or(retries),
            self.max_delay_secs.unwrap_or(max_delay),
        )
    }

    fn is_transient(&self, error: &ProviderError) -> bool {
        match error.kind {
            ProviderErrorKind::Timeout(_) => self.retry_timeouts,
            _ => error.is_retryable(),
        }
    }
}

/// Result of a retried call together with the number of calls made.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Final result
    pub result: ProviderResult<T>,
    /// Calls made, including the first
    pub attempts: usize,
}

async fn bounded<T, Fut>(timeout: Duration, call: Fut) -> ProviderResult<T>
where
    Fut: Future<Output = ProviderResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::new(ProviderErrorKind::Timeout(
            timeout.as_millis() as u64,
        ))),
    }
}

/// Run `operation` under `policy`.
///
/// Each call is bounded by the policy's timeout. Transient failures are
/// retried with exponential backoff and jitter; permanent failures, and the
/// last transient failure once retries run out, are returned as is.
///
/// # Examples
///
/// ```
/// use reelsmith_resolver::{RetryPolicy, call_with_retry};
///
/// # tokio_test_block(async {
/// let outcome = call_with_retry(&RetryPolicy::default(), || async { Ok::<_, _>(42) }).await;
/// assert_eq!(outcome.result.unwrap(), 42);
/// assert_eq!(outcome.attempts, 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub async fn call_with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let timeout = Duration::from_millis(policy.call_timeout_ms);

    // The first failure picks the backoff strategy
    let first_error = match bounded(timeout, operation()).await {
        Ok(value) => {
            return RetryOutcome {
                result: Ok(value),
                attempts: 1,
            };
        }
        Err(e) => e,
    };

    if !policy.is_transient(&first_error) {
        warn!(error = %first_error, "Permanent provider error, failing immediately");
        return RetryOutcome {
            result: Err(first_error),
            attempts: 1,
        };
    }

    let (initial_ms, max_retries, max_delay_secs) = policy.strategy_for(&first_error);
    debug!(
        error = %first_error,
        initial_backoff_ms = initial_ms,
        max_retries,
        max_delay_secs,
        "Provider call failed, will retry with configured strategy"
    );

    if max_retries == 0 {
        return RetryOutcome {
            result: Err(first_error),
            attempts: 1,
        };
    }

    let mut delays = ExponentialBackoff::from_millis(initial_ms)
        .factor(2)
        .max_delay(Duration::from_secs(max_delay_secs))
        .map(jitter)
        .take(max_retries);

    // Retry::spawn calls once before consuming any delay, so that call is
    // the first retry and waits out the first delay here.
    if let Some(delay) = delays.next() {
        tokio::time::sleep(delay).await;
    }

    let attempts = AtomicUsize::new(1);
    let result = Retry::spawn(delays, || {
        attempts.fetch_add(1, Ordering::Relaxed);
        let call = operation();
        async move {
            match bounded(timeout, call).await {
                Ok(value) => Ok(value),
                Err(e) if policy.is_transient(&e) => {
                    warn!(error = %e, "Provider call failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent provider error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        }
    })
    .await;

    RetryOutcome {
        result,
        attempts: attempts.load(Ordering::Relaxed),
    }
}

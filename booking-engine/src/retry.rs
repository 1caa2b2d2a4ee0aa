//! Retry Executor
//!
//! Bounded retry around an async operation. Attempts are immediate unless
//! the policy carries a delay; the operation itself is expected to await
//! whatever it needs.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Called after every failed attempt with the error and the 1-based attempt number
pub type ErrorCallback<E> = Box<dyn Fn(&E, u32) + Send + Sync>;

/// Called once when every attempt failed
pub type FinalErrorCallback<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Retry configuration
pub struct RetryPolicy<E> {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Wait between attempts
    pub delay: Duration,
    on_error: Option<ErrorCallback<E>>,
    on_final_error: Option<FinalErrorCallback<E>>,
}

impl<E> RetryPolicy<E> {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            delay: Duration::ZERO,
            on_error: None,
            on_final_error: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&E, u32) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn on_final_error(mut self, callback: impl Fn(&E) + Send + Sync + 'static) -> Self {
        self.on_final_error = Some(Box::new(callback));
        self
    }

    /// Total number of attempts, first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .field("on_error", &self.on_error.is_some())
            .field("on_final_error", &self.on_final_error.is_some())
            .finish()
    }
}

/// Run `operation` until it succeeds or `max_retries + 1` attempts failed
///
/// `on_error` fires after each failed attempt (including the last one);
/// `on_final_error` fires exactly once, only after exhaustion, and the last
/// error is returned.
pub async fn execute_with_retry<T, E, F, Fut>(mut operation: F, policy: &RetryPolicy<E>) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                if let Some(on_error) = &policy.on_error {
                    on_error(&e, attempt);
                }

                if attempt >= max_attempts {
                    tracing::error!(
                        attempts = attempt,
                        max_retries = policy.max_retries,
                        "Operation failed, all retries exhausted: {e}"
                    );
                    if let Some(on_final_error) = &policy.on_final_error {
                        on_final_error(&e);
                    }
                    return Err(e);
                }

                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    "Operation attempt failed, retrying: {e}"
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}

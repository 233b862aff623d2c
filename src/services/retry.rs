//! Retry with linear backoff for gateway calls.
//!
//! An operation is attempted at most `max_retries + 1` times. After a failed
//! attempt `n` (1-based) that the predicate accepts, the policy sleeps
//! `base_delay * n` before trying again. A failure the predicate rejects, or
//! the failure of the last attempt, is returned unchanged. `run_with_backoff`
//! takes the wait as a function of the attempt number instead.

use std::future::Future;
use std::time::Duration;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.paymongo_max_retries,
            Duration::from_millis(config.paymongo_retry_delay_ms),
        )
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `operation` under this policy with its linear backoff.
    ///
    /// `operation` is invoked once per attempt and must rebuild its future each
    /// time; anything that has to stay stable across attempts (the idempotency
    /// key) is captured by the closure, not regenerated inside it.
    pub async fn run<T, E, F, Fut, P>(&self, operation: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        self.run_with_backoff(operation, should_retry, |attempt| self.backoff(attempt))
            .await
    }

    /// Run `operation` with a caller-supplied backoff.
    ///
    /// `backoff(n)` is the wait after failed attempt `n` (1-based). Only the
    /// attempt limit comes from the policy.
    pub async fn run_with_backoff<T, E, F, Fut, P, B>(
        &self,
        mut operation: F,
        should_retry: P,
        backoff: B,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        B: Fn(u32) -> Duration,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts() && should_retry(&err) => {
                    let delay = backoff(attempt);
                    tracing::debug!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Gateway call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

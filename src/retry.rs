//! Exponential backoff for article fetches.
//!
//! [`Retrying`] decorates any [`Fetch`] implementation and re-issues the
//! request while the error is transient (timeouts, network failures, and
//! HTTP 502/503/504). Any other status is returned on the first attempt.
//!
//! # Backoff Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```
//!
//! Jitter is skipped when `base_delay` is zero.

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::scrapers::fetch::Fetch;
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Bounds for the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.backoff_base_ms),
            max_delay: Duration::from_millis(config.max_backoff_ms),
        }
    }

    /// Delay before the retry that follows failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << shift).min(self.max_delay)
    }

    fn jittered(&self, attempt: u32) -> Duration {
        let delay = self.delay_for(attempt);
        if self.base_delay.is_zero() {
            return delay;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

/// A [`Fetch`] decorator that retries transient failures with backoff.
pub struct Retrying<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> Retrying<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T> fmt::Debug for Retrying<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrying").field("policy", &self.policy).finish()
    }
}

impl<T> Fetch for Retrying<T>
where
    T: Fetch + Sync,
{
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    let total_ms = total_t0.elapsed().as_millis() as u64;
                    if attempt >= self.policy.max_attempts {
                        error!(
                            attempt,
                            max = self.policy.max_attempts,
                            elapsed_ms_total = total_ms,
                            error = %e,
                            "fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.policy.jittered(attempt);
                    warn!(
                        attempt,
                        max = self.policy.max_attempts,
                        elapsed_ms_total = total_ms,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

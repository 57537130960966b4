//! Retry with exponential backoff and an optional per-attempt timeout.
//!
//! A [`RetryPolicy`] is a plain value. Per-call adjustments arrive as a
//! [`PlanOverride`] and are merged into a fresh policy with
//! [`RetryPolicy::merged`]; nothing here holds global mutable state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::RelayError;

/// Upper bound applied to every `max_retries` value.
pub const MAX_RETRIES_CEILING: u32 = 5;

/// Plan key overriding the retry budget.
pub const PLAN_MAX_RETRIES: &str = "max_retries";
/// Plan key overriding the initial backoff delay, in seconds.
pub const PLAN_BACKOFF_SECONDS: &str = "backoff_seconds";
/// Plan key overriding the per-attempt timeout, in seconds.
pub const PLAN_TIMEOUT_SECONDS: &str = "timeout_seconds";

const MAX_DELAY_SECS: f64 = 3600.0;

/// Decides whether a failed attempt is retried.
pub type RetryPredicate = Arc<dyn Fn(&RelayError) -> bool + Send + Sync>;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt, clamped to `0..=5`.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Bound on a single attempt. `None` means unbounded.
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
            timeout: None,
        }
    }
}

/// Caller-supplied partial policy attached to one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanOverride {
    pub max_retries: Option<i64>,
    pub backoff_seconds: Option<f64>,
    pub timeout_seconds: Option<i64>,
}

impl PlanOverride {
    /// Remove the plan keys from `args` and return whatever parsed.
    ///
    /// Returns `None` when none of the keys were present. Values of the wrong
    /// shape are dropped from `args` but otherwise ignored.
    pub fn take_from(args: &mut Map<String, Value>) -> Option<Self> {
        let max_retries = args.remove(PLAN_MAX_RETRIES);
        let backoff = args.remove(PLAN_BACKOFF_SECONDS);
        let timeout = args.remove(PLAN_TIMEOUT_SECONDS);

        if max_retries.is_none() && backoff.is_none() && timeout.is_none() {
            return None;
        }

        Some(Self {
            max_retries: max_retries.as_ref().and_then(as_integer),
            backoff_seconds: backoff.as_ref().and_then(as_float),
            timeout_seconds: timeout.as_ref().and_then(as_integer),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.max_retries.is_none() && self.backoff_seconds.is_none() && self.timeout_seconds.is_none()
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn as_float(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|f: &f64| f.is_finite())
}

impl RetryPolicy {
    /// Bring every field into its valid range.
    pub fn clamped(mut self) -> Self {
        self.max_retries = self.max_retries.min(MAX_RETRIES_CEILING);
        if !self.backoff_factor.is_finite() || self.backoff_factor < 0.0 {
            self.backoff_factor = 1.0;
        }
        self.timeout = self.timeout.filter(|t| !t.is_zero());
        self
    }

    /// Layer a plan override over this policy.
    pub fn merged(&self, plan: Option<&PlanOverride>) -> Self {
        let mut policy = self.clone();
        let Some(plan) = plan else {
            return policy.clamped();
        };

        if let Some(retries) = plan.max_retries {
            policy.max_retries = retries.clamp(0, MAX_RETRIES_CEILING as i64) as u32;
        }
        if let Some(secs) = plan.backoff_seconds.filter(|s| *s >= 0.0) {
            policy.initial_delay = Duration::from_secs_f64(secs.min(MAX_DELAY_SECS));
        }
        if let Some(secs) = plan.timeout_seconds {
            policy.timeout = (secs > 0).then(|| Duration::from_secs(secs as u64));
        }

        policy.clamped()
    }

    /// Execute an async operation, retrying errors in the default retryable set.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, RelayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RelayError>>,
    {
        self.execute_if(RelayError::is_retryable, operation).await
    }

    /// Execute an async operation, retrying errors accepted by `retryable`.
    ///
    /// Runs at most `max_retries + 1` attempts. A timed-out attempt surfaces
    /// as [`RelayError::Timeout`] and is offered to `retryable` like any other
    /// failure. The last error is returned once the budget is spent.
    pub async fn execute_if<P, F, Fut, T>(
        &self,
        retryable: P,
        mut operation: F,
    ) -> Result<T, RelayError>
    where
        P: Fn(&RelayError) -> bool,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RelayError>>,
    {
        let max_retries = self.max_retries.min(MAX_RETRIES_CEILING);
        let timeout = self.timeout.filter(|t| !t.is_zero());
        let mut delay = self.initial_delay;
        let mut retries = 0u32;

        loop {
            let outcome = match timeout {
                Some(limit) => with_timeout(limit, operation()).await,
                None => operation().await,
            };

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if retries >= max_retries || !retryable(&error) {
                return Err(error);
            }
            retries += 1;

            tracing::warn!(
                attempt = retries,
                max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying after error"
            );

            tokio::time::sleep(delay).await;
            delay = scale(delay, self.backoff_factor);
        }
    }
}

/// Bound one attempt by `limit`.
///
/// On expiry the attempt's future is dropped, which cancels only that attempt;
/// the retry loop and the caller's run carry on. The error reports the limit,
/// not the time actually spent.
pub async fn with_timeout<T>(
    limit: Duration,
    attempt: impl Future<Output = Result<T, RelayError>>,
) -> Result<T, RelayError> {
    tokio::time::timeout(limit, attempt)
        .await
        .unwrap_or_else(|_elapsed| Err(RelayError::Timeout(limit.as_millis() as u64)))
}

fn scale(delay: Duration, factor: f64) -> Duration {
    let next = delay.as_secs_f64() * factor;
    if next.is_finite() && next >= 0.0 {
        Duration::from_secs_f64(next.min(MAX_DELAY_SECS))
    } else {
        delay
    }
}

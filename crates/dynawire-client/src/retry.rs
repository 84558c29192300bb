//! Retry policies: how long to wait before resending, or whether to give up.
//!
//! A policy only ever sees retryable errors;
//! [`RetryingConnection`](crate::connection::RetryingConnection) returns
//! everything else to the caller before consulting it.

use std::fmt;
use std::time::Duration;

use dynawire_model::DynamoDBOperation;

use crate::error::Error;

/// Decides whether and when to resend a failed request.
pub trait RetryPolicy: Send + Sync + fmt::Debug {
    /// Given the retryable errors seen so far for this request, oldest first,
    /// return the delay before the next attempt, or `None` to give up.
    fn retry(&self, operation: DynamoDBOperation, errors: &[Error]) -> Option<Duration>;
}

/// Waits `first_wait * multiplier^(n - 1)` after the n-th failure, giving up
/// once more than `max_retries` failures have been seen.
///
/// There is no jitter and no ceiling on a single delay; only the number of
/// retries is bounded.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use dynawire_client::retry::ExponentialBackoffRetryPolicy;
///
/// let policy = ExponentialBackoffRetryPolicy::new(Duration::from_millis(100), 2.0, 3);
/// assert_eq!(policy.delay(3), Some(Duration::from_millis(400)));
/// assert_eq!(policy.delay(4), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialBackoffRetryPolicy {
    first_wait: Duration,
    multiplier: f64,
    max_retries: usize,
}

impl ExponentialBackoffRetryPolicy {
    /// Wait one second, doubling each time.
    pub const DEFAULT_FIRST_WAIT: Duration = Duration::from_secs(1);
    /// Doubling.
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;
    /// Five retries, six attempts in total.
    pub const DEFAULT_MAX_RETRIES: usize = 5;

    /// Create a policy.
    #[must_use]
    pub fn new(first_wait: Duration, multiplier: f64, max_retries: usize) -> Self {
        Self {
            first_wait,
            multiplier,
            max_retries,
        }
    }

    /// The delay after `failures` consecutive failures, or `None` when the
    /// retry budget is spent. A multiplier that yields a negative or NaN delay
    /// also gives up.
    #[must_use]
    pub fn delay(&self, failures: usize) -> Option<Duration> {
        if failures > self.max_retries {
            return None;
        }
        let exponent = i32::try_from(failures.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.first_wait.as_secs_f64() * self.multiplier.powi(exponent);
        if secs.is_nan() || secs < 0.0 {
            return None;
        }
        Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }

    /// Maximum number of retries.
    #[must_use]
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}

impl Default for ExponentialBackoffRetryPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_FIRST_WAIT,
            Self::DEFAULT_MULTIPLIER,
            Self::DEFAULT_MAX_RETRIES,
        )
    }
}

impl RetryPolicy for ExponentialBackoffRetryPolicy {
    fn retry(&self, _operation: DynamoDBOperation, errors: &[Error]) -> Option<Duration> {
        self.delay(errors.len())
    }
}

/// Never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFastRetryPolicy;

impl RetryPolicy for FailFastRetryPolicy {
    fn retry(&self, _operation: DynamoDBOperation, _errors: &[Error]) -> Option<Duration> {
        None
    }
}

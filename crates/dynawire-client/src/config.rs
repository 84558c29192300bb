//! Client configuration.
//!
//! Everything can be driven by environment variables; unset or unparsable
//! values fall back to the defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::retry::ExponentialBackoffRetryPolicy;

/// Retry settings for [`ExponentialBackoffRetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: usize,
    /// Delay before the first retry.
    pub first_wait: Duration,
    /// Factor applied to the delay after each further failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: ExponentialBackoffRetryPolicy::DEFAULT_MAX_RETRIES,
            first_wait: ExponentialBackoffRetryPolicy::DEFAULT_FIRST_WAIT,
            multiplier: ExponentialBackoffRetryPolicy::DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryConfig {
    /// The backoff policy these settings describe.
    #[must_use]
    pub fn policy(&self) -> ExponentialBackoffRetryPolicy {
        ExponentialBackoffRetryPolicy::new(self.first_wait, self.multiplier, self.max_retries)
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Signing region.
    pub region: String,
    /// Endpoint override, e.g. `http://localhost:8000` for a local server.
    pub endpoint: Option<String>,
    /// Retry settings.
    pub retry: RetryConfig,
    /// Timeout for a single HTTP attempt.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_owned(),
            endpoint: None,
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Configuration for `region` with every other setting at its default.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Setting |
    /// |---|---|
    /// | `AWS_REGION`, then `AWS_DEFAULT_REGION` | `region` |
    /// | `DYNAWIRE_ENDPOINT_URL` | `endpoint` |
    /// | `DYNAWIRE_MAX_RETRIES` | `retry.max_retries` |
    /// | `DYNAWIRE_RETRY_FIRST_WAIT_MS` | `retry.first_wait` |
    /// | `DYNAWIRE_RETRY_MULTIPLIER` | `retry.multiplier` |
    /// | `DYNAWIRE_TIMEOUT_SECS` | `timeout` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")) {
            config.region = v;
        }
        if let Some(v) = var("DYNAWIRE_ENDPOINT_URL") {
            config.endpoint = Some(v);
        }
        if let Some(v) = parse(&var, "DYNAWIRE_MAX_RETRIES") {
            config.retry.max_retries = v;
        }
        if let Some(v) = parse(&var, "DYNAWIRE_RETRY_FIRST_WAIT_MS") {
            config.retry.first_wait = Duration::from_millis(v);
        }
        if let Some(v) = parse::<f64>(&var, "DYNAWIRE_RETRY_MULTIPLIER") {
            if v.is_finite() && v >= 1.0 {
                config.retry.multiplier = v;
            } else {
                warn!(key = "DYNAWIRE_RETRY_MULTIPLIER", value = v, "ignoring multiplier below 1");
            }
        }
        if let Some(v) = parse(&var, "DYNAWIRE_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(v);
        }

        config
    }

    /// The URL requests are posted to: the override if set, otherwise the
    /// public regional endpoint.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://dynamodb.{}.amazonaws.com/", self.region))
    }
}

fn parse<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

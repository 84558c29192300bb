//! The [`Connection`] trait and the layers that wrap it.
//!
//! Layers compose by ownership: each holds the connection it wraps and
//! implements the same trait. The standard stack is
//! `CompletingConnection<RetryingConnection<SigningConnection>>`, so a
//! transient failure during a batch follow-up retries that follow-up only.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Error;
use crate::request::Request;
use crate::retry::RetryPolicy;

/// Sends a request and returns its decoded output.
#[async_trait::async_trait]
pub trait Connection: Send + Sync {
    /// Send `request`, returning its output or exactly one [`Error`].
    async fn send<R: Request>(&self, request: &R) -> Result<R::Output, Error>;
}

#[async_trait::async_trait]
impl<C: Connection> Connection for Arc<C> {
    async fn send<R: Request>(&self, request: &R) -> Result<R::Output, Error> {
        (**self).send(request).await
    }
}

/// Resends requests that failed with a retryable error, pausing as long as
/// the [`RetryPolicy`] says.
#[derive(Debug)]
pub struct RetryingConnection<C> {
    inner: C,
    policy: Arc<dyn RetryPolicy>,
}

impl<C> RetryingConnection<C> {
    /// Wrap `inner`.
    pub fn new(inner: C, policy: Arc<dyn RetryPolicy>) -> Self {
        Self { inner, policy }
    }

    /// The wrapped connection.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<C: Connection> Connection for RetryingConnection<C> {
    async fn send<R: Request>(&self, request: &R) -> Result<R::Output, Error> {
        let operation = request.operation();
        let mut errors: Vec<Error> = Vec::new();
        loop {
            let err = match self.inner.send(request).await {
                Ok(output) => return Ok(output),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };
            errors.push(err);

            let attempts = errors.len();
            let Some(delay) = self.policy.retry(operation, &errors) else {
                debug!(%operation, attempts, "retries exhausted");
                return Err(errors.swap_remove(attempts - 1));
            };
            warn!(
                %operation,
                attempt = attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %errors[attempts - 1],
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Keeps sending follow-ups for completable requests until the service has
/// processed everything, merging each partial response into the first.
#[derive(Debug)]
pub struct CompletingConnection<C> {
    inner: C,
}

impl<C> CompletingConnection<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped connection.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<C: Connection> Connection for CompletingConnection<C> {
    async fn send<R: Request>(&self, request: &R) -> Result<R::Output, Error> {
        let mut output = self.inner.send(request).await?;
        if !request.is_completable() {
            return Ok(output);
        }

        let operation = request.operation();
        let mut steps = 0usize;
        while let Some(next) = request.completion_action(&output) {
            steps += 1;
            debug!(%operation, step = steps, "sending completion request");
            let partial = self.inner.send(&next).await?;
            request.complete_response(&mut output, partial);
        }
        Ok(output)
    }
}

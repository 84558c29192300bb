//! The innermost connection: sign, POST, decode. One attempt, no retry.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use http::{HeaderMap, Uri};
use tracing::debug;

use dynawire_auth::{CredentialProvider, SigningParams, sign_request};

use crate::connection::Connection;
use crate::error::Error;
use crate::request::Request;
use crate::responder::{respond, verify_crc32};

/// Signing service name for DynamoDB.
pub const DEFAULT_SERVICE: &str = "dynamodb";

/// A raw HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Complete response body.
    pub body: Bytes,
}

/// Failure of an [`HttpSession`] to produce a response.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Connect, DNS, timeout or stream failure. Resending may help.
    #[error("{0}")]
    Network(String),
    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Network(message) => Self::Network { message },
            SessionError::Other(message) => Self::Unknown {
                status: None,
                message,
            },
        }
    }
}

/// The HTTP client used to POST signed requests.
///
/// Implementations must be safe to share between tasks; the session is the
/// only state shared across concurrent calls.
#[async_trait::async_trait]
pub trait HttpSession: Send + Sync + fmt::Debug {
    /// POST `body` to `url` with `headers` and read the whole response.
    async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<RawResponse, SessionError>;
}

#[async_trait::async_trait]
impl HttpSession for reqwest::Client {
    async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<RawResponse, SessionError> {
        let response = reqwest::Client::post(self, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(session_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(session_error)?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait::async_trait]
impl<T: HttpSession + ?Sized> HttpSession for Arc<T> {
    async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<RawResponse, SessionError> {
        (**self).post(url, headers, body).await
    }
}

fn session_error(err: reqwest::Error) -> SessionError {
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        SessionError::Network(err.to_string())
    } else {
        SessionError::Other(err.to_string())
    }
}

/// Signs each request with fresh credentials and sends it once.
pub struct SigningConnection<S = reqwest::Client> {
    endpoint: String,
    host: String,
    region: String,
    service: String,
    credentials: Arc<dyn CredentialProvider>,
    session: S,
}

impl<S> fmt::Debug for SigningConnection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConnection")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl<S: HttpSession> SigningConnection<S> {
    /// Create a connection posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when `endpoint` is not an absolute
    /// `http` or `https` URL.
    pub fn new(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        session: S,
    ) -> Result<Self, Error> {
        let endpoint = endpoint.into();
        let host = host_header(&endpoint)?;
        Ok(Self {
            endpoint,
            host,
            region: region.into(),
            service: DEFAULT_SERVICE.to_owned(),
            credentials,
            session,
        })
    }

    /// Sign with a service name other than `dynamodb`.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// The URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait::async_trait]
impl<S: HttpSession> Connection for SigningConnection<S> {
    async fn send<R: Request>(&self, request: &R) -> Result<R::Output, Error> {
        let operation = request.operation();
        let payload = serde_json::to_vec(request)?;

        let credentials = self.credentials.credentials()?;
        let params = SigningParams {
            credentials: &credentials,
            region: &self.region,
            service: &self.service,
            host: &self.host,
            timestamp: Utc::now(),
        };
        let headers = sign_request(&params, &operation.target(), &payload)?;

        debug!(%operation, bytes = payload.len(), "sending request");
        let response = self
            .session
            .post(&self.endpoint, headers, Bytes::from(payload))
            .await?;
        debug!(%operation, status = response.status, "received response");

        verify_crc32(response.status, &response.headers, &response.body)?;
        respond(response.status, &response.body)
    }
}

/// The `Host` header value for `endpoint`: its authority without a default
/// port.
fn host_header(endpoint: &str) -> Result<String, Error> {
    let invalid = || Error::InvalidEndpoint(endpoint.to_owned());
    let uri: Uri = endpoint.parse().map_err(|_| invalid())?;
    let scheme = uri.scheme_str().ok_or_else(invalid)?;
    let authority = uri.authority().ok_or_else(invalid)?;

    let default_port = match scheme {
        "https" => 443,
        "http" => 80,
        _ => return Err(invalid()),
    };
    Ok(match authority.port_u16() {
        Some(port) if port != default_port => format!("{}:{port}", authority.host()),
        _ => authority.host().to_owned(),
    })
}

//! The error taxonomy of the request pipeline.
//!
//! Every failed `send` resolves to exactly one [`Error`] variant. Variants that
//! come from an HTTP response carry the status code and the raw body so the
//! caller can always inspect what the service actually said.

use dynawire_auth::AuthError;
use dynawire_model::DynamoDBErrorCode;

/// Errors returned by a [`Connection`](crate::connection::Connection).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The request never produced a response: DNS failure, refused
    /// connection, timeout, broken stream.
    #[error("network error: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// An HTTP 5xx, or a 200 whose body could not be decoded.
    #[error("server error (HTTP {status}): {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// An HTTP 4xx whose `__type` names a known error code.
    #[error("{code} (HTTP {status}): {message}")]
    Client {
        /// HTTP status code.
        status: u16,
        /// The recognized error code.
        code: DynamoDBErrorCode,
        /// The service's `Message`, empty when absent.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// An HTTP 4xx without a recognizable `__type`.
    #[error("unrecognized client error (HTTP {status}): {body}")]
    UnknownClient {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Anything else: an unexpected status class, or a local failure while
    /// sending that is not a network problem.
    #[error("unexpected failure: {message}")]
    Unknown {
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Description, or the raw body for unexpected statuses.
        message: String,
    },

    /// Credentials could not be obtained, or the request could not be signed.
    #[error("cannot sign request: {0}")]
    Credentials(#[from] AuthError),

    /// The request payload could not be encoded as JSON.
    #[error("cannot encode request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured endpoint is not a usable URL.
    #[error("invalid endpoint {0:?}")]
    InvalidEndpoint(String),
}

impl Error {
    /// Whether resending the identical request may succeed.
    ///
    /// Network and server failures are retryable, as are client errors whose
    /// code signals throttling. Everything else is final.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Server { .. } => true,
            Self::Client { code, .. } => code.is_throttling(),
            _ => false,
        }
    }

    /// The HTTP status code, when the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. }
            | Self::Client { status, .. }
            | Self::UnknownClient { status, .. } => Some(*status),
            Self::Unknown { status, .. } => *status,
            _ => None,
        }
    }

    /// The raw response body, when the error came from a response.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Server { body, .. }
            | Self::Client { body, .. }
            | Self::UnknownClient { body, .. } => Some(body),
            Self::Unknown {
                status: Some(_),
                message,
            } => Some(message),
            _ => None,
        }
    }

    /// The recognized client error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<DynamoDBErrorCode> {
        match self {
            Self::Client { code, .. } => Some(*code),
            _ => None,
        }
    }
}

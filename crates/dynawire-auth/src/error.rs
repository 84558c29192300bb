//! Error types for request signing.

/// Errors raised while resolving credentials or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credential source did not provide a required value.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// A value destined for a signed header is not a legal header value.
    #[error("Invalid value for header {0}")]
    InvalidHeaderValue(&'static str),
}

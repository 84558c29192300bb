//! Credentials and the providers that supply them.
//!
//! A [`CredentialProvider`] is consulted once per signed request, so a
//! provider backed by rotating credentials is picked up without restarting
//! the client.

use std::fmt;

use crate::error::AuthError;

const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// An access key pair plus an optional session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The access key ID, sent in clear in the `Authorization` header.
    pub access_key_id: String,
    /// The secret used to derive signing keys. Never sent.
    pub secret_access_key: String,
    /// Temporary session token, sent as `X-Amz-Security-Token`.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Long-term credentials without a session token.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// A source of credentials.
///
/// Implementations may read from memory, the environment, a file, or a remote
/// metadata service.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Fetch the credentials to sign the next request with.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] when the source has nothing to
    /// offer.
    fn credentials(&self) -> Result<Credentials, AuthError>;
}

/// Fixed credentials held in memory.
///
/// # Examples
///
/// ```
/// use dynawire_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new("AKIDEXAMPLE", "secret");
/// assert_eq!(provider.credentials().unwrap().access_key_id, "AKIDEXAMPLE");
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    /// Provide the given key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key_id, secret_access_key),
        }
    }

    /// Provide the given credentials as-is.
    #[must_use]
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        Ok(self.credentials.clone())
    }
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
/// `AWS_SESSION_TOKEN` from the process environment on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create the provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        credentials_from_lookup(|name| std::env::var(name).ok())
    }
}

fn credentials_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, AuthError> {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

    let access_key_id = non_empty(ACCESS_KEY_ID_VAR)
        .ok_or_else(|| AuthError::MissingCredentials(format!("{ACCESS_KEY_ID_VAR} is not set")))?;
    let secret_access_key = non_empty(SECRET_ACCESS_KEY_VAR).ok_or_else(|| {
        AuthError::MissingCredentials(format!("{SECRET_ACCESS_KEY_VAR} is not set"))
    })?;

    Ok(Credentials {
        access_key_id,
        secret_access_key,
        session_token: non_empty(SESSION_TOKEN_VAR),
    })
}

//! AWS Signature Version 4 request signing for dynawire.
//!
//! This crate signs outgoing DynamoDB JSON requests. It is deliberately free of
//! I/O: [`sigv4::sign_request`] is a pure function of the credentials, the
//! credential scope, the clock reading and the payload, which keeps every
//! signature reproducible in tests.
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use dynawire_auth::credentials::{CredentialProvider, StaticCredentialProvider};
//! use dynawire_auth::sigv4::{SigningParams, sign_request};
//!
//! let provider = StaticCredentialProvider::new("AKIDEXAMPLE", "secret");
//! let credentials = provider.credentials().unwrap();
//! let params = SigningParams {
//!     credentials: &credentials,
//!     region: "us-east-1",
//!     service: "dynamodb",
//!     host: "dynamodb.us-east-1.amazonaws.com",
//!     timestamp: Utc::now(),
//! };
//! let headers = sign_request(&params, "DynamoDB_20120810.ListTables", b"{}").unwrap();
//! assert!(headers.contains_key("authorization"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Credentials and credential providers
//! - [`error`] - Signing error types
//! - [`sigv4`] - Signature computation and header assembly

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod sigv4;

pub use credentials::{
    CredentialProvider, Credentials, EnvCredentialProvider, StaticCredentialProvider,
};
pub use error::AuthError;
pub use sigv4::{SigningParams, sign_request};

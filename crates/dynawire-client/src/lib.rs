//! A DynamoDB JSON-over-HTTPS client pipeline.
//!
//! Requests flow through stacked [`Connection`]s:
//!
//! - [`SigningConnection`] signs with SigV4, posts, and decodes through the
//!   [`responder`].
//! - [`RetryingConnection`] resends on retryable errors as a [`RetryPolicy`]
//!   directs.
//! - [`CompletingConnection`] follows up partially processed batch requests.
//!
//! [`Client`] assembles the standard stack. The [`iter`] and [`batch`]
//! modules build lazy streams and chunked batch helpers on top of any
//! connection.
//!
//! # Usage
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use dynawire_client::Client;
//! use dynawire_model::AttributeValue;
//! use dynawire_model::input::GetItemInput;
//!
//! # async fn run() -> Result<(), dynawire_client::Error> {
//! let client = Client::from_env()?;
//! let key = HashMap::from([("pk".to_owned(), AttributeValue::from("user#1"))]);
//! let out = client.get_item(GetItemInput::new("users", key)).await?;
//! println!("{:?}", out.item);
//! # Ok(())
//! # }
//! ```
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod batch;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod iter;
pub mod request;
pub mod responder;
pub mod retry;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, RetryConfig};
pub use connection::{CompletingConnection, Connection, RetryingConnection};
pub use error::Error;
pub use request::Request;
pub use retry::{ExponentialBackoffRetryPolicy, FailFastRetryPolicy, RetryPolicy};
pub use transport::{HttpSession, SigningConnection};

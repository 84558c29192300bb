//! Integration tests for dynawire against a DynamoDB-compatible endpoint.
//!
//! These tests require a server (DynamoDB Local, LocalStack, RustStack, ...)
//! at `DYNAWIRE_ENDPOINT_URL`, defaulting to `http://localhost:8000`. They are
//! marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p dynawire-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use dynawire_auth::StaticCredentialProvider;
use dynawire_client::{Client, ClientConfig};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
fn endpoint_url() -> String {
    std::env::var("DYNAWIRE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned())
}

/// Create a client pointing at the local server.
///
/// # Panics
///
/// Panics when the endpoint is not a valid URL.
#[must_use]
pub fn dynamodb_client() -> Client {
    init_tracing();

    let config = ClientConfig {
        endpoint: Some(endpoint_url()),
        ..ClientConfig::from_env()
    };
    Client::new(config, Arc::new(StaticCredentialProvider::new("test", "test")))
        .unwrap_or_else(|e| panic!("failed to build client: {e}"))
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

mod test_dynamodb;

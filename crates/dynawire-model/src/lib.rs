//! DynamoDB wire-protocol model types for the dynawire client.
//!
//! The types in this crate mirror the `awsJson1_0` payloads exchanged with a
//! DynamoDB-compatible endpoint: request inputs serialize to the exact JSON the
//! service expects, and outputs deserialize from its responses. Fields the
//! service may omit are kept as `Option`s so callers can tell "not returned"
//! apart from "returned empty".
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use error::DynamoDBErrorCode;
pub use operations::DynamoDBOperation;
pub use types::{Item, Key};

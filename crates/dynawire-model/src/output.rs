//! Response payloads, one struct per operation.
//!
//! Every field the service may leave out is an `Option`: `None` means "not in
//! the response", which is not the same thing as an empty map or list. The
//! continuation cursors (`LastEvaluatedKey`, `UnprocessedKeys`, ...) rely on
//! that distinction.

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::{
    ConsumedCapacity, Item, ItemCollectionMetrics, Key, KeysAndAttributes, TableDescription,
    WriteRequest,
};

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// Output of `CreateTable`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableOutput {
    pub table_description: Option<TableDescription>,
}

/// Output of `UpdateTable`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableOutput {
    pub table_description: Option<TableDescription>,
}

/// Output of `DeleteTable`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableOutput {
    pub table_description: Option<TableDescription>,
}

/// Output of `DescribeTable`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    pub table: Option<TableDescription>,
}

/// Output of `ListTables`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesOutput {
    pub table_names: Option<Vec<String>>,
    /// Present when more table names remain.
    pub last_evaluated_table_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// Output of `PutItem`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemOutput {
    /// Only returned when `ReturnValues` asked for it.
    pub attributes: Option<Item>,
    pub consumed_capacity: Option<ConsumedCapacity>,
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

/// Output of `GetItem`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// `None` when no item exists at the key.
    pub item: Option<Item>,
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output of `UpdateItem`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemOutput {
    pub attributes: Option<Item>,
    pub consumed_capacity: Option<ConsumedCapacity>,
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

/// Output of `DeleteItem`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemOutput {
    pub attributes: Option<Item>,
    pub consumed_capacity: Option<ConsumedCapacity>,
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// Output of `Query`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOutput {
    pub items: Option<Vec<Item>>,
    pub count: Option<i32>,
    pub scanned_count: Option<i32>,
    /// Cursor for the next page; absent on the last page.
    pub last_evaluated_key: Option<Key>,
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output of `Scan`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanOutput {
    pub items: Option<Vec<Item>>,
    pub count: Option<i32>,
    pub scanned_count: Option<i32>,
    /// Cursor for the next page; absent on the last page.
    pub last_evaluated_key: Option<Key>,
    pub consumed_capacity: Option<ConsumedCapacity>,
}

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

/// Output of `BatchGetItem`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemOutput {
    /// Items read, per table.
    pub responses: Option<HashMap<String, Vec<Item>>>,
    /// Keys the service did not get to; resend them as a new request.
    pub unprocessed_keys: Option<HashMap<String, KeysAndAttributes>>,
    pub consumed_capacity: Option<Vec<ConsumedCapacity>>,
}

impl BatchGetItemOutput {
    /// Whether any keys were left unprocessed.
    #[must_use]
    pub fn has_unprocessed_keys(&self) -> bool {
        self.unprocessed_keys
            .as_ref()
            .is_some_and(|tables| tables.values().any(|k| !k.keys.is_empty()))
    }
}

/// Output of `BatchWriteItem`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemOutput {
    /// Writes the service did not get to; resend them as a new request.
    pub unprocessed_items: Option<HashMap<String, Vec<WriteRequest>>>,
    pub item_collection_metrics: Option<HashMap<String, Vec<ItemCollectionMetrics>>>,
    pub consumed_capacity: Option<Vec<ConsumedCapacity>>,
}

impl BatchWriteItemOutput {
    /// Whether any writes were left unprocessed.
    #[must_use]
    pub fn has_unprocessed_items(&self) -> bool {
        self.unprocessed_items
            .as_ref()
            .is_some_and(|tables| tables.values().any(|w| !w.is_empty()))
    }
}

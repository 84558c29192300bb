//! Request payloads, one struct per operation.
//!
//! Each input serializes to exactly the JSON body DynamoDB expects. Unset
//! optional parameters are left out of the payload entirely. Inputs are plain
//! values: the pagination helpers never modify one in place, they derive a new
//! value carrying the cursor (see [`QueryInput::with_exclusive_start_key`]).

use std::collections::HashMap;

use serde::Serialize;

use crate::attribute_value::AttributeValue;
use crate::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, GlobalSecondaryIndexUpdate, Item, Key,
    KeySchemaElement, KeysAndAttributes, LocalSecondaryIndex, ProvisionedThroughput,
    ReturnConsumedCapacity, ReturnItemCollectionMetrics, ReturnValue, Select, StreamSpecification,
    WriteRequest,
};

/// Expression placeholder maps shared by most item operations.
type Names = HashMap<String, String>;
type Values = HashMap<String, AttributeValue>;

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// Input for `CreateTable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableInput {
    pub table_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,
    /// Required when the billing mode is `PROVISIONED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_secondary_indexes: Option<Vec<GlobalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_secondary_indexes: Option<Vec<LocalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
}

impl CreateTableInput {
    /// An on-demand table with the given key schema.
    #[must_use]
    pub fn new(
        table_name: impl Into<String>,
        key_schema: Vec<KeySchemaElement>,
        attribute_definitions: Vec<AttributeDefinition>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            key_schema,
            attribute_definitions,
            billing_mode: Some(BillingMode::PayPerRequest),
            ..Self::default()
        }
    }

    /// Switch to provisioned billing with the given throughput.
    #[must_use]
    pub fn with_provisioned_throughput(mut self, read: i64, write: i64) -> Self {
        self.billing_mode = Some(BillingMode::Provisioned);
        self.provisioned_throughput = Some(ProvisionedThroughput {
            read_capacity_units: read,
            write_capacity_units: write,
        });
        self
    }
}

/// Input for `UpdateTable`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableInput {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_definitions: Option<Vec<AttributeDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_secondary_index_updates: Option<Vec<GlobalSecondaryIndexUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
}

impl UpdateTableInput {
    /// An update of `table_name` that changes nothing yet.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }
}

/// Input for `DeleteTable`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTableInput {
    pub table_name: String,
}

impl DeleteTableInput {
    /// Delete `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }
}

/// Input for `DescribeTable`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableInput {
    pub table_name: String,
}

impl DescribeTableInput {
    /// Describe `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }
}

/// Input for `ListTables`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesInput {
    /// Resume after this table name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_table_name: Option<String>,
    /// Page size, 1 to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

impl ListTablesInput {
    /// A copy of this request that resumes after `table_name`.
    #[must_use]
    pub fn with_exclusive_start_table_name(&self, table_name: impl Into<String>) -> Self {
        Self {
            exclusive_start_table_name: Some(table_name.into()),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// Input for `PutItem`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    pub table_name: String,
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Values>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

impl PutItemInput {
    /// Put `item` into `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, item: Item) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            ..Self::default()
        }
    }
}

/// Input for `GetItem`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemInput {
    pub table_name: String,
    pub key: Key,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl GetItemInput {
    /// Read the item at `key` from `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, key: Key) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Self::default()
        }
    }
}

/// Input for `UpdateItem`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemInput {
    pub table_name: String,
    pub key: Key,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Values>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

impl UpdateItemInput {
    /// Apply `update_expression` to the item at `key`.
    #[must_use]
    pub fn new(
        table_name: impl Into<String>,
        key: Key,
        update_expression: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            update_expression: Some(update_expression.into()),
            ..Self::default()
        }
    }
}

/// Input for `DeleteItem`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemInput {
    pub table_name: String,
    pub key: Key,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Values>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

impl DeleteItemInput {
    /// Delete the item at `key` from `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, key: Key) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// Input for `Query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryInput {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Values>,
    /// `false` walks the sort key in descending order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Key>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl QueryInput {
    /// Query `table_name` with a key condition and its placeholder values.
    #[must_use]
    pub fn new(
        table_name: impl Into<String>,
        key_condition_expression: impl Into<String>,
        expression_attribute_values: Values,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            key_condition_expression: Some(key_condition_expression.into()),
            expression_attribute_values: Some(expression_attribute_values),
            ..Self::default()
        }
    }

    /// A copy of this request that resumes after `key`.
    #[must_use]
    pub fn with_exclusive_start_key(&self, key: Key) -> Self {
        Self {
            exclusive_start_key: Some(key),
            ..self.clone()
        }
    }
}

/// Input for `Scan`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanInput {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Values>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Key>,
    /// Zero-based segment of a parallel scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl ScanInput {
    /// Scan all of `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// A copy of this request that resumes after `key`.
    #[must_use]
    pub fn with_exclusive_start_key(&self, key: Key) -> Self {
        Self {
            exclusive_start_key: Some(key),
            ..self.clone()
        }
    }

    /// Split this scan into `total_segments` independent requests, segment
    /// `0` through `total_segments - 1`.
    ///
    /// Each request is its own value; driving them, sequentially or
    /// concurrently, is up to the caller. Returns an empty vector when
    /// `total_segments` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynawire_model::input::ScanInput;
    ///
    /// let segments = ScanInput::new("events").parallel(3);
    /// assert_eq!(segments.len(), 3);
    /// assert_eq!(segments[2].segment, Some(2));
    /// assert_eq!(segments[2].total_segments, Some(3));
    /// ```
    #[must_use]
    pub fn parallel(&self, total_segments: u16) -> Vec<Self> {
        (0..total_segments)
            .map(|segment| Self {
                segment: Some(i32::from(segment)),
                total_segments: Some(i32::from(total_segments)),
                ..self.clone()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

/// Input for `BatchGetItem`: up to 100 keys across one or more tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemInput {
    pub request_items: HashMap<String, KeysAndAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl BatchGetItemInput {
    /// Read `keys` from a single table.
    #[must_use]
    pub fn for_table(table_name: impl Into<String>, keys: Vec<Key>) -> Self {
        Self {
            request_items: HashMap::from([(table_name.into(), KeysAndAttributes::new(keys))]),
            return_consumed_capacity: None,
        }
    }

    /// A copy of this request reading `request_items` instead.
    #[must_use]
    pub fn with_request_items(&self, request_items: HashMap<String, KeysAndAttributes>) -> Self {
        Self {
            request_items,
            ..self.clone()
        }
    }
}

/// Input for `BatchWriteItem`: up to 25 puts or deletes across one or more
/// tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemInput {
    pub request_items: HashMap<String, Vec<WriteRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

impl BatchWriteItemInput {
    /// Write `requests` to a single table.
    #[must_use]
    pub fn for_table(table_name: impl Into<String>, requests: Vec<WriteRequest>) -> Self {
        Self {
            request_items: HashMap::from([(table_name.into(), requests)]),
            ..Self::default()
        }
    }

    /// A copy of this request carrying `request_items` instead.
    #[must_use]
    pub fn with_request_items(&self, request_items: HashMap<String, Vec<WriteRequest>>) -> Self {
        Self {
            request_items,
            ..self.clone()
        }
    }
}

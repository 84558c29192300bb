//! Shared DynamoDB types used by several operations.
//!
//! Structs follow the wire format with `PascalCase` field names. Enums are
//! string-valued on the wire; each one carries an `Unknown` variant so that a
//! value introduced by a newer service version decodes instead of failing the
//! whole response.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// A DynamoDB item: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// A DynamoDB primary key: key attribute name to value.
pub type Key = HashMap<String, AttributeValue>;

/// Declares a string-valued wire enum with an `Unknown` fallback.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client does not know about.
            Unknown(String),
        }

        impl $name {
            /// Returns the wire-format string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unknown(s) => s.as_str(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(match s.as_str() {
                    $( $wire => Self::$variant, )+
                    _ => Self::Unknown(s),
                })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

wire_enum! {
    /// Role of an attribute within a key schema.
    KeyType {
        /// Partition key.
        Hash => "HASH",
        /// Sort key.
        Range => "RANGE",
    }
}

wire_enum! {
    /// Scalar type of a key attribute.
    ScalarAttributeType {
        /// String.
        S => "S",
        /// Number.
        N => "N",
        /// Binary.
        B => "B",
    }
}

wire_enum! {
    /// Lifecycle state of a table.
    TableStatus {
        /// Being created.
        Creating => "CREATING",
        /// Ready for use.
        Active => "ACTIVE",
        /// Being deleted.
        Deleting => "DELETING",
        /// Being updated.
        Updating => "UPDATING",
    }
}

wire_enum! {
    /// Lifecycle state of a global secondary index.
    IndexStatus {
        /// Being created.
        Creating => "CREATING",
        /// Ready for use.
        Active => "ACTIVE",
        /// Being deleted.
        Deleting => "DELETING",
        /// Being updated.
        Updating => "UPDATING",
    }
}

wire_enum! {
    /// How a table is billed.
    BillingMode {
        /// Explicit read/write capacity.
        Provisioned => "PROVISIONED",
        /// On-demand.
        PayPerRequest => "PAY_PER_REQUEST",
    }
}

wire_enum! {
    /// Which attributes are copied into a secondary index.
    ProjectionType {
        /// Every attribute.
        All => "ALL",
        /// Only key attributes.
        KeysOnly => "KEYS_ONLY",
        /// Keys plus `NonKeyAttributes`.
        Include => "INCLUDE",
    }
}

wire_enum! {
    /// What a table stream records for each modification.
    StreamViewType {
        /// The key attributes only.
        KeysOnly => "KEYS_ONLY",
        /// The item after modification.
        NewImage => "NEW_IMAGE",
        /// The item before modification.
        OldImage => "OLD_IMAGE",
        /// Both images.
        NewAndOldImages => "NEW_AND_OLD_IMAGES",
    }
}

wire_enum! {
    /// Item attributes returned by a write.
    ReturnValue {
        /// Nothing.
        None => "NONE",
        /// Whole item before the write.
        AllOld => "ALL_OLD",
        /// Updated attributes before the write.
        UpdatedOld => "UPDATED_OLD",
        /// Whole item after the write.
        AllNew => "ALL_NEW",
        /// Updated attributes after the write.
        UpdatedNew => "UPDATED_NEW",
    }
}

wire_enum! {
    /// Level of consumed-capacity detail in responses.
    ReturnConsumedCapacity {
        /// Table and index breakdown.
        Indexes => "INDEXES",
        /// Aggregate only.
        Total => "TOTAL",
        /// Nothing.
        None => "NONE",
    }
}

wire_enum! {
    /// Whether writes return item collection metrics.
    ReturnItemCollectionMetrics {
        /// Return size estimates.
        Size => "SIZE",
        /// Nothing.
        None => "NONE",
    }
}

wire_enum! {
    /// Attributes returned by `Query` and `Scan`.
    Select {
        /// Every attribute.
        AllAttributes => "ALL_ATTRIBUTES",
        /// Every attribute projected into the index.
        AllProjectedAttributes => "ALL_PROJECTED_ATTRIBUTES",
        /// Only those named by the projection expression.
        SpecificAttributes => "SPECIFIC_ATTRIBUTES",
        /// Only the item count.
        Count => "COUNT",
    }
}

// ---------------------------------------------------------------------------
// Key schema
// ---------------------------------------------------------------------------

/// One attribute of a table or index key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// The attribute name.
    pub attribute_name: String,
    /// `HASH` or `RANGE`.
    pub key_type: KeyType,
}

impl KeySchemaElement {
    /// A partition key element.
    #[must_use]
    pub fn hash(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            key_type: KeyType::Hash,
        }
    }

    /// A sort key element.
    #[must_use]
    pub fn range(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            key_type: KeyType::Range,
        }
    }
}

/// Declares the scalar type of an attribute used in a key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// The attribute name.
    pub attribute_name: String,
    /// `S`, `N` or `B`.
    pub attribute_type: ScalarAttributeType,
}

impl AttributeDefinition {
    /// Build a definition.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            attribute_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Throughput & indexes
// ---------------------------------------------------------------------------

/// Requested read/write capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    /// Strongly consistent reads per second.
    pub read_capacity_units: i64,
    /// Writes per second.
    pub write_capacity_units: i64,
}

/// Provisioned throughput as reported by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughputDescription {
    pub read_capacity_units: Option<i64>,
    pub write_capacity_units: Option<i64>,
    pub number_of_decreases_today: Option<i64>,
    /// Epoch seconds.
    pub last_increase_date_time: Option<f64>,
    /// Epoch seconds.
    pub last_decrease_date_time: Option<f64>,
}

/// Attribute projection of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_type: Option<ProjectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_key_attributes: Option<Vec<String>>,
}

/// Global secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

/// Local secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

/// One change to the global secondary indexes of a table (`UpdateTable`).
///
/// Exactly one of the three actions should be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<GlobalSecondaryIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateGlobalSecondaryIndexAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<DeleteGlobalSecondaryIndexAction>,
}

/// New throughput for an existing global secondary index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGlobalSecondaryIndexAction {
    pub index_name: String,
    pub provisioned_throughput: ProvisionedThroughput,
}

/// Removal of a global secondary index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteGlobalSecondaryIndexAction {
    pub index_name: String,
}

/// A global secondary index as reported by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexDescription {
    pub index_name: Option<String>,
    pub key_schema: Option<Vec<KeySchemaElement>>,
    pub projection: Option<Projection>,
    pub index_status: Option<IndexStatus>,
    pub backfilling: Option<bool>,
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    pub index_size_bytes: Option<i64>,
    pub item_count: Option<i64>,
    pub index_arn: Option<String>,
}

/// A local secondary index as reported by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndexDescription {
    pub index_name: Option<String>,
    pub key_schema: Option<Vec<KeySchemaElement>>,
    pub projection: Option<Projection>,
    pub index_size_bytes: Option<i64>,
    pub item_count: Option<i64>,
    pub index_arn: Option<String>,
}

/// Stream settings of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSpecification {
    pub stream_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<StreamViewType>,
}

/// Billing mode summary reported in a table description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BillingModeSummary {
    pub billing_mode: Option<BillingMode>,
    /// Epoch seconds.
    pub last_update_to_pay_per_request_date_time: Option<f64>,
}

/// Description of a table returned by the table administration operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    pub table_name: Option<String>,
    pub table_status: Option<TableStatus>,
    pub key_schema: Option<Vec<KeySchemaElement>>,
    pub attribute_definitions: Option<Vec<AttributeDefinition>>,
    /// Epoch seconds.
    pub creation_date_time: Option<f64>,
    pub item_count: Option<i64>,
    pub table_size_bytes: Option<i64>,
    pub table_arn: Option<String>,
    pub table_id: Option<String>,
    pub billing_mode_summary: Option<BillingModeSummary>,
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    pub global_secondary_indexes: Option<Vec<GlobalSecondaryIndexDescription>>,
    pub local_secondary_indexes: Option<Vec<LocalSecondaryIndexDescription>>,
    pub stream_specification: Option<StreamSpecification>,
    pub latest_stream_arn: Option<String>,
    pub latest_stream_label: Option<String>,
}

// ---------------------------------------------------------------------------
// Capacity & metrics
// ---------------------------------------------------------------------------

/// Capacity consumed by a table or a single index.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capacity {
    pub read_capacity_units: Option<f64>,
    pub write_capacity_units: Option<f64>,
    pub capacity_units: Option<f64>,
}

/// Capacity consumed by one operation on one table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    pub table_name: Option<String>,
    pub capacity_units: Option<f64>,
    pub read_capacity_units: Option<f64>,
    pub write_capacity_units: Option<f64>,
    pub table: Option<Capacity>,
    pub local_secondary_indexes: Option<HashMap<String, Capacity>>,
    pub global_secondary_indexes: Option<HashMap<String, Capacity>>,
}

/// Size estimate of the item collection touched by a write.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemCollectionMetrics {
    pub item_collection_key: Option<Key>,
    #[serde(rename = "SizeEstimateRangeGB")]
    pub size_estimate_range_gb: Option<Vec<f64>>,
}

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

/// Keys to read from one table in a `BatchGetItem`, plus read options.
///
/// Also the shape of `UnprocessedKeys` entries, which are resent verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    pub keys: Vec<Key>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

impl KeysAndAttributes {
    /// Read the given keys with default options.
    #[must_use]
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }
}

/// One put or delete inside a `BatchWriteItem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

impl WriteRequest {
    /// A put of `item`.
    #[must_use]
    pub fn put(item: Item) -> Self {
        Self {
            put_request: Some(PutRequest { item }),
            delete_request: None,
        }
    }

    /// A delete of `key`.
    #[must_use]
    pub fn delete(key: Key) -> Self {
        Self {
            put_request: None,
            delete_request: Some(DeleteRequest { key }),
        }
    }
}

/// The put half of a [`WriteRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    pub item: Item,
}

/// The delete half of a [`WriteRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    pub key: Key,
}

//! DynamoDB operation names.

use std::fmt;

/// Service prefix and API version joined into every `X-Amz-Target` value.
pub const TARGET_PREFIX: &str = "DynamoDB_20120810";

/// Every operation the client can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamoDBOperation {
    // Table management
    /// Create a new table.
    CreateTable,
    /// Change a table's throughput or indexes.
    UpdateTable,
    /// Delete a table.
    DeleteTable,
    /// Describe a table.
    DescribeTable,
    /// List table names.
    ListTables,

    // Item CRUD
    /// Put (insert or replace) an item.
    PutItem,
    /// Get an item by primary key.
    GetItem,
    /// Update an item.
    UpdateItem,
    /// Delete an item by primary key.
    DeleteItem,

    // Query & Scan
    /// Query items by key condition.
    Query,
    /// Scan a table or index.
    Scan,

    // Batch operations
    /// Get items from one or more tables.
    BatchGetItem,
    /// Put or delete items in one or more tables.
    BatchWriteItem,
}

impl DynamoDBOperation {
    /// Returns the operation name as used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTable => "CreateTable",
            Self::UpdateTable => "UpdateTable",
            Self::DeleteTable => "DeleteTable",
            Self::DescribeTable => "DescribeTable",
            Self::ListTables => "ListTables",
            Self::PutItem => "PutItem",
            Self::GetItem => "GetItem",
            Self::UpdateItem => "UpdateItem",
            Self::DeleteItem => "DeleteItem",
            Self::Query => "Query",
            Self::Scan => "Scan",
            Self::BatchGetItem => "BatchGetItem",
            Self::BatchWriteItem => "BatchWriteItem",
        }
    }

    /// Returns the full `X-Amz-Target` header value for this operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynawire_model::DynamoDBOperation;
    ///
    /// assert_eq!(
    ///     DynamoDBOperation::ListTables.target(),
    ///     "DynamoDB_20120810.ListTables"
    /// );
    /// ```
    #[must_use]
    pub fn target(&self) -> String {
        format!("{TARGET_PREFIX}.{}", self.as_str())
    }
}

impl fmt::Display for DynamoDBOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! The [`Request`] trait binding each input to its operation and output.
//!
//! Batch operations may be only partially processed by the service. Their
//! inputs opt into completion by overriding the three completion hooks, which
//! [`CompletingConnection`](crate::connection::CompletingConnection) drives.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use dynawire_model::DynamoDBOperation;
use dynawire_model::input::{
    BatchGetItemInput, BatchWriteItemInput, CreateTableInput, DeleteItemInput, DeleteTableInput,
    DescribeTableInput, GetItemInput, ListTablesInput, PutItemInput, QueryInput, ScanInput,
    UpdateItemInput, UpdateTableInput,
};
use dynawire_model::output::{
    BatchGetItemOutput, BatchWriteItemOutput, CreateTableOutput, DeleteItemOutput,
    DeleteTableOutput, DescribeTableOutput, GetItemOutput, ListTablesOutput, PutItemOutput,
    QueryOutput, ScanOutput, UpdateItemOutput, UpdateTableOutput,
};

/// A request that can be sent through a [`Connection`](crate::connection::Connection).
///
/// The payload is the value's `Serialize` impl. Serialization must be
/// deterministic: a request is re-serialized on every retry.
pub trait Request: Serialize + Send + Sync + Sized {
    /// The decoded response.
    type Output: DeserializeOwned + Send;

    /// The operation named in `X-Amz-Target`.
    fn operation(&self) -> DynamoDBOperation;

    /// Whether a response may be partial and need follow-up requests.
    fn is_completable(&self) -> bool {
        false
    }

    /// The follow-up request for the unprocessed remainder of `output`, or
    /// `None` when nothing is left.
    fn completion_action(&self, _output: &Self::Output) -> Option<Self> {
        None
    }

    /// Merge the response to a follow-up request into the accumulated output.
    fn complete_response(&self, _accumulated: &mut Self::Output, _partial: Self::Output) {}
}

macro_rules! simple_request {
    ($($input:ty => $output:ty, $op:ident;)+) => {
        $(
            impl Request for $input {
                type Output = $output;

                fn operation(&self) -> DynamoDBOperation {
                    DynamoDBOperation::$op
                }
            }
        )+
    };
}

simple_request! {
    CreateTableInput => CreateTableOutput, CreateTable;
    UpdateTableInput => UpdateTableOutput, UpdateTable;
    DeleteTableInput => DeleteTableOutput, DeleteTable;
    DescribeTableInput => DescribeTableOutput, DescribeTable;
    ListTablesInput => ListTablesOutput, ListTables;
    PutItemInput => PutItemOutput, PutItem;
    GetItemInput => GetItemOutput, GetItem;
    UpdateItemInput => UpdateItemOutput, UpdateItem;
    DeleteItemInput => DeleteItemOutput, DeleteItem;
    QueryInput => QueryOutput, Query;
    ScanInput => ScanOutput, Scan;
}

impl Request for BatchGetItemInput {
    type Output = BatchGetItemOutput;

    fn operation(&self) -> DynamoDBOperation {
        DynamoDBOperation::BatchGetItem
    }

    fn is_completable(&self) -> bool {
        true
    }

    fn completion_action(&self, output: &BatchGetItemOutput) -> Option<Self> {
        if !output.has_unprocessed_keys() {
            return None;
        }
        let remaining = output
            .unprocessed_keys
            .iter()
            .flatten()
            .filter(|(_, keys)| !keys.keys.is_empty())
            .map(|(table, keys)| (table.clone(), keys.clone()))
            .collect();
        Some(self.with_request_items(remaining))
    }

    /// Concatenate items per table, take the latest unprocessed keys, and
    /// append consumed capacity.
    fn complete_response(&self, accumulated: &mut BatchGetItemOutput, partial: BatchGetItemOutput) {
        if let Some(responses) = partial.responses {
            let merged = accumulated.responses.get_or_insert_with(HashMap::new);
            for (table, items) in responses {
                merged.entry(table).or_default().extend(items);
            }
        }
        accumulated.unprocessed_keys = partial.unprocessed_keys;
        if let Some(capacity) = partial.consumed_capacity {
            accumulated
                .consumed_capacity
                .get_or_insert_with(Vec::new)
                .extend(capacity);
        }
    }
}

impl Request for BatchWriteItemInput {
    type Output = BatchWriteItemOutput;

    fn operation(&self) -> DynamoDBOperation {
        DynamoDBOperation::BatchWriteItem
    }

    fn is_completable(&self) -> bool {
        true
    }

    fn completion_action(&self, output: &BatchWriteItemOutput) -> Option<Self> {
        if !output.has_unprocessed_items() {
            return None;
        }
        let remaining = output
            .unprocessed_items
            .iter()
            .flatten()
            .filter(|(_, writes)| !writes.is_empty())
            .map(|(table, writes)| (table.clone(), writes.clone()))
            .collect();
        Some(self.with_request_items(remaining))
    }

    /// Writes return no items, so the latest response replaces everything.
    fn complete_response(
        &self,
        accumulated: &mut BatchWriteItemOutput,
        partial: BatchWriteItemOutput,
    ) {
        *accumulated = partial;
    }
}

#[cfg(test)]
mod tests {
    use dynawire_model::types::{KeysAndAttributes, WriteRequest};
    use dynawire_model::{AttributeValue, Key};

    use super::*;

    fn key(pk: &str) -> Key {
        HashMap::from([("pk".to_owned(), AttributeValue::from(pk))])
    }

    #[test]
    fn test_should_name_operations() {
        assert_eq!(
            ScanInput::new("t").operation(),
            DynamoDBOperation::Scan
        );
        assert_eq!(
            ListTablesInput::default().operation().target(),
            "DynamoDB_20120810.ListTables"
        );
        assert!(!GetItemInput::new("t", key("a")).is_completable());
    }

    #[test]
    fn test_should_not_continue_batch_get_without_unprocessed_keys() {
        let request = BatchGetItemInput::for_table("t", vec![key("a")]);
        assert!(request.is_completable());
        assert!(request.completion_action(&BatchGetItemOutput::default()).is_none());

        let empty = BatchGetItemOutput {
            unprocessed_keys: Some(HashMap::from([(
                "t".to_owned(),
                KeysAndAttributes::new(vec![]),
            )])),
            ..BatchGetItemOutput::default()
        };
        assert!(request.completion_action(&empty).is_none());
    }

    #[test]
    fn test_should_resend_unprocessed_keys_verbatim() {
        let request = BatchGetItemInput {
            return_consumed_capacity: Some(dynawire_model::types::ReturnConsumedCapacity::Total),
            ..BatchGetItemInput::for_table("t", vec![key("a"), key("b")])
        };
        let unprocessed = KeysAndAttributes {
            consistent_read: Some(true),
            ..KeysAndAttributes::new(vec![key("b")])
        };
        let output = BatchGetItemOutput {
            unprocessed_keys: Some(HashMap::from([("t".to_owned(), unprocessed.clone())])),
            ..BatchGetItemOutput::default()
        };

        let next = request.completion_action(&output).unwrap();
        assert_eq!(next.request_items["t"], unprocessed);
        assert_eq!(
            next.return_consumed_capacity,
            request.return_consumed_capacity
        );
    }

    #[test]
    fn test_should_merge_batch_get_pages() {
        let request = BatchGetItemInput::for_table("t", vec![]);
        let mut accumulated = BatchGetItemOutput {
            responses: Some(HashMap::from([("t".to_owned(), vec![key("a")])])),
            unprocessed_keys: Some(HashMap::from([(
                "t".to_owned(),
                KeysAndAttributes::new(vec![key("b"), key("c")]),
            )])),
            consumed_capacity: None,
        };
        let partial = BatchGetItemOutput {
            responses: Some(HashMap::from([
                ("t".to_owned(), vec![key("b")]),
                ("u".to_owned(), vec![key("x")]),
            ])),
            unprocessed_keys: Some(HashMap::from([(
                "t".to_owned(),
                KeysAndAttributes::new(vec![key("c")]),
            )])),
            consumed_capacity: Some(vec![Default::default()]),
        };

        request.complete_response(&mut accumulated, partial);

        let responses = accumulated.responses.as_ref().unwrap();
        assert_eq!(responses["t"], vec![key("a"), key("b")]);
        assert_eq!(responses["u"], vec![key("x")]);
        assert_eq!(
            accumulated.unprocessed_keys.as_ref().unwrap()["t"].keys,
            vec![key("c")]
        );
        assert_eq!(accumulated.consumed_capacity.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_should_replace_batch_write_output() {
        let request = BatchWriteItemInput::for_table("t", vec![WriteRequest::delete(key("a"))]);
        let mut accumulated = BatchWriteItemOutput {
            unprocessed_items: Some(HashMap::from([(
                "t".to_owned(),
                vec![WriteRequest::delete(key("a"))],
            )])),
            ..BatchWriteItemOutput::default()
        };
        let next = request.completion_action(&accumulated).unwrap();
        assert_eq!(next.request_items["t"], vec![WriteRequest::delete(key("a"))]);

        request.complete_response(&mut accumulated, BatchWriteItemOutput::default());
        assert!(accumulated.unprocessed_items.is_none());
        assert!(request.completion_action(&accumulated).is_none());
    }
}

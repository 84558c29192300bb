//! Single-table batch helpers that split arbitrarily many keys or writes into
//! service-sized `BatchGetItem` and `BatchWriteItem` calls.

use std::collections::VecDeque;

use futures::Stream;
use futures::stream;
use tracing::debug;

use dynawire_model::input::{BatchGetItemInput, BatchWriteItemInput};
use dynawire_model::types::WriteRequest;
use dynawire_model::{Item, Key};

use crate::connection::Connection;
use crate::error::Error;
use crate::request::Request;

/// Most keys the service accepts in one `BatchGetItem`.
pub const MAX_BATCH_GET_KEYS: usize = 100;

/// Most puts and deletes the service accepts in one `BatchWriteItem`.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

fn chunked<T>(values: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let mut chunks = Vec::with_capacity(values.len().div_ceil(size));
    let mut values = values.into_iter();
    loop {
        let chunk: Vec<T> = values.by_ref().take(size).collect();
        if chunk.is_empty() {
            return chunks;
        }
        chunks.push(chunk);
    }
}

struct BatchGetPager {
    pending: VecDeque<Item>,
    requests: VecDeque<BatchGetItemInput>,
}

/// Stream the items stored under `keys` in `table`.
///
/// Keys are read `MAX_BATCH_GET_KEYS` at a time, one chunk per call, and only
/// when the items of the previous chunk have been consumed. Keys the service
/// leaves unprocessed are requested again before the next chunk. Items come
/// back in whatever order the service returns them; keys with no item are
/// skipped.
///
/// Unprocessed keys are re-requested immediately. Over a bare
/// [`SigningConnection`](crate::transport::SigningConnection) a service that
/// keeps returning them is polled without pause; pass the
/// [`Client`](crate::Client) stack to get throttling backoff.
pub fn iterate_batch_get_item<'a, C: Connection>(
    conn: &'a C,
    table: &str,
    keys: Vec<Key>,
) -> impl Stream<Item = Result<Item, Error>> + Send + use<'a, C> {
    let pager = BatchGetPager {
        pending: VecDeque::new(),
        requests: chunked(keys, MAX_BATCH_GET_KEYS)
            .into_iter()
            .map(|chunk| BatchGetItemInput::for_table(table, chunk))
            .collect(),
    };
    stream::unfold(pager, move |mut pager| async move {
        loop {
            if let Some(item) = pager.pending.pop_front() {
                return Some((Ok(item), pager));
            }
            let request = pager.requests.pop_front()?;
            match conn.send(&request).await {
                Ok(output) => {
                    if let Some(next) = request.completion_action(&output) {
                        debug!("re-requesting unprocessed keys");
                        pager.requests.push_front(next);
                    }
                    let items = output.responses.into_iter().flatten();
                    pager.pending.extend(items.flat_map(|(_, items)| items));
                }
                Err(err) => {
                    pager.requests.clear();
                    return Some((Err(err), pager));
                }
            }
        }
    })
}

/// Put every item in `items` into `table`.
///
/// # Errors
///
/// Returns the first error from the connection. Chunks sent before the
/// failure stay written.
pub async fn batch_put_item<C: Connection>(
    conn: &C,
    table: impl Into<String>,
    items: Vec<Item>,
) -> Result<(), Error> {
    let requests = items.into_iter().map(WriteRequest::put).collect();
    batch_write(conn, table, requests).await
}

/// Delete every key in `keys` from `table`.
///
/// # Errors
///
/// Returns the first error from the connection. Chunks sent before the
/// failure stay deleted.
pub async fn batch_delete_item<C: Connection>(
    conn: &C,
    table: impl Into<String>,
    keys: Vec<Key>,
) -> Result<(), Error> {
    let requests = keys.into_iter().map(WriteRequest::delete).collect();
    batch_write(conn, table, requests).await
}

/// Send `requests` against `table` in chunks of `MAX_BATCH_WRITE_ITEMS`,
/// resubmitting each chunk's unprocessed items until none are left.
///
/// Resubmission is immediate. Over a bare
/// [`SigningConnection`](crate::transport::SigningConnection) a service that
/// keeps returning the same unprocessed items is polled without pause; pass
/// the [`Client`](crate::Client) stack to get throttling backoff.
///
/// # Errors
///
/// Returns the first error from the connection.
pub async fn batch_write<C: Connection>(
    conn: &C,
    table: impl Into<String>,
    requests: Vec<WriteRequest>,
) -> Result<(), Error> {
    let table = table.into();
    for chunk in chunked(requests, MAX_BATCH_WRITE_ITEMS) {
        let mut request = BatchWriteItemInput::for_table(table.clone(), chunk);
        loop {
            let output = conn.send(&request).await?;
            let Some(next) = request.completion_action(&output) else {
                break;
            };
            debug!(table = %table, "resubmitting unprocessed writes");
            request = next;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use dynawire_model::AttributeValue;
    use futures::{StreamExt, TryStreamExt};
    use serde_json::{Value, json};

    use super::*;
    use crate::connection::tests::ScriptedConnection;

    fn key(pk: usize) -> Key {
        HashMap::from([("pk".to_owned(), AttributeValue::from(pk.to_string()))])
    }

    fn keys(n: usize) -> Vec<Key> {
        (0..n).map(key).collect()
    }

    fn sent_len(body: &Value, table: &str, field: &str) -> usize {
        let items = &body["RequestItems"][table];
        let list = if field.is_empty() { items } else { &items[field] };
        list.as_array().map_or(0, Vec::len)
    }

    #[test]
    fn test_should_chunk_without_empty_tail() {
        let sizes: Vec<usize> = chunked(keys(250), 100).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert!(chunked(keys(0), 25).is_empty());
        assert_eq!(chunked(keys(25), 25).len(), 1);
    }

    #[tokio::test]
    async fn test_should_read_keys_in_chunks_of_one_hundred() {
        let conn = ScriptedConnection::new([
            Ok(json!({"Responses": {"t": [{"pk": {"S": "0"}}]}})),
            Ok(json!({"Responses": {"t": [{"pk": {"S": "100"}}]}})),
            Ok(json!({"Responses": {"t": [{"pk": {"S": "200"}}]}})),
        ]);
        let items: Vec<Item> = iterate_batch_get_item(&conn, "t", keys(250))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(items.len(), 3);

        let sent = conn.sent.lock();
        let sizes: Vec<usize> = sent.iter().map(|b| sent_len(b, "t", "Keys")).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[tokio::test]
    async fn test_should_request_next_chunk_only_when_consumed() {
        let conn = ScriptedConnection::new([
            Ok(json!({"Responses": {"t": [{"pk": {"S": "0"}}]}})),
            Ok(json!({"Responses": {"t": [{"pk": {"S": "100"}}]}})),
        ]);
        let mut stream = Box::pin(iterate_batch_get_item(&conn, "t", keys(150)));
        assert!(stream.next().await.unwrap().is_ok());
        assert_eq!(conn.sent_count(), 1);
        assert!(stream.next().await.unwrap().is_ok());
        assert_eq!(conn.sent_count(), 2);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_should_rerequest_unprocessed_keys_before_next_chunk() {
        let conn = ScriptedConnection::new([
            Ok(json!({
                "Responses": {"t": [{"pk": {"S": "0"}}]},
                "UnprocessedKeys": {"t": {"Keys": [{"pk": {"S": "1"}}]}}
            })),
            Ok(json!({"Responses": {"t": [{"pk": {"S": "1"}}]}})),
        ]);
        let items: Vec<Item> = iterate_batch_get_item(&conn, "t", keys(2))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(items, vec![key(0), key(1)]);
        assert_eq!(
            conn.sent.lock()[1]["RequestItems"]["t"]["Keys"],
            json!([{"pk": {"S": "1"}}])
        );
    }

    #[tokio::test]
    async fn test_should_not_send_empty_batches() {
        let conn = ScriptedConnection::default();
        let items: Vec<_> = iterate_batch_get_item(&conn, "t", vec![]).collect().await;
        assert!(items.is_empty());
        batch_put_item(&conn, "t", vec![]).await.unwrap();
        assert_eq!(conn.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_should_end_batch_get_after_error() {
        let conn = ScriptedConnection::new([Err(Error::Network {
            message: "reset".to_owned(),
        })]);
        let results: Vec<_> = iterate_batch_get_item(&conn, "t", keys(150)).collect().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
        assert_eq!(conn.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_should_put_items_in_chunks_of_twenty_five() {
        let conn = ScriptedConnection::new([Ok(json!({})), Ok(json!({}))]);
        batch_put_item(&conn, "t", keys(30)).await.unwrap();

        let sent = conn.sent.lock();
        let sizes: Vec<usize> = sent.iter().map(|b| sent_len(b, "t", "")).collect();
        assert_eq!(sizes, vec![25, 5]);
        assert_eq!(
            sent[1]["RequestItems"]["t"][0],
            json!({"PutRequest": {"Item": {"pk": {"S": "25"}}}})
        );
    }

    #[tokio::test]
    async fn test_should_resubmit_unprocessed_items_until_empty() {
        let conn = ScriptedConnection::new([
            Ok(json!({
                "UnprocessedItems": {"t": [
                    {"DeleteRequest": {"Key": {"pk": {"S": "1"}}}},
                    {"DeleteRequest": {"Key": {"pk": {"S": "2"}}}}
                ]}
            })),
            Ok(json!({
                "UnprocessedItems": {"t": [{"DeleteRequest": {"Key": {"pk": {"S": "2"}}}}]}
            })),
            Ok(json!({"UnprocessedItems": {}})),
        ]);
        batch_delete_item(&conn, "t", keys(3)).await.unwrap();

        let sent = conn.sent.lock();
        let sizes: Vec<usize> = sent.iter().map(|b| sent_len(b, "t", "")).collect();
        assert_eq!(sizes, vec![3, 2, 1]);
        assert_eq!(
            sent[2]["RequestItems"]["t"],
            json!([{"DeleteRequest": {"Key": {"pk": {"S": "2"}}}}])
        );
    }

    #[tokio::test]
    async fn test_should_stop_writing_at_first_error() {
        let conn = ScriptedConnection::new([Err(Error::Server {
            status: 500,
            body: String::new(),
        })]);
        let err = batch_delete_item(&conn, "t", keys(60)).await.unwrap_err();
        assert!(matches!(err, Error::Server { status: 500, .. }));
        assert_eq!(conn.sent_count(), 1);
    }
}

//! Lazy, forward-only streams over paginated operations.
//!
//! Each stream owns a queue of items from the last page and the request for
//! the next one. It only calls the connection once the queue is empty, so
//! items arrive in exactly the order the service returned them. A page
//! without a cursor ends the stream. An error is yielded once and then ends
//! the stream.

use std::collections::VecDeque;

use futures::Stream;
use futures::stream;

use dynawire_model::input::{ListTablesInput, QueryInput, ScanInput};
use dynawire_model::output::{ListTablesOutput, QueryOutput, ScanOutput};
use dynawire_model::{Item, Key};

use crate::connection::Connection;
use crate::error::Error;
use crate::request::Request;

/// A request whose response is one page of a longer result.
pub trait Paginated: Request + 'static {
    /// What the stream yields.
    type Item: Send + 'static;

    /// Split a page into its items and the request for the following page,
    /// `None` on the last page.
    fn next_page(&self, output: Self::Output) -> (Vec<Self::Item>, Option<Self>);
}

impl Paginated for QueryInput {
    type Item = Item;

    fn next_page(&self, output: QueryOutput) -> (Vec<Item>, Option<Self>) {
        let next =
            continuation(output.last_evaluated_key).map(|k| self.with_exclusive_start_key(k));
        (output.items.unwrap_or_default(), next)
    }
}

impl Paginated for ScanInput {
    type Item = Item;

    fn next_page(&self, output: ScanOutput) -> (Vec<Item>, Option<Self>) {
        let next =
            continuation(output.last_evaluated_key).map(|k| self.with_exclusive_start_key(k));
        (output.items.unwrap_or_default(), next)
    }
}

impl Paginated for ListTablesInput {
    type Item = String;

    fn next_page(&self, output: ListTablesOutput) -> (Vec<String>, Option<Self>) {
        let next = output
            .last_evaluated_table_name
            .filter(|name| !name.is_empty())
            .map(|name| self.with_exclusive_start_table_name(name));
        (output.table_names.unwrap_or_default(), next)
    }
}

/// An empty cursor means the same as no cursor.
fn continuation(key: Option<Key>) -> Option<Key> {
    key.filter(|k| !k.is_empty())
}

struct Pager<R: Paginated> {
    pending: VecDeque<R::Item>,
    next_request: Option<R>,
}

/// Stream every item of a paginated operation, starting with `request`.
pub fn paginate<'a, C, R>(
    conn: &'a C,
    request: R,
) -> impl Stream<Item = Result<R::Item, Error>> + Send + 'a
where
    C: Connection,
    R: Paginated,
{
    let pager = Pager {
        pending: VecDeque::new(),
        next_request: Some(request),
    };
    stream::unfold(pager, move |mut pager| async move {
        loop {
            if let Some(item) = pager.pending.pop_front() {
                return Some((Ok(item), pager));
            }
            let request = pager.next_request.take()?;
            match conn.send(&request).await {
                Ok(output) => {
                    let (items, next) = request.next_page(output);
                    pager.pending.extend(items);
                    pager.next_request = next;
                }
                Err(err) => return Some((Err(err), pager)),
            }
        }
    })
}

/// Stream every item matching a query.
pub fn iterate_query<C: Connection>(
    conn: &C,
    request: QueryInput,
) -> impl Stream<Item = Result<Item, Error>> + Send + '_ {
    paginate(conn, request)
}

/// Stream every item of a scan.
pub fn iterate_scan<C: Connection>(
    conn: &C,
    request: ScanInput,
) -> impl Stream<Item = Result<Item, Error>> + Send + '_ {
    paginate(conn, request)
}

/// Stream every table name.
pub fn iterate_list_tables<C: Connection>(
    conn: &C,
    request: ListTablesInput,
) -> impl Stream<Item = Result<String, Error>> + Send + '_ {
    paginate(conn, request)
}

/// One independent stream per segment of a parallel scan.
///
/// The streams share nothing but the connection; drive them one after another,
/// interleaved with `futures::stream::select_all`, or on separate tasks.
pub fn iterate_parallel_scan<'a, C: Connection>(
    conn: &'a C,
    request: &ScanInput,
    total_segments: u16,
) -> Vec<impl Stream<Item = Result<Item, Error>> + Send + use<'a, C>> {
    request
        .parallel(total_segments)
        .into_iter()
        .map(|segment| paginate(conn, segment))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use dynawire_model::{AttributeValue, DynamoDBErrorCode};
    use futures::{StreamExt, TryStreamExt};
    use serde_json::json;

    use super::*;
    use crate::connection::tests::ScriptedConnection;

    fn pk(item: &Item) -> &str {
        item["pk"].as_s().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_should_yield_items_across_pages_in_order() {
        let conn = ScriptedConnection::new([
            Ok(json!({
                "Items": [{"pk": {"S": "a"}}, {"pk": {"S": "b"}}],
                "LastEvaluatedKey": {"pk": {"S": "b"}}
            })),
            Ok(json!({
                "Items": [{"pk": {"S": "c"}}],
                "LastEvaluatedKey": {"pk": {"S": "c"}}
            })),
            Ok(json!({"Items": []})),
        ]);

        let items: Vec<Item> = iterate_scan(&conn, ScanInput::new("t"))
            .try_collect()
            .await
            .unwrap();
        let keys: Vec<&str> = items.iter().map(pk).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);

        let sent = conn.sent.lock();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].get("ExclusiveStartKey").is_none());
        assert_eq!(sent[1]["ExclusiveStartKey"], json!({"pk": {"S": "b"}}));
        assert_eq!(sent[2]["ExclusiveStartKey"], json!({"pk": {"S": "c"}}));
    }

    #[tokio::test]
    async fn test_should_not_send_until_polled() {
        let conn = ScriptedConnection::new([Ok(json!({"Items": [{"pk": {"S": "a"}}]}))]);
        let stream = iterate_query(
            &conn,
            QueryInput::new(
                "t",
                "pk = :pk",
                HashMap::from([(":pk".to_owned(), AttributeValue::from("a"))]),
            ),
        );
        assert_eq!(conn.sent_count(), 0);
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(conn.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_should_stop_on_empty_cursor() {
        let conn = ScriptedConnection::new([Ok(json!({
            "Items": [{"pk": {"S": "a"}}],
            "LastEvaluatedKey": {}
        }))]);
        let items: Vec<Item> = iterate_scan(&conn, ScanInput::new("t"))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(conn.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_should_end_stream_after_error() {
        let conn = ScriptedConnection::new([
            Ok(json!({
                "Items": [{"pk": {"S": "a"}}],
                "LastEvaluatedKey": {"pk": {"S": "a"}}
            })),
            Err(Error::Client {
                status: 400,
                code: DynamoDBErrorCode::ResourceNotFoundException,
                message: String::new(),
                body: String::new(),
            }),
        ]);
        let results: Vec<_> = iterate_scan(&conn, ScanInput::new("t")).collect().await;
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err().code(),
            Some(DynamoDBErrorCode::ResourceNotFoundException)
        );
        assert_eq!(conn.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_should_page_table_names() {
        let conn = ScriptedConnection::new([
            Ok(json!({"TableNames": ["a", "b"], "LastEvaluatedTableName": "b"})),
            Ok(json!({"TableNames": ["c"]})),
        ]);
        let names: Vec<String> = iterate_list_tables(&conn, ListTablesInput::default())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(
            conn.sent.lock()[1]["ExclusiveStartTableName"],
            json!("b")
        );
    }

    #[tokio::test]
    async fn test_should_scan_every_segment_independently() {
        let conn = ScriptedConnection::new([
            Ok(json!({"Items": [{"pk": {"S": "a"}}]})),
            Ok(json!({"Items": [{"pk": {"S": "b"}}]})),
            Ok(json!({"Items": [{"pk": {"S": "c"}}]})),
        ]);
        let segments = iterate_parallel_scan(&conn, &ScanInput::new("t"), 3);
        assert_eq!(segments.len(), 3);

        let items: Vec<Item> = stream::select_all(segments.into_iter().map(Box::pin))
            .try_collect()
            .await
            .unwrap();
        let keys: HashSet<&str> = items.iter().map(pk).collect();
        assert_eq!(keys, HashSet::from(["a", "b", "c"]));

        let segment_ids: HashSet<i64> = conn
            .sent
            .lock()
            .iter()
            .map(|body| {
                assert_eq!(body["TotalSegments"], json!(3));
                body["Segment"].as_i64().unwrap()
            })
            .collect();
        assert_eq!(segment_ids, HashSet::from([0, 1, 2]));
    }
}

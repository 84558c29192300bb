//! DynamoDB integration tests against a running DynamoDB-compatible server.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use futures::TryStreamExt;

    use dynawire_client::{Client, Error};
    use dynawire_model::input::{
        CreateTableInput, DeleteTableInput, DescribeTableInput, GetItemInput, ListTablesInput,
        PutItemInput, QueryInput, ScanInput, UpdateItemInput,
    };
    use dynawire_model::types::{
        AttributeDefinition, KeySchemaElement, ReturnValue, ScalarAttributeType,
    };
    use dynawire_model::{AttributeValue, DynamoDBErrorCode, Item, Key};

    use crate::{dynamodb_client, test_table_name};

    fn pk(value: &str) -> Key {
        HashMap::from([("pk".to_owned(), AttributeValue::from(value))])
    }

    /// Helper: create a simple table with a hash key.
    async fn create_simple_table(client: &Client, table_name: &str) -> anyhow::Result<()> {
        client
            .create_table(CreateTableInput::new(
                table_name,
                vec![KeySchemaElement::hash("pk")],
                vec![AttributeDefinition::new("pk", ScalarAttributeType::S)],
            ))
            .await?;
        Ok(())
    }

    /// Helper: create a composite-key table with partition + sort key.
    async fn create_composite_table(client: &Client, table_name: &str) -> anyhow::Result<()> {
        client
            .create_table(CreateTableInput::new(
                table_name,
                vec![KeySchemaElement::hash("pk"), KeySchemaElement::range("sk")],
                vec![
                    AttributeDefinition::new("pk", ScalarAttributeType::S),
                    AttributeDefinition::new("sk", ScalarAttributeType::S),
                ],
            ))
            .await?;
        Ok(())
    }

    async fn drop_table(client: &Client, table_name: &str) {
        let _ = client.delete_table(DeleteTableInput::new(table_name)).await;
    }

    // -----------------------------------------------------------------------
    // Table Operations
    // -----------------------------------------------------------------------

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_create_and_describe_table() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("create");

        create_simple_table(&client, &table_name).await?;

        let resp = client
            .describe_table(DescribeTableInput::new(&table_name))
            .await?;
        let desc = resp.table.expect("table description");
        tracing::info!(status = ?desc.table_status, "described table");
        assert_eq!(desc.table_name.as_deref(), Some(table_name.as_str()));
        let key_schema = desc.key_schema.unwrap_or_default();
        assert_eq!(key_schema.len(), 1);
        assert_eq!(key_schema[0].attribute_name, "pk");

        drop_table(&client, &table_name).await;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_stream_all_table_names() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("list");

        create_simple_table(&client, &table_name).await?;

        let names: Vec<String> = client.list_tables_stream().try_collect().await?;
        assert!(names.contains(&table_name));

        let first_page = client
            .list_tables(ListTablesInput {
                limit: Some(1),
                ..ListTablesInput::default()
            })
            .await?;
        assert!(first_page.table_names.unwrap_or_default().len() <= 1);

        drop_table(&client, &table_name).await;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_error_on_describe_nonexistent_table() {
        let client = dynamodb_client();

        let err = client
            .describe_table(DescribeTableInput::new("nonexistent-table-xyz"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(DynamoDBErrorCode::ResourceNotFoundException));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_error_on_duplicate_table_creation() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("dup");

        create_simple_table(&client, &table_name).await?;
        let err = create_simple_table(&client, &table_name).await.unwrap_err();
        let err = err.downcast::<Error>()?;
        assert_eq!(err.code(), Some(DynamoDBErrorCode::ResourceInUseException));

        drop_table(&client, &table_name).await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Item CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_put_update_and_get_item() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("putget");

        create_simple_table(&client, &table_name).await?;

        let mut item = pk("user1");
        item.insert("name".to_owned(), AttributeValue::from("Alice"));
        item.insert("age".to_owned(), AttributeValue::number(30));
        client.put_item(PutItemInput::new(&table_name, item)).await?;

        let updated = client
            .update_item(UpdateItemInput {
                expression_attribute_values: Some(HashMap::from([(
                    ":one".to_owned(),
                    AttributeValue::number(1),
                )])),
                return_values: Some(ReturnValue::AllNew),
                ..UpdateItemInput::new(&table_name, pk("user1"), "SET age = age + :one")
            })
            .await?;
        let attributes = updated.attributes.unwrap_or_default();
        assert_eq!(attributes["age"].as_n(), Some("31"));

        let resp = client
            .get_item(GetItemInput::new(&table_name, pk("user1")))
            .await?;
        let item = resp.item.expect("item");
        assert_eq!(item["name"].as_s(), Some("Alice"));
        assert_eq!(item["age"].as_n(), Some("31"));

        drop_table(&client, &table_name).await;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_reject_failed_condition() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("cond");

        create_simple_table(&client, &table_name).await?;
        client.put_item(PutItemInput::new(&table_name, pk("a"))).await?;

        let err = client
            .put_item(PutItemInput {
                condition_expression: Some("attribute_not_exists(pk)".to_owned()),
                ..PutItemInput::new(&table_name, pk("a"))
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.code(),
            Some(DynamoDBErrorCode::ConditionalCheckFailedException)
        );

        drop_table(&client, &table_name).await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Query & Scan
    // -----------------------------------------------------------------------

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_stream_query_across_pages() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("query");

        create_composite_table(&client, &table_name).await?;
        for i in 0..7 {
            let mut item = pk("user1");
            item.insert("sk".to_owned(), AttributeValue::from(format!("order#{i}")));
            client.put_item(PutItemInput::new(&table_name, item)).await?;
        }

        let input = QueryInput {
            limit: Some(2),
            ..QueryInput::new(
                &table_name,
                "pk = :pk",
                HashMap::from([(":pk".to_owned(), AttributeValue::from("user1"))]),
            )
        };
        let items: Vec<Item> = client.query_stream(input).try_collect().await?;
        let sort_keys: Vec<&str> = items.iter().filter_map(|i| i["sk"].as_s()).collect();
        assert_eq!(sort_keys.len(), 7);
        assert!(sort_keys.windows(2).all(|w| w[0] < w[1]));

        drop_table(&client, &table_name).await;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_scan_in_parallel_segments() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("scan");

        create_simple_table(&client, &table_name).await?;
        let items: Vec<Item> = (0..20).map(|i| pk(&format!("item{i}"))).collect();
        client.batch_put_item(&table_name, items).await?;

        let sequential: Vec<Item> = client
            .scan_stream(ScanInput {
                limit: Some(3),
                ..ScanInput::new(&table_name)
            })
            .try_collect()
            .await?;
        assert_eq!(sequential.len(), 20);

        let mut total = 0;
        for (segment, stream) in client
            .parallel_scan_streams(&ScanInput::new(&table_name), 4)
            .into_iter()
            .enumerate()
        {
            let items: Vec<Item> = stream.try_collect().await?;
            tracing::debug!(segment, count = items.len(), "scanned segment");
            total += items.len();
        }
        assert_eq!(total, 20);

        drop_table(&client, &table_name).await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Batch Operations
    // -----------------------------------------------------------------------

    #[tokio::test]
    #[ignore = "requires running DynamoDB-compatible endpoint"]
    async fn test_should_batch_write_and_get_many_items() -> anyhow::Result<()> {
        let client = dynamodb_client();
        let table_name = test_table_name("batch");

        create_simple_table(&client, &table_name).await?;

        let keys: Vec<Key> = (0..130).map(|i| pk(&format!("batch{i}"))).collect();
        client.batch_put_item(&table_name, keys.clone()).await?;

        let items: Vec<Item> = client
            .batch_get_stream(&table_name, keys.clone())
            .try_collect()
            .await?;
        assert_eq!(items.len(), 130);

        client.batch_delete_item(&table_name, keys.clone()).await?;
        let items: Vec<Item> = client
            .batch_get_stream(&table_name, keys)
            .try_collect()
            .await?;
        assert!(items.is_empty());

        drop_table(&client, &table_name).await;
        Ok(())
    }
}

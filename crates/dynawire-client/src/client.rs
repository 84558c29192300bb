//! High-level client over the standard connection stack.

use std::sync::Arc;

use futures::Stream;
use tracing::info;

use dynawire_auth::{CredentialProvider, EnvCredentialProvider};
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
use dynawire_model::{Item, Key};

use crate::batch;
use crate::config::ClientConfig;
use crate::connection::{CompletingConnection, Connection, RetryingConnection};
use crate::error::Error;
use crate::iter;
use crate::request::Request;
use crate::retry::RetryPolicy;
use crate::transport::{HttpSession, SigningConnection};

type Stack = CompletingConnection<RetryingConnection<SigningConnection<Arc<dyn HttpSession>>>>;

/// A DynamoDB client: signing, retrying and batch completion in one handle.
///
/// Cloning is cheap; clones share the HTTP session and can be used from
/// several tasks at once.
#[derive(Debug, Clone)]
pub struct Client {
    conn: Arc<Stack>,
}

/// Builder for [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    credentials: Option<Arc<dyn CredentialProvider>>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    session: Option<Arc<dyn HttpSession>>,
}

impl ClientBuilder {
    /// Start from [`ClientConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Signing region.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    /// Post to `endpoint` instead of the regional endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Credentials source. Defaults to the process environment.
    #[must_use]
    pub fn credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Retry policy. Defaults to exponential backoff built from the
    /// configuration's retry settings.
    #[must_use]
    pub fn retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// HTTP session. Defaults to a `reqwest` client using the configured
    /// timeout; a custom session brings its own timeouts.
    #[must_use]
    pub fn session(mut self, session: Arc<dyn HttpSession>) -> Self {
        self.session = Some(session);
        self
    }

    /// Assemble the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] for an unusable endpoint, or
    /// [`Error::Unknown`] when the default HTTP client cannot be created.
    pub fn build(self) -> Result<Client, Error> {
        let Self {
            config,
            credentials,
            retry_policy,
            session,
        } = self;

        let session: Arc<dyn HttpSession> = match session {
            Some(session) => session,
            None => Arc::new(
                reqwest::Client::builder()
                    .timeout(config.timeout)
                    .build()
                    .map_err(|err| Error::Unknown {
                        status: None,
                        message: format!("cannot build HTTP client: {err}"),
                    })?,
            ),
        };
        let credentials = credentials.unwrap_or_else(|| Arc::new(EnvCredentialProvider::new()));
        let retry_policy = retry_policy.unwrap_or_else(|| Arc::new(config.retry.policy()));

        let endpoint = config.endpoint_url();
        let signing = SigningConnection::new(&endpoint, &config.region, credentials, session)?;
        info!(%endpoint, region = %config.region, "dynawire client ready");

        Ok(Client {
            conn: Arc::new(CompletingConnection::new(RetryingConnection::new(
                signing,
                retry_policy,
            ))),
        })
    }
}

impl Client {
    /// A client for `config`, signing with `credentials`.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, Error> {
        ClientBuilder::new()
            .config(config)
            .credentials(credentials)
            .build()
    }

    /// A client configured entirely from the environment.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn from_env() -> Result<Self, Error> {
        ClientBuilder::new().config(ClientConfig::from_env()).build()
    }

    /// Start building a client.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.conn.inner().inner().endpoint()
    }

    /// The signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        self.conn.inner().inner().region()
    }

    /// Stream every item matching `input`, page by page.
    pub fn query_stream(
        &self,
        input: QueryInput,
    ) -> impl Stream<Item = Result<Item, Error>> + Send + '_ {
        iter::iterate_query(self, input)
    }

    /// Stream every item of a scan, page by page.
    pub fn scan_stream(
        &self,
        input: ScanInput,
    ) -> impl Stream<Item = Result<Item, Error>> + Send + '_ {
        iter::iterate_scan(self, input)
    }

    /// One stream per segment of a parallel scan.
    pub fn parallel_scan_streams<'a>(
        &'a self,
        input: &ScanInput,
        total_segments: u16,
    ) -> Vec<impl Stream<Item = Result<Item, Error>> + Send + use<'a>> {
        iter::iterate_parallel_scan(self, input, total_segments)
    }

    /// Stream every table name.
    pub fn list_tables_stream(&self) -> impl Stream<Item = Result<String, Error>> + Send + '_ {
        iter::iterate_list_tables(self, ListTablesInput::default())
    }

    /// Stream the items stored under `keys` in `table`.
    pub fn batch_get_stream<'a>(
        &'a self,
        table: &str,
        keys: Vec<Key>,
    ) -> impl Stream<Item = Result<Item, Error>> + Send + use<'a> {
        batch::iterate_batch_get_item(self, table, keys)
    }

    /// Put any number of items into `table`.
    ///
    /// # Errors
    ///
    /// Returns the first failure; earlier chunks stay written.
    pub async fn batch_put_item(&self, table: &str, items: Vec<Item>) -> Result<(), Error> {
        batch::batch_put_item(self, table, items).await
    }

    /// Delete any number of keys from `table`.
    ///
    /// # Errors
    ///
    /// Returns the first failure; earlier chunks stay deleted.
    pub async fn batch_delete_item(&self, table: &str, keys: Vec<Key>) -> Result<(), Error> {
        batch::batch_delete_item(self, table, keys).await
    }
}

#[async_trait::async_trait]
impl Connection for Client {
    async fn send<R: Request>(&self, request: &R) -> Result<R::Output, Error> {
        self.conn.send(request).await
    }
}

macro_rules! operations {
    ($($(#[$doc:meta])* $name:ident($input:ty) -> $output:ty;)+) => {
        impl Client {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Returns the [`Error`] the pipeline resolved the call to.
                pub async fn $name(&self, input: $input) -> Result<$output, Error> {
                    self.send(&input).await
                }
            )+
        }
    };
}

operations! {
    /// Create a table.
    create_table(CreateTableInput) -> CreateTableOutput;
    /// Change a table's throughput, indexes or stream settings.
    update_table(UpdateTableInput) -> UpdateTableOutput;
    /// Delete a table.
    delete_table(DeleteTableInput) -> DeleteTableOutput;
    /// Describe a table.
    describe_table(DescribeTableInput) -> DescribeTableOutput;
    /// List one page of table names.
    list_tables(ListTablesInput) -> ListTablesOutput;
    /// Create or replace an item.
    put_item(PutItemInput) -> PutItemOutput;
    /// Read an item by key.
    get_item(GetItemInput) -> GetItemOutput;
    /// Update an item's attributes.
    update_item(UpdateItemInput) -> UpdateItemOutput;
    /// Delete an item by key.
    delete_item(DeleteItemInput) -> DeleteItemOutput;
    /// Read one page of a query.
    query(QueryInput) -> QueryOutput;
    /// Read one page of a scan.
    scan(ScanInput) -> ScanOutput;
    /// Read items by key, following unprocessed keys until all are read.
    batch_get_item(BatchGetItemInput) -> BatchGetItemOutput;
    /// Put and delete items, resubmitting unprocessed writes until all are done.
    batch_write_item(BatchWriteItemInput) -> BatchWriteItemOutput;
}

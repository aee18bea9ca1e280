use std::fmt;
use std::time::Duration;

use reqwest::header;

use crate::{
    decode::decode_result_set,
    types::{AggregatedResult, ResultRow},
    wire::{self, StatementParameters, StatementRequest},
    ClientOptions, Result, SnowbatchError,
};

/// Formats an account identifier into the canonical statements URL.
///
/// Example: `"xy12345"` → `"https://xy12345.snowflakecomputing.com/api/v2/statements"`
pub fn account_to_statements_url(account: &str) -> String {
    format!(
        "https://{}.snowflakecomputing.com/api/v2/statements",
        account.trim()
    )
}

/// Token scheme announced via `X-Snowflake-Authorization-Token-Type`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TokenType {
    OAuth,
    KeyPairJwt,
}

impl TokenType {
    fn header_value(self) -> &'static str {
        match self {
            Self::OAuth => "OAUTH",
            Self::KeyPairJwt => "KEYPAIR_JWT",
        }
    }
}

/// Execution context fields attached to every submission.
#[derive(Clone, Debug, Default)]
struct SessionContext {
    warehouse: Option<String>,
    database: Option<String>,
    schema: Option<String>,
    role: Option<String>,
}

#[derive(Clone)]
/// HTTP client for the Snowflake SQL API statements endpoint.
pub struct SnowbatchClient {
    http: reqwest::Client,
    statements_url: String,
    token: String,
    token_type: Option<TokenType>,
    session: SessionContext,
    options: ClientOptions,
}

impl fmt::Debug for SnowbatchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowbatchClient")
            .field("statements_url", &self.statements_url)
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("session", &self.session)
            .field("options", &self.options)
            .finish()
    }
}

impl SnowbatchClient {
    /// Creates a client from a statements endpoint URL and an OAuth access
    /// token.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added
    /// automatically.
    pub fn new(statements_url: impl Into<String>, token: impl AsRef<str>) -> Self {
        let authorization = normalize_bearer_authorization(token.as_ref());
        Self::with_token_type(statements_url, authorization, Some(TokenType::OAuth))
    }

    /// Creates a client with a full raw authorization value and no token-type
    /// announcement.
    ///
    /// Example: `"Bearer <token>"` or any custom scheme.
    pub fn new_raw_auth(
        statements_url: impl Into<String>,
        authorization: impl Into<String>,
    ) -> Self {
        Self::with_token_type(statements_url, authorization.into(), None)
    }

    /// Creates a client from a pre-signed key-pair JWT.
    ///
    /// Signing the JWT (key fingerprint, issuer, expiry) is the caller's
    /// responsibility; this constructor only attaches it with the
    /// `KEYPAIR_JWT` token type.
    pub fn new_keypair_jwt(statements_url: impl Into<String>, jwt: impl AsRef<str>) -> Self {
        let authorization = normalize_bearer_authorization(jwt.as_ref());
        Self::with_token_type(statements_url, authorization, Some(TokenType::KeyPairJwt))
    }

    /// Creates a client from a **Snowflake account identifier** and an OAuth
    /// access token.
    ///
    /// The statements URL is derived automatically:
    /// `https://<account>.snowflakecomputing.com/api/v2/statements`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use snowbatch::SnowbatchClient;
    ///
    /// let db = SnowbatchClient::for_account("xy12345", "my-token");
    /// ```
    pub fn for_account(account: impl AsRef<str>, token: impl AsRef<str>) -> Self {
        let url = account_to_statements_url(account.as_ref());
        Self::new(url, token)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `SNOWFLAKE_ACCOUNT` — account identifier (e.g. `xy12345`)
    /// - `SNOWFLAKE_OAUTH_ACCESS_TOKEN` — OAuth access token
    ///   (Bearer prefix optional)
    ///
    /// Returns an error if either variable is missing or empty.
    pub fn from_env() -> std::result::Result<Self, String> {
        let account = std::env::var("SNOWFLAKE_ACCOUNT")
            .map_err(|_| "missing SNOWFLAKE_ACCOUNT environment variable".to_owned())?;
        let token = std::env::var("SNOWFLAKE_OAUTH_ACCESS_TOKEN").map_err(|_| {
            "missing SNOWFLAKE_OAUTH_ACCESS_TOKEN environment variable".to_owned()
        })?;
        if account.trim().is_empty() {
            return Err("SNOWFLAKE_ACCOUNT is set but empty".to_owned());
        }
        if token.trim().is_empty() {
            return Err("SNOWFLAKE_OAUTH_ACCESS_TOKEN is set but empty".to_owned());
        }
        Ok(Self::for_account(account, token))
    }

    fn with_token_type(
        statements_url: impl Into<String>,
        authorization: String,
        token_type: Option<TokenType>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            statements_url: statements_url.into(),
            token: authorization,
            token_type,
            session: SessionContext::default(),
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as timeouts.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Sets the warehouse used for submitted batches.
    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.session.warehouse = Some(warehouse.into());
        self
    }

    /// Sets the database used for submitted batches.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.session.database = Some(database.into());
        self
    }

    /// Sets the schema used for submitted batches.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.session.schema = Some(schema.into());
        self
    }

    /// Sets the role used for submitted batches.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.session.role = Some(role.into());
        self
    }

    /// Executes a statement batch that returns no rows the caller needs.
    ///
    /// The batch is submitted exactly once; transient failures are not
    /// retried. Any failure embeds the full statement text so the failing
    /// blob can be diagnosed directly.
    pub async fn execute_batch(&self, statements: &str, statement_count: usize) -> Result<()> {
        self.submit_batch(statements, statement_count)
            .await
            .map(drop)
            .map_err(|source| SnowbatchError::Execution {
                statements: statements.to_owned(),
                source: Box::new(source),
            })
    }

    /// Executes a statement batch and flattens every result set it produces
    /// into one ordered row sequence.
    ///
    /// A multi-statement submission returns one handle per child statement;
    /// each handle owns one result set, fetched and decoded in statement
    /// order. Result sets may carry entirely different column sets; each
    /// row's map holds only its own result set's columns.
    ///
    /// The materialization is all-or-nothing: any failure discards rows
    /// already accumulated and returns the error.
    pub async fn query_batch(
        &self,
        statements: &str,
        statement_count: usize,
    ) -> Result<AggregatedResult> {
        let response = self
            .submit_batch(statements, statement_count)
            .await
            .map_err(|source| wrap_query(statements, source))?;

        let mut rows: Vec<ResultRow> = Vec::new();
        match response.statement_handles.as_deref() {
            Some(handles) if !handles.is_empty() => {
                for (result_set, handle) in handles.iter().enumerate() {
                    let child = self
                        .fetch_statement(handle)
                        .await
                        .map_err(|source| wrap_query(statements, source))?;
                    self.drain_result_set(&child, handle, result_set, &mut rows)
                        .await
                        .map_err(|source| wrap_query(statements, source))?;
                }
            }
            _ => {
                let handle = response.statement_handle.clone().unwrap_or_default();
                self.drain_result_set(&response, &handle, 0, &mut rows)
                    .await
                    .map_err(|source| wrap_query(statements, source))?;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = rows.len(), "materialized batch result");

        Ok(AggregatedResult { rows })
    }

    /// Decodes one statement's result set, fetching any partitions beyond
    /// the first, and appends its rows to `out`.
    async fn drain_result_set(
        &self,
        response: &wire::StatementResponse,
        handle: &str,
        result_set: usize,
        out: &mut Vec<ResultRow>,
    ) -> Result<()> {
        let Some(meta) = response.result_set_meta_data.as_ref() else {
            // A statement without a result payload contributes no rows.
            if response.data.as_ref().is_some_and(|data| !data.is_empty()) {
                return Err(SnowbatchError::Decode(format!(
                    "result set {result_set} carries rows without column metadata"
                )));
            }
            return Ok(());
        };

        let empty = Vec::new();
        let data = response.data.as_ref().unwrap_or(&empty);
        decode_result_set(&meta.row_type, data, result_set, 0, out)?;

        let mut row_offset = data.len();
        for partition in 1..meta.partition_info.len() {
            let page = self.fetch_partition(handle, partition).await?;
            decode_result_set(&meta.row_type, &page.data, result_set, row_offset, out)?;
            row_offset += page.data.len();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(result_set, rows = row_offset, "drained result set");

        Ok(())
    }

    async fn submit_batch(
        &self,
        statements: &str,
        statement_count: usize,
    ) -> Result<wire::StatementResponse> {
        let request = self.build_statement_request(statements, statement_count)?;
        let request_id = uuid::Uuid::new_v4();
        let url = format!("{}?requestId={request_id}", self.statements_url);

        #[cfg(feature = "tracing")]
        tracing::debug!(%request_id, statement_count, "submitting statement batch");

        let response = self
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(SnowbatchError::Transport)?;
        Self::read_response(response).await
    }

    /// Builds the submission payload, annotated with the statement count
    /// that enables multi-statement parsing on the server.
    fn build_statement_request(
        &self,
        statements: &str,
        statement_count: usize,
    ) -> Result<StatementRequest> {
        let count = i32::try_from(statement_count).map_err(|_| {
            SnowbatchError::StatementCount {
                count: statement_count,
            }
        })?;

        Ok(StatementRequest {
            statement: statements.to_owned(),
            timeout: self.options.statement_timeout_secs,
            warehouse: self.session.warehouse.clone(),
            database: self.session.database.clone(),
            schema: self.session.schema.clone(),
            role: self.session.role.clone(),
            parameters: StatementParameters {
                multi_statement_count: count.to_string(),
            },
        })
    }

    async fn fetch_statement(&self, handle: &str) -> Result<wire::StatementResponse> {
        let url = format!("{}/{handle}", self.statements_url);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(SnowbatchError::Transport)?;
        Self::read_response(response).await
    }

    async fn fetch_partition(
        &self,
        handle: &str,
        partition: usize,
    ) -> Result<wire::PartitionResponse> {
        let url = format!("{}/{handle}?partition={partition}", self.statements_url);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(SnowbatchError::Transport)?;
        Self::read_response(response).await
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.decorate(self.http.post(url))
            .header(header::CONTENT_TYPE, "application/json")
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.decorate(self.http.get(url))
    }

    fn decorate(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut builder = builder
            .header(header::AUTHORIZATION, &self.token)
            .header(header::ACCEPT, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms));
        if let Some(token_type) = self.token_type {
            builder = builder.header(
                "X-Snowflake-Authorization-Token-Type",
                token_type.header_value(),
            );
        }
        builder
    }

    async fn read_response<T>(response: reqwest::Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await.map_err(SnowbatchError::Transport)?;

        if !status.is_success() {
            // SQL failures arrive as a JSON error document; anything else
            // surfaces as a plain HTTP error.
            if let Ok(error) = serde_json::from_str::<wire::ErrorBody>(&body) {
                return Err(SnowbatchError::Sql {
                    code: error.code.unwrap_or_default(),
                    message: error.message,
                });
            }
            return Err(SnowbatchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|err| {
            SnowbatchError::Decode(format!(
                "invalid statements API response JSON: {err}; body: {body}"
            ))
        })
    }
}

/// Wraps an engine failure with the statement text, leaving row-decode
/// failures untouched so their taxonomy survives.
fn wrap_query(statements: &str, source: SnowbatchError) -> SnowbatchError {
    match source {
        err @ SnowbatchError::RowDecode { .. } => err,
        source => SnowbatchError::Query {
            statements: statements.to_owned(),
            source: Box::new(source),
        },
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}

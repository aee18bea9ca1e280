//! `snowbatch` is an async HTTP client for the Snowflake SQL API.
//!
//! The crate wraps the `/api/v2/statements` endpoint with ergonomic methods
//! for running semicolon-separated multi-statement batches:
//! - [`SnowbatchClient::execute_batch`] runs a batch and discards row output
//! - [`SnowbatchClient::query_batch`] runs a batch and flattens every result
//!   set it produces into one ordered, JSON-serializable row sequence
//!
//! On top of the batch engine, [`ExecResource`] and [`QuerySource`] model the
//! create/read/update/delete lifecycle of declaratively managed SQL objects.

mod batch;
mod client;
mod decode;
mod error;
mod lifecycle;
mod options;
mod types;
mod value;
mod wire;

pub use batch::{resolve_statement_count, StatementBlock};
pub use client::{account_to_statements_url, SnowbatchClient};
pub use error::SnowbatchError;
pub use lifecycle::{ExecResource, ExecState, QuerySource, QueryState};
pub use options::ClientOptions;
pub use types::{AggregatedResult, ResultRow};
pub use value::Value;

pub type Result<T> = std::result::Result<T, SnowbatchError>;

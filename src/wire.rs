use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct StatementRequest {
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parameters: StatementParameters,
}

/// Session parameters attached to a submission. Values are transmitted as
/// strings, matching the API's parameter encoding.
#[derive(Debug, Serialize)]
pub struct StatementParameters {
    #[serde(rename = "MULTI_STATEMENT_COUNT")]
    pub multi_statement_count: String,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub statement_handle: Option<String>,
    /// One handle per child statement of a multi-statement submission, in
    /// statement order. Absent for single-statement submissions.
    #[serde(default)]
    pub statement_handles: Option<Vec<String>>,
    #[serde(default)]
    pub result_set_meta_data: Option<ResultSetMetaData>,
    /// First partition of the result set. Cells arrive as strings or null.
    #[serde(default)]
    pub data: Option<Vec<Vec<Option<String>>>>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetMetaData {
    #[serde(default)]
    pub num_rows: Option<u64>,
    #[serde(default)]
    pub row_type: Vec<ColumnType>,
    #[serde(default)]
    pub partition_info: Vec<PartitionInfo>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ColumnType {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub scale: Option<i64>,
    #[serde(default)]
    pub precision: Option<i64>,
    #[serde(default)]
    pub nullable: Option<bool>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionInfo {
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub uncompressed_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartitionResponse {
    #[serde(default)]
    pub data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[allow(dead_code)]
    #[serde(default, rename = "sqlState")]
    pub sql_state: Option<String>,
}

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum SnowbatchError {
    /// Network or request execution error from `reqwest`, including an
    /// expired request deadline.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status whose body was not a statements API error
    /// document.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// SQL failure reported by the statements API.
    #[error("sql error {code}: {message}")]
    Sql {
        /// Engine error code, e.g. `002043`.
        code: String,
        /// Error message text from the API.
        message: String,
    },
    /// The resolved statement count cannot be used to request
    /// multi-statement execution.
    #[error("statement count {count} is not supported for multi-statement execution")]
    StatementCount { count: usize },
    /// A non-row-returning batch failed. The full statement text is embedded
    /// so the failing blob can be diagnosed directly.
    #[error("failed to execute statements.\n\nStatements:\n\n  {statements}\n\n{source}")]
    Execution {
        statements: String,
        source: Box<SnowbatchError>,
    },
    /// A row-returning batch failed before or during result-set retrieval.
    /// The full statement text is embedded.
    #[error("failed to query statements.\n\nStatements:\n\n  {statements}\n\n{source}")]
    Query {
        statements: String,
        source: Box<SnowbatchError>,
    },
    /// Column metadata or cell decoding failed inside a result set. Rows
    /// accumulated before the failure are discarded, never returned.
    #[error("failed to decode row {row} of result set {result_set}: {message}")]
    RowDecode {
        /// Zero-based index of the result set within the batch.
        result_set: usize,
        /// Zero-based row index within the result set.
        row: usize,
        message: String,
    },
    /// Statement text for a configured lifecycle stage is empty.
    #[error("{stage} statements cannot be an empty string")]
    EmptyStatements { stage: &'static str },
    /// Response decoding or protocol-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::SnowbatchError;

    #[test]
    fn execution_message_embeds_statement_text() {
        let err = SnowbatchError::Execution {
            statements: "CREATE TABLE t (id INT);\nDROP TABLE t;".to_owned(),
            source: Box::new(SnowbatchError::Sql {
                code: "002003".to_owned(),
                message: "SQL compilation error".to_owned(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("CREATE TABLE t (id INT);\nDROP TABLE t;"));
        assert!(message.contains("SQL compilation error"));
    }

    #[test]
    fn row_decode_message_carries_coordinates() {
        let err = SnowbatchError::RowDecode {
            result_set: 1,
            row: 4,
            message: "bad cell".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode row 4 of result set 1: bad cell"
        );
    }
}

use std::collections::BTreeMap;

use crate::{Result, SnowbatchError, Value};

/// One materialized row: column name mapped to its decoded value.
///
/// Rows are built fresh during materialization and never mutated afterwards.
/// A `BTreeMap` keeps key order deterministic when the row is serialized.
pub type ResultRow = BTreeMap<String, Value>;

/// The ordered concatenation of every row from every result set produced by
/// one batch execution: result-set order first, then row order within each
/// result set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedResult {
    pub rows: Vec<ResultRow>,
}

impl AggregatedResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serializes the rows to a JSON array of objects, one object per row.
    ///
    /// A zero-row result serializes to `[]`. The `null` marker for "no read
    /// stage ran" is the caller's concern; see [`crate::ExecState`].
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.rows).map_err(|err| {
            SnowbatchError::Decode(format!("failed to serialize aggregated result: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{AggregatedResult, ResultRow, Value};

    #[test]
    fn empty_result_serializes_to_empty_array() {
        let result = AggregatedResult::default();
        assert!(result.is_empty());
        assert_eq!(result.to_json().expect("must serialize"), "[]");
    }

    #[test]
    fn rows_serialize_with_sorted_keys() {
        let mut row = ResultRow::new();
        row.insert("b".to_owned(), Value::Integer(2));
        row.insert("a".to_owned(), Value::Text("x".to_owned()));

        let result = AggregatedResult { rows: vec![row] };
        assert_eq!(
            result.to_json().expect("must serialize"),
            r#"[{"a":"x","b":2}]"#
        );
    }

    #[test]
    fn round_trips_through_serde_json() {
        let mut first = ResultRow::new();
        first.insert("n".to_owned(), Value::Null);
        first.insert("i".to_owned(), Value::Integer(-3));
        let mut second = ResultRow::new();
        second.insert("f".to_owned(), Value::Float(0.5));
        second.insert("b".to_owned(), Value::Boolean(true));
        second.insert("t".to_owned(), Value::Text("row".to_owned()));
        second.insert("x".to_owned(), Value::Binary("CAFE".to_owned()));

        let result = AggregatedResult {
            rows: vec![first, second],
        };
        let encoded = result.to_json().expect("must serialize");
        let decoded: serde_json::Value =
            serde_json::from_str(&encoded).expect("must parse back");

        assert_eq!(decoded[0]["n"], serde_json::Value::Null);
        assert_eq!(decoded[0]["i"], serde_json::json!(-3));
        assert_eq!(decoded[1]["f"], serde_json::json!(0.5));
        assert_eq!(decoded[1]["b"], serde_json::json!(true));
        assert_eq!(decoded[1]["t"], serde_json::json!("row"));
        assert_eq!(decoded[1]["x"], serde_json::json!("CAFE"));
    }
}

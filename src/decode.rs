use crate::{types::ResultRow, wire, SnowbatchError, Value};

/// Decodes every row of one result set into name-keyed rows, appending them
/// to `out` in order.
///
/// `row_offset` numbers rows across partitions of the same result set so a
/// decode failure reports the row's position within the whole result set.
pub(crate) fn decode_result_set(
    columns: &[wire::ColumnType],
    data: &[Vec<Option<String>>],
    result_set: usize,
    row_offset: usize,
    out: &mut Vec<ResultRow>,
) -> Result<(), SnowbatchError> {
    for (index, cells) in data.iter().enumerate() {
        let row = row_offset + index;
        if cells.len() != columns.len() {
            return Err(SnowbatchError::RowDecode {
                result_set,
                row,
                message: format!(
                    "row has {} cells but the result set declares {} columns",
                    cells.len(),
                    columns.len()
                ),
            });
        }

        let mut decoded = ResultRow::new();
        for (column, cell) in columns.iter().zip(cells) {
            let value = decode_cell(column, cell.as_deref()).map_err(|message| {
                SnowbatchError::RowDecode {
                    result_set,
                    row,
                    message,
                }
            })?;
            // Duplicate column names are not expected; last write wins.
            decoded.insert(column.name.clone(), value);
        }
        out.push(decoded);
    }

    Ok(())
}

/// Decodes one cell using the column's declared type.
///
/// The statements API serializes every cell as a string (or null); the
/// declared column type decides how the text is interpreted.
pub(crate) fn decode_cell(
    column: &wire::ColumnType,
    cell: Option<&str>,
) -> Result<Value, String> {
    let Some(text) = cell else {
        return Ok(Value::Null);
    };

    match column.column_type.as_str() {
        "fixed" => {
            if column.scale.unwrap_or(0) > 0 {
                return decode_float(column, text);
            }
            match text.parse::<i64>() {
                Ok(value) => Ok(Value::Integer(value)),
                // NUMBER(38,0) values can exceed the i64 range
                Err(_) => decode_float(column, text),
            }
        }
        "real" | "float" | "double" => decode_float(column, text),
        "boolean" => match text {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            other => Err(format!(
                "column '{}': invalid boolean value '{other}'",
                column.name
            )),
        },
        "binary" => Ok(Value::Binary(text.to_owned())),
        // text, date, time, and timestamp variants keep their textual form
        _ => Ok(Value::Text(text.to_owned())),
    }
}

fn decode_float(column: &wire::ColumnType, text: &str) -> Result<Value, String> {
    let parsed = text
        .parse::<f64>()
        .map_err(|err| format!("column '{}': invalid number '{text}': {err}", column.name))?;
    if !parsed.is_finite() {
        return Err(format!(
            "column '{}': non-finite value '{text}' is unsupported",
            column.name
        ));
    }
    Ok(Value::Float(parsed))
}

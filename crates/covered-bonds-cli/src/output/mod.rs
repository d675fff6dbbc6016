pub mod artifact;
pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Result fields that hold one row per record.
pub(crate) const ROW_FIELDS: [&str; 2] = ["records", "fragments"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The record rows of a command result, if it has any.
pub(crate) fn row_field(result: &Value) -> Option<(&str, &[Value])> {
    let map = result.as_object()?;
    ROW_FIELDS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(rows)) => Some((*key, rows.as_slice())),
        _ => None,
    })
}

/// Render a scalar or nested value as a single cell.
pub(crate) fn cell(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object() && !v.is_array()) => arr
            .iter()
            .map(|v| cell(v, null))
            .collect::<Vec<_>>()
            .join(", "),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

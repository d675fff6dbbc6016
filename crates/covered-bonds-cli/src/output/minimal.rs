use serde_json::Value;

use crate::output::cell;

/// Result fields worth a one-line answer, most useful first.
const PRIORITY_KEYS: [&str; 6] = [
    "total_emissions",
    "records_written",
    "fragments_found",
    "total",
    "status",
    "path",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, also inside a
/// nested `summary`, then falls back to the first field of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Array(rows) = result {
        return rows.len().to_string();
    }

    let Value::Object(map) = result else {
        return cell(result, "null");
    };

    let summary = map.get("summary").and_then(Value::as_object);
    for key in PRIORITY_KEYS {
        let found = map.get(key).or_else(|| summary.and_then(|s| s.get(key)));
        if let Some(val) = found.filter(|v| !v.is_null()) {
            return cell(val, "null");
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, cell(val, "null")),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_corpus_envelope_reports_total() {
        let out = json!({
            "result": { "summary": { "total": 462, "green_bonds": 40 }, "records": [] },
            "warnings": []
        });
        assert_eq!(minimal_line(&out), "462");
    }

    #[test]
    fn test_merge_reports_total_emissions() {
        let out = json!({ "result": { "historical_records": 462, "total_emissions": 510 } });
        assert_eq!(minimal_line(&out), "510");
    }

    #[test]
    fn test_feed_reports_status() {
        assert_eq!(minimal_line(&json!({ "status": "success", "data": [] })), "success");
    }

    #[test]
    fn test_listing_reports_row_count() {
        assert_eq!(minimal_line(&json!([{ "a": 1 }, { "a": 2 }])), "2");
    }
}

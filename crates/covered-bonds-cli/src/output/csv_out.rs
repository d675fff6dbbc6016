use serde_json::{Map, Value};
use std::io;

use crate::output::{cell, row_field};

/// Write output as CSV to stdout.
///
/// A result carrying record rows is written as one CSV line per record, so
/// `cbd generate --output csv` yields the corpus itself. Anything else is a
/// two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = match value {
        Value::Object(map) => map.get("result").unwrap_or(value),
        _ => value,
    };

    match body {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        Value::Object(map) => match row_field(body) {
            Some((_, rows)) => write_rows(&mut wtr, rows),
            None => write_fields(&mut wtr, map),
        },
        _ => {
            let _ = wtr.write_record([cell(body, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.clone(), cell(val, "")]);
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([cell(item, "")]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(|v| cell(v, "")).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(rows: &[Value]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(&mut wtr, rows);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_records_become_rows() {
        let rows = vec![
            json!({ "issuer": "Berlin Hyp", "coupon": 1.25, "greenBond": true }),
            json!({ "issuer": "Caffil, SA", "coupon": 3.1, "greenBond": false }),
        ];
        assert_eq!(
            render(&rows),
            "issuer,coupon,greenBond\nBerlin Hyp,1.25,true\n\"Caffil, SA\",3.1,false\n"
        );
    }

    #[test]
    fn test_string_rows_one_per_line() {
        let rows = vec![json!("{a:1}"), json!("{b:2}")];
        assert_eq!(render(&rows), "{a:1}\n{b:2}\n");
    }
}

//! Text assembly of the combined data module.
//!
//! Historical records are rendered from typed data. Legacy fragments and
//! auxiliary blocks are copied byte for byte: nothing here re-validates them,
//! so a malformed legacy record lands in the output exactly as it was read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::legacy::source::AuxiliaryBlock;
use crate::record::EmissionRecord;

const RULE: &str = "// ============================================";
const RECORD_INDENT: &str = "    ";
const FIELD_INDENT: &str = "        ";

/// Banner texts and the primary declaration name of the output module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeLayout {
    pub title: String,
    pub subtitle: String,
    pub primary_heading: String,
    pub legacy_heading: String,
    pub primary_name: String,
}

impl Default for MergeLayout {
    fn default() -> Self {
        Self {
            title: "TRADITIONAL COVERED BONDS DATA".into(),
            subtitle: "Historical Market Data 2010-2026".into(),
            primary_heading: "PRIMARY MARKET - EMISSIONS (2010-2026)".into(),
            legacy_heading: "EMISSIONS 2024-2026 (Current Period)".into(),
            primary_name: "traditionalBondsData".into(),
        }
    }
}

/// Render one record as a JS object literal, from `{` to `}`.
///
/// Fields are written in record order, one per line. Re-extracting the
/// merged module yields exactly this text back for every historical record.
pub fn render_record_literal(record: &EmissionRecord) -> String {
    let fields = [
        ("issuer", js_string(&record.issuer)),
        ("amount", record.amount.to_string()),
        ("currency", js_string(record.currency.code())),
        ("type", js_string(&record.instrument_type)),
        ("issueDate", js_string(&record.issue_date.format("%Y-%m-%d").to_string())),
        ("maturity", js_string(&record.maturity.format("%Y-%m-%d").to_string())),
        ("coupon", js_number(record.coupon)),
        ("spread", record.spread.to_string()),
        ("status", js_string(record.status.as_str())),
        ("rating", js_string(&record.rating)),
        ("greenBond", record.green_bond.to_string()),
        ("country", js_string(&record.country)),
        ("isin", js_string(&record.isin)),
    ];

    let body = fields
        .iter()
        .map(|(k, v)| format!("{FIELD_INDENT}{k}: {v}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{body}\n{RECORD_INDENT}}}")
}

/// Assemble the output module.
pub fn merge(
    historical: &[EmissionRecord],
    legacy_fragments: &[String],
    auxiliary: &[AuxiliaryBlock],
    layout: &MergeLayout,
) -> String {
    let total = historical.len() + legacy_fragments.len();
    let mut out = String::new();

    banner(
        &mut out,
        "",
        &[
            layout.title.as_str(),
            layout.subtitle.as_str(),
            &format!("Total: {total} emissions"),
        ],
    );
    out.push('\n');
    banner(&mut out, "", &[layout.primary_heading.as_str()]);
    let _ = writeln!(out, "const {} = [", layout.primary_name);

    for record in historical {
        let _ = writeln!(out, "{RECORD_INDENT}{},", render_record_literal(record));
    }

    out.push('\n');
    banner(&mut out, RECORD_INDENT, &[layout.legacy_heading.as_str()]);

    for (i, fragment) in legacy_fragments.iter().enumerate() {
        out.push_str(RECORD_INDENT);
        out.push_str(fragment.trim());
        if i + 1 < legacy_fragments.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("];\n\n");

    for (i, block) in auxiliary.iter().enumerate() {
        banner(&mut out, "", &[block.heading.as_str()]);
        out.push_str(block.text.as_deref().unwrap_or(""));
        out.push('\n');
        if i + 1 < auxiliary.len() {
            out.push('\n');
        }
    }

    out
}

fn banner(out: &mut String, indent: &str, lines: &[&str]) {
    let _ = writeln!(out, "{indent}{RULE}");
    for line in lines {
        let _ = writeln!(out, "{indent}// {line}");
    }
    let _ = writeln!(out, "{indent}{RULE}");
}

/// Double-quoted JS string literal.
fn js_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for ch in s.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Shortest decimal form, always with a fractional part (`4.0`, `3.125`).
fn js_number(value: Decimal) -> String {
    let n = value.normalize();
    if n.scale() == 0 {
        format!("{n}.0")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EmissionStatus;
    use crate::types::Currency;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample() -> EmissionRecord {
        EmissionRecord {
            issuer: "Berlin Hyp".into(),
            amount: 500,
            currency: Currency::EUR,
            instrument_type: "Green Mortgage Pfandbrief".into(),
            issue_date: NaiveDate::from_ymd_opt(2019, 4, 9).unwrap(),
            maturity: NaiveDate::from_ymd_opt(2026, 4, 7).unwrap(),
            coupon: dec!(1.250),
            spread: 44,
            status: EmissionStatus::Active,
            rating: "Aa1/AA+".into(),
            green_bond: true,
            country: "Germany".into(),
            isin: "DE4821190007".into(),
        }
    }

    #[test]
    fn test_record_literal_layout() {
        let expected = r#"{
        issuer: "Berlin Hyp",
        amount: 500,
        currency: "EUR",
        type: "Green Mortgage Pfandbrief",
        issueDate: "2019-04-09",
        maturity: "2026-04-07",
        coupon: 1.25,
        spread: 44,
        status: "Active",
        rating: "Aa1/AA+",
        greenBond: true,
        country: "Germany",
        isin: "DE4821190007"
    }"#;
        assert_eq!(render_record_literal(&sample()), expected);
    }

    #[test]
    fn test_js_number_forms() {
        assert_eq!(js_number(dec!(4)), "4.0");
        assert_eq!(js_number(dec!(3.100)), "3.1");
        assert_eq!(js_number(dec!(0.875)), "0.875");
    }

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string(r#"Say "hi""#), r#""Say \"hi\"""#);
        assert_eq!(js_string("Crédit Foncier"), "\"Crédit Foncier\"");
    }

    #[test]
    fn test_merge_layout() {
        let aux = vec![
            AuxiliaryBlock {
                heading: "SECONDARY MARKET DATA".into(),
                text: Some("const traditionalSecondaryMarket = {};".into()),
            },
            AuxiliaryBlock {
                heading: "NEWS DATA".into(),
                text: None,
            },
        ];
        let legacy = vec!["{ issuer: \"A\" }".to_string(), "{ issuer: \"B\" }".to_string()];
        let out = merge(&[sample()], &legacy, &aux, &MergeLayout::default());

        assert!(out.starts_with(
            "// ============================================\n// TRADITIONAL COVERED BONDS DATA\n"
        ));
        assert!(out.contains("// Total: 3 emissions\n"));
        assert!(out.contains("const traditionalBondsData = [\n    {\n        issuer: \"Berlin Hyp\","));
        assert!(out.contains("    },\n\n    // ============================================\n    // EMISSIONS 2024-2026 (Current Period)\n"));
        assert!(out.contains("    { issuer: \"A\" },\n    { issuer: \"B\" }\n];\n\n"));
        assert!(out.contains(
            "// SECONDARY MARKET DATA\n// ============================================\nconst traditionalSecondaryMarket = {};\n\n"
        ));
        assert!(out.ends_with("// NEWS DATA\n// ============================================\n\n"));
    }

    #[test]
    fn test_merge_without_legacy_keeps_trailing_comma() {
        let out = merge(&[sample()], &[], &[], &MergeLayout::default());
        assert!(out.contains("    },\n\n    // ===="));
        assert!(out.ends_with("];\n\n"));
    }

    #[test]
    fn test_malformed_legacy_fragment_passes_through() {
        // Known limitation: no validation of legacy content
        let legacy = vec!["{ issuer: \"Broken\", amount: }".to_string()];
        let out = merge(&[], &legacy, &[], &MergeLayout::default());
        assert!(out.contains("    { issuer: \"Broken\", amount: }\n];"));
    }
}

//! Best-effort extraction of record literals from a hand-written JS data module.
//!
//! This is a text heuristic, not a JavaScript parser. A block is found by
//! searching for `const <name> = [` and the first `];` after it, and records
//! inside it are split by counting curly braces. Two inputs defeat it:
//!
//! - a `{` or `}` inside a string literal or comment within a record shifts
//!   the depth count and splits or merges records wrongly;
//! - a `];` (or `};` for object blocks) inside a string or comment ends the
//!   block early.
//!
//! Neither is detected. The data files this reads are generated or reviewed by
//! hand and contain neither; anything else should go through a real parser
//! behind [`FragmentExtractor`].

use serde::{Deserialize, Serialize};

/// Delimiters of a top-level `const` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// `const name = [ ... ];`
    Array,
    /// `const name = { ... };`
    Object,
}

impl BlockKind {
    fn open(&self) -> char {
        match self {
            BlockKind::Array => '[',
            BlockKind::Object => '{',
        }
    }

    fn close(&self) -> &'static str {
        match self {
            BlockKind::Array => "];",
            BlockKind::Object => "};",
        }
    }
}

/// A named top-level declaration to look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDeclaration {
    pub name: String,
    pub kind: BlockKind,
}

impl BlockDeclaration {
    pub fn array(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: BlockKind::Array,
        }
    }

    pub fn object(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: BlockKind::Object,
        }
    }

    /// The text that opens the declaration, e.g. `const traditionalNews = [`.
    pub fn opening(&self) -> String {
        format!("const {} = {}", self.name, self.kind.open())
    }
}

/// A located declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMatch<'a> {
    /// From `const` through the closing `];` / `};`, inclusive.
    pub full: &'a str,
    /// Between the opening bracket and the closing delimiter, exclusive.
    pub body: &'a str,
}

/// Find `block` in `text`: the first opening followed by the nearest closing
/// delimiter, across line breaks.
pub fn locate_block<'a>(text: &'a str, block: &BlockDeclaration) -> Option<BlockMatch<'a>> {
    let opening = block.opening();
    let start = text.find(&opening)?;
    let body_start = start + opening.len();
    let body_len = text[body_start..].find(block.kind.close())?;
    let body_end = body_start + body_len;
    let full_end = body_end + block.kind.close().len();
    Some(BlockMatch {
        full: &text[start..full_end],
        body: &text[body_start..body_end],
    })
}

/// Split a block body into `{ ... }` fragments by brace depth.
///
/// A fragment opens on a `{` at depth zero and closes on the `}` that returns
/// the depth to zero; both braces are kept and nested objects stay inside
/// their parent. Text between fragments is discarded. A `}` at depth zero is
/// ignored, and an unclosed trailing fragment is dropped with a warning.
pub fn split_fragments(body: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;

    for (i, ch) in body.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        fragments.push(body[s..=i].trim().to_string());
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        tracing::warn!(
            offset = s,
            depth,
            "unterminated record literal at end of block; dropping it"
        );
    }

    fragments
}

/// Turns a data-module text into record fragments for one named block.
pub trait FragmentExtractor {
    fn extract_fragments(&self, text: &str, block: &BlockDeclaration) -> Vec<String>;
}

/// The brace-depth heuristic described at module level.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceCountingExtractor;

impl FragmentExtractor for BraceCountingExtractor {
    fn extract_fragments(&self, text: &str, block: &BlockDeclaration) -> Vec<String> {
        match locate_block(text, block) {
            Some(m) => split_fragments(m.body),
            None => {
                tracing::warn!(
                    block = %block.name,
                    "declaration not found in legacy source; continuing without its records"
                );
                Vec::new()
            }
        }
    }
}

/// Record fragments of the array declared as `const <marker> = [ ... ];`.
pub fn extract(source: &str, marker: &str) -> Vec<String> {
    BraceCountingExtractor.extract_fragments(source, &BlockDeclaration::array(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"// header
const traditionalBondsData = [
    // GERMANY - PFANDBRIEFE
    {
        issuer: "Deutsche Pfandbriefbank",
        amount: 500,
        tags: { tier: 1 }
    },
    {
        issuer: "Berlin Hyp",
        amount: 300
    }
];

const traditionalSecondaryMarket = {
    spreads: { germany: 45 }
};

const traditionalNews = [
    { title: "Pfandbrief supply record" }
];
"#;

    #[test]
    fn test_locate_array_block() {
        let m = locate_block(SOURCE, &BlockDeclaration::array("traditionalNews")).unwrap();
        assert!(m.full.starts_with("const traditionalNews = ["));
        assert!(m.full.ends_with("];"));
        assert_eq!(m.body.trim(), r#"{ title: "Pfandbrief supply record" }"#);
    }

    #[test]
    fn test_locate_object_block_stops_at_first_close() {
        let m = locate_block(SOURCE, &BlockDeclaration::object("traditionalSecondaryMarket")).unwrap();
        assert_eq!(
            m.full,
            "const traditionalSecondaryMarket = {\n    spreads: { germany: 45 }\n};"
        );
    }

    #[test]
    fn test_extract_splits_top_level_records() {
        let fragments = extract(SOURCE, "traditionalBondsData");
        assert_eq!(fragments.len(), 2);
        assert_eq!(
            fragments[0],
            "{\n        issuer: \"Deutsche Pfandbriefbank\",\n        amount: 500,\n        tags: { tier: 1 }\n    }"
        );
        assert!(fragments[1].contains("Berlin Hyp"));
        // Comments between records are not part of any fragment
        assert!(fragments.iter().all(|f| !f.contains("GERMANY")));
    }

    #[test]
    fn test_missing_marker_yields_empty() {
        assert!(extract(SOURCE, "digitalBondsData").is_empty());
        assert!(extract("", "traditionalBondsData").is_empty());
    }

    #[test]
    fn test_unclosed_block_yields_empty() {
        let text = "const traditionalBondsData = [\n    { issuer: \"x\" },\n";
        assert!(extract(text, "traditionalBondsData").is_empty());
    }

    #[test]
    fn test_stray_closing_brace_ignored() {
        assert_eq!(split_fragments("} { a: 1 } }"), vec!["{ a: 1 }".to_string()]);
    }

    #[test]
    fn test_unterminated_fragment_dropped() {
        assert_eq!(
            split_fragments("{ a: 1 }, { b: 2"),
            vec!["{ a: 1 }".to_string()]
        );
    }

    #[test]
    fn test_brace_inside_string_is_a_known_limitation() {
        // Balanced braces inside a string happen to survive; an unbalanced one
        // swallows every record after it
        let body = r#"{ notes: "tap of {2024} line" }, { issuer: "x" }"#;
        let fragments = split_fragments(body);
        assert_eq!(fragments.len(), 2);
        let unbalanced = r#"{ notes: "open { only" }, { issuer: "x" }"#;
        assert_eq!(split_fragments(unbalanced).len(), 0);
    }

    #[test]
    fn test_multibyte_text_is_sliced_on_char_boundaries() {
        let body = "{ issuer: \"Crédit Foncier\" }, { issuer: \"Münchener\" }";
        let fragments = split_fragments(body);
        assert_eq!(fragments[1], "{ issuer: \"Münchener\" }");
    }
}

use serde::{Deserialize, Serialize};

use crate::legacy::extract::{locate_block, BlockDeclaration, FragmentExtractor};

/// Declaration names in the dashboard's data module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyBlockNames {
    pub primary: String,
    pub secondary_market: String,
    pub news: String,
}

impl Default for LegacyBlockNames {
    fn default() -> Self {
        Self {
            primary: "traditionalBondsData".into(),
            secondary_market: "traditionalSecondaryMarket".into(),
            news: "traditionalNews".into(),
        }
    }
}

/// A declaration copied through the merge untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryBlock {
    /// Banner text written above the block.
    pub heading: String,
    /// The whole `const ... ;` declaration, or `None` when the source lacked it.
    pub text: Option<String>,
}

/// What the merge keeps from an existing data module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySource {
    pub primary_fragments: Vec<String>,
    pub auxiliary: Vec<AuxiliaryBlock>,
}

impl LegacySource {
    /// Pull the primary records and the secondary-market and news blocks out
    /// of `text`. Missing declarations are logged and left empty.
    pub fn parse(text: &str, names: &LegacyBlockNames, extractor: &dyn FragmentExtractor) -> Self {
        let primary_fragments =
            extractor.extract_fragments(text, &BlockDeclaration::array(&names.primary));

        let auxiliary = vec![
            passthrough(
                text,
                &BlockDeclaration::object(&names.secondary_market),
                "SECONDARY MARKET DATA",
            ),
            passthrough(text, &BlockDeclaration::array(&names.news), "NEWS DATA"),
        ];

        tracing::info!(
            records = primary_fragments.len(),
            auxiliary_found = auxiliary.iter().filter(|a| a.text.is_some()).count(),
            "parsed legacy data module"
        );

        Self {
            primary_fragments,
            auxiliary,
        }
    }

    pub fn empty() -> Self {
        Self {
            primary_fragments: Vec::new(),
            auxiliary: Vec::new(),
        }
    }
}

fn passthrough(text: &str, block: &BlockDeclaration, heading: &str) -> AuxiliaryBlock {
    let found = locate_block(text, block).map(|m| m.full.to_string());
    if found.is_none() {
        tracing::warn!(block = %block.name, "auxiliary declaration not found; emitting it empty");
    }
    AuxiliaryBlock {
        heading: heading.to_string(),
        text: found,
    }
}

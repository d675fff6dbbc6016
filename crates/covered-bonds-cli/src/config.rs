//! Pipeline configuration file.
//!
//! Every field is optional; anything left out keeps the historical
//! generator's value. Command-line flags override the file.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

use covered_bonds_core::legacy::{LegacyBlockNames, MergeLayout};
use covered_bonds_core::reference::{IssuerCatalog, PeriodTable};
use covered_bonds_core::synthesis::{AmountMenus, CorpusConfig};

use crate::input;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub seed: Option<u64>,
    pub now: Option<NaiveDate>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub emissions_per_year: Option<BTreeMap<i32, u32>>,
    pub country_weights: Option<BTreeMap<String, f64>>,
    pub periods: Option<PeriodTable>,
    pub amount_menus: Option<AmountMenus>,
    pub catalog: Option<IssuerCatalog>,
    pub layout: Option<MergeLayout>,
    pub legacy_blocks: Option<LegacyBlockNames>,
}

/// Everything a corpus run needs, resolved.
pub struct ResolvedPipeline {
    pub corpus: CorpusConfig,
    pub periods: PeriodTable,
    pub amounts: AmountMenus,
    pub catalog: IssuerCatalog,
    pub layout: MergeLayout,
    pub legacy_blocks: LegacyBlockNames,
}

impl PipelineConfig {
    /// Load from `--config`, else from piped stdin, else defaults.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = path {
            return input::file::read_config(path);
        }
        Ok(input::stdin::read_stdin_config()?.unwrap_or_default())
    }

    pub fn resolve(self, seed: Option<u64>, now: Option<NaiveDate>) -> ResolvedPipeline {
        let base = CorpusConfig::historical();
        let corpus = CorpusConfig {
            seed: seed.or(self.seed),
            now: now.or(self.now).unwrap_or(base.now),
            start_year: self.start_year.unwrap_or(base.start_year),
            end_year: self.end_year.unwrap_or(base.end_year),
            emissions_per_year: self.emissions_per_year.unwrap_or(base.emissions_per_year),
            country_weights: self.country_weights.unwrap_or(base.country_weights),
        };
        ResolvedPipeline {
            corpus,
            periods: self.periods.unwrap_or_default(),
            amounts: self.amount_menus.unwrap_or_default(),
            catalog: self.catalog.unwrap_or_else(IssuerCatalog::historical),
            layout: self.layout.unwrap_or_default(),
            legacy_blocks: self.legacy_blocks.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covered_bonds_core::Currency;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_is_historical_run() {
        let resolved = PipelineConfig::default().resolve(None, None);
        assert_eq!(resolved.corpus.expected_count(), 462);
        assert_eq!(resolved.corpus.now, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
        assert_eq!(resolved.periods, PeriodTable::historical());
        assert_eq!(resolved.layout, MergeLayout::default());
    }

    #[test]
    fn test_flags_override_file() {
        let cfg: PipelineConfig = serde_yaml::from_str("seed: 1\nnow: 2025-06-30\n").unwrap();
        let resolved = cfg.resolve(Some(9), None);
        assert_eq!(resolved.corpus.seed, Some(9));
        assert_eq!(resolved.corpus.now, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
start_year: 2020
end_year: 2021
emissions_per_year: { 2020: 3, 2021: 4 }
country_weights: { Germany: 2.0, Sweden: 1.0 }
amount_menus:
  EUR: [500]
  SEK: [3000]
layout:
  title: COVERED BONDS
"#;
        let resolved = serde_yaml::from_str::<PipelineConfig>(yaml)
            .unwrap()
            .resolve(None, None);
        assert_eq!(resolved.corpus.expected_count(), 7);
        assert_eq!(resolved.corpus.country_weights.len(), 2);
        assert_eq!(resolved.amounts.for_currency(Currency::SEK), &[3000]);
        assert_eq!(resolved.layout.title, "COVERED BONDS");
        assert_eq!(resolved.layout.primary_name, "traditionalBondsData");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(serde_yaml::from_str::<PipelineConfig>("seeds: 3\n").is_err());
    }
}

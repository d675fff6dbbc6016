//! Year-by-year generation of the historical issuance corpus.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::CoveredBondsError;
use crate::record::EmissionRecord;
use crate::reference::{CountryProfile, IssuerCatalog, PeriodTable};
use crate::synthesis::emission::{AmountMenus, EmissionSynthesizer};
use crate::synthesis::sampler::DiscreteSampler;
use crate::types::{with_metadata, ComputationOutput};
use crate::CoveredBondsResult;

/// Issue days are drawn from 1..=28 so every month yields a valid date.
const MAX_ISSUE_DAY: u32 = 28;

/// Parameters of a corpus run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Reference date for status derivation.
    #[serde(default = "default_now")]
    pub now: NaiveDate,
    pub start_year: i32,
    pub end_year: i32,
    /// Number of issues per calendar year. Years in range without an entry
    /// produce no issues.
    pub emissions_per_year: BTreeMap<i32, u32>,
    /// Relative country weights; normalized before sampling.
    pub country_weights: BTreeMap<String, f64>,
}

pub fn default_now() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 12).unwrap_or(NaiveDate::MIN)
}

impl CorpusConfig {
    /// The 2010-2023 run: 20 issues in 2010 rising by two a year, Germany and
    /// France dominating supply.
    pub fn historical() -> Self {
        let emissions_per_year = (2010..=2023).map(|y| (y, 20 + 2 * (y - 2010) as u32)).collect();
        let country_weights = [
            ("Germany", 0.35),
            ("France", 0.25),
            ("Sweden", 0.10),
            ("Denmark", 0.05),
            ("Netherlands", 0.08),
            ("Spain", 0.05),
            ("Norway", 0.03),
            ("Canada", 0.04),
            ("UK", 0.03),
            ("Italy", 0.01),
            ("Austria", 0.005),
            ("Belgium", 0.005),
            ("Portugal", 0.005),
        ]
        .into_iter()
        .map(|(c, w)| (c.to_string(), w))
        .collect();

        Self {
            seed: None,
            now: default_now(),
            start_year: 2010,
            end_year: 2023,
            emissions_per_year,
            country_weights,
        }
    }

    pub fn expected_count(&self) -> u64 {
        (self.start_year..=self.end_year)
            .map(|y| u64::from(self.emissions_per_year.get(&y).copied().unwrap_or(0)))
            .sum()
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self::historical()
    }
}

/// Aggregate view of a generated corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total: usize,
    pub green_bonds: usize,
    /// Share of green bonds, in percent.
    pub green_share_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_issue: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_issue: Option<NaiveDate>,
    pub by_year: BTreeMap<i32, usize>,
    pub by_country: BTreeMap<String, usize>,
}

impl CorpusSummary {
    pub fn from_records(records: &[EmissionRecord]) -> Self {
        let total = records.len();
        let green_bonds = records.iter().filter(|r| r.green_bond).count();
        let green_share_pct = if total > 0 {
            green_bonds as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let mut by_year = BTreeMap::new();
        let mut by_country = BTreeMap::new();
        for r in records {
            *by_year.entry(r.issue_date.year()).or_insert(0) += 1;
            *by_country.entry(r.country.clone()).or_insert(0) += 1;
        }
        Self {
            total,
            green_bonds,
            green_share_pct,
            first_issue: records.iter().map(|r| r.issue_date).min(),
            last_issue: records.iter().map(|r| r.issue_date).max(),
            by_year,
            by_country,
        }
    }
}

/// Output of a corpus run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub summary: CorpusSummary,
    pub records: Vec<EmissionRecord>,
}

/// Generate every record of `config` into `rng`.
///
/// Years run in ascending order; each issue draws its country by weight, an
/// issuer uniformly within that country, and a day of the year, then takes the
/// next global index. Order within a year follows the draws, so callers that
/// need a date ordering must sort.
pub fn generate_records<R: Rng + ?Sized>(
    rng: &mut R,
    config: &CorpusConfig,
    catalog: &IssuerCatalog,
    periods: &PeriodTable,
    amounts: &AmountMenus,
) -> CoveredBondsResult<Vec<EmissionRecord>> {
    if config.start_year > config.end_year {
        return Err(CoveredBondsError::InvalidInput {
            field: "start_year".into(),
            reason: format!(
                "start_year {} is after end_year {}",
                config.start_year, config.end_year
            ),
        });
    }

    let mut weighted: Vec<(&CountryProfile, f64)> = Vec::with_capacity(config.country_weights.len());
    for (name, &weight) in &config.country_weights {
        weighted.push((catalog.country(name)?, weight));
    }
    let sampler = DiscreteSampler::new(weighted)?;
    let synthesizer = EmissionSynthesizer::new(periods, amounts);

    let mut records = Vec::with_capacity(config.expected_count() as usize);
    let mut index: u32 = 0;

    for year in config.start_year..=config.end_year {
        let count = config.emissions_per_year.get(&year).copied().unwrap_or(0);
        tracing::debug!(year, count, "generating year");

        for _ in 0..count {
            let country = *sampler.sample(rng);
            let issuer = country.issuers.choose(rng).ok_or_else(|| {
                CoveredBondsError::EmptyCatalog(format!("country {} has no issuers", country.name))
            })?;

            let month = rng.gen_range(1..=12);
            let day = rng.gen_range(1..=MAX_ISSUE_DAY);
            let issue_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                CoveredBondsError::DateError(format!("{year}-{month:02}-{day:02} is not a valid date"))
            })?;

            records.push(synthesizer.synthesize(rng, country, issuer, issue_date, index, config.now)?);
            index += 1;
        }
    }

    Ok(records)
}

/// Run a full corpus generation with its own seeded RNG.
pub fn generate_corpus(
    config: &CorpusConfig,
    catalog: &IssuerCatalog,
    periods: &PeriodTable,
    amounts: &AmountMenus,
) -> CoveredBondsResult<ComputationOutput<Corpus>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let missing: Vec<String> = (config.start_year..=config.end_year)
        .filter(|y| !config.emissions_per_year.contains_key(y))
        .map(|y| y.to_string())
        .collect();
    if !missing.is_empty() {
        warnings.push(format!(
            "No emission count configured for {}; those years produce no issues",
            missing.join(", ")
        ));
    }
    let outside: Vec<String> = config
        .emissions_per_year
        .keys()
        .filter(|y| **y < config.start_year || **y > config.end_year)
        .map(|y| y.to_string())
        .collect();
    if !outside.is_empty() {
        warnings.push(format!(
            "Emission counts for {} fall outside {}-{} and are ignored",
            outside.join(", "),
            config.start_year,
            config.end_year
        ));
    }
    if config.start_year < periods.first_year() || config.end_year > periods.last_year() {
        warnings.push(format!(
            "Years outside {}-{} reuse the nearest era's parameters",
            periods.first_year(),
            periods.last_year()
        ));
    }

    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let records = generate_records(&mut rng, config, catalog, periods, amounts)?;
    let summary = CorpusSummary::from_records(&records);

    tracing::info!(
        total = summary.total,
        green = summary.green_bonds,
        first = ?summary.first_issue,
        last = ?summary.last_issue,
        "generated historical corpus"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Synthetic covered bond issuance (era-bucketed parameters, weighted country draw)",
        &serde_json::json!({
            "start_year": config.start_year,
            "end_year": config.end_year,
            "now": config.now,
            "countries": config.country_weights.len(),
            "day_count": "365-day years, leap days ignored",
        }),
        warnings,
        elapsed,
        config.seed,
        Corpus { summary, records },
    ))
}

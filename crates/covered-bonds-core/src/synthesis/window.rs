//! Flat-window generator: a fixed number of issues spread uniformly over a
//! date range, newest first.
//!
//! Unlike the historical corpus there is no era table here. Coupons sit on a
//! three-level base rate, every currency shares one size menu, and the green
//! flag leaves the instrument label alone.

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CoveredBondsError;
use crate::record::{maturity_from, sort_by_issue_date, EmissionRecord, EmissionStatus, SortOrder};
use crate::reference::IssuerCatalog;
use crate::synthesis::corpus::{default_now, Corpus, CorpusSummary};
use crate::synthesis::emission::{sample_rate, COUPON_DP};
use crate::types::{with_metadata, Amount, ComputationOutput, Rate};
use crate::CoveredBondsResult;

const WINDOW_AMOUNTS: [Amount; 6] = [500, 750, 1000, 1250, 1500, 2000];
const HEX_DIGITS: &[u8] = b"0123456789ABCDEF";
const ISIN_RANDOM_LEN: usize = 10;

/// Parameters of a window run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_now")]
    pub now: NaiveDate,
    /// First possible issue date (inclusive).
    pub start: NaiveDate,
    /// Last possible issue date (inclusive).
    pub end: NaiveDate,
    pub count: u32,
    /// Chance that an issue with a plain label is still flagged green.
    #[serde(default = "default_green_probability")]
    pub green_probability: f64,
}

fn default_green_probability() -> f64 {
    0.15
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            seed: None,
            now: default_now(),
            start: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or(NaiveDate::MIN),
            count: 480,
            green_probability: default_green_probability(),
        }
    }
}

/// Base coupon for an issue year before the random add-on.
pub fn base_rate(year: i32) -> Rate {
    if year <= 2021 {
        dec!(0.1)
    } else if year == 2022 {
        dec!(2.5)
    } else {
        dec!(3.5)
    }
}

/// Spread range for an issue year; issues from 2023 price 15bp wider.
pub fn spread_bounds(year: i32) -> (u32, u32) {
    if year >= 2023 {
        (30, 80)
    } else {
        (15, 65)
    }
}

/// `{first two letters of the country, upper-cased}{10 hex chars}`.
pub fn window_isin<R: Rng + ?Sized>(rng: &mut R, country: &str) -> String {
    let prefix: String = country.chars().take(2).flat_map(char::to_uppercase).collect();
    let suffix: String = (0..ISIN_RANDOM_LEN)
        .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
        .collect();
    format!("{prefix}{suffix}")
}

pub fn generate_window_records<R: Rng + ?Sized>(
    rng: &mut R,
    config: &WindowConfig,
    catalog: &IssuerCatalog,
) -> CoveredBondsResult<Vec<EmissionRecord>> {
    if config.start > config.end {
        return Err(CoveredBondsError::InvalidInput {
            field: "start".into(),
            reason: format!("window start {} is after end {}", config.start, config.end),
        });
    }
    if !(0.0..=1.0).contains(&config.green_probability) {
        return Err(CoveredBondsError::InvalidInput {
            field: "green_probability".into(),
            reason: format!("{} is outside [0, 1]", config.green_probability),
        });
    }

    let issuers: Vec<_> = catalog.issuers().collect();
    if issuers.is_empty() {
        return Err(CoveredBondsError::EmptyCatalog("the window catalog lists no issuers".into()));
    }
    let span_days = (config.end - config.start).num_days();

    let mut records = Vec::with_capacity(config.count as usize);
    for _ in 0..config.count {
        let (country, issuer) = *issuers.choose(rng).ok_or_else(|| {
            CoveredBondsError::EmptyCatalog("the window catalog lists no issuers".into())
        })?;

        let issue_date = config.start + Duration::days(rng.gen_range(0..=span_days));
        let maturity = maturity_from(issue_date, rng.gen_range(3..=10));
        let year = issue_date.year();

        let coupon = base_rate(year) + sample_rate(rng, Decimal::ZERO, dec!(1.5), COUPON_DP)?;
        let coupon = coupon.round_dp(COUPON_DP);

        let amount = *WINDOW_AMOUNTS.choose(rng).unwrap_or(&WINDOW_AMOUNTS[0]);
        let (spread_lo, spread_hi) = spread_bounds(year);
        let spread = rng.gen_range(spread_lo..=spread_hi);

        let status = EmissionStatus::derive(issue_date, maturity, config.now);
        let green_bond =
            issuer.instrument_type.contains("Green") || rng.gen::<f64>() < config.green_probability;

        records.push(EmissionRecord {
            issuer: issuer.name.clone(),
            amount,
            currency: country.currency,
            instrument_type: issuer.instrument_type.clone(),
            issue_date,
            maturity,
            coupon,
            spread,
            status,
            rating: issuer.rating.clone(),
            green_bond,
            country: country.name.clone(),
            isin: window_isin(rng, &country.name),
        });
    }

    sort_by_issue_date(&mut records, SortOrder::Descending);
    Ok(records)
}

/// Run a window generation with its own seeded RNG.
pub fn generate_window(
    config: &WindowConfig,
    catalog: &IssuerCatalog,
) -> CoveredBondsResult<ComputationOutput<Corpus>> {
    let start = Instant::now();
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let records = generate_window_records(&mut rng, config, catalog)?;
    let summary = CorpusSummary::from_records(&records);
    tracing::info!(total = summary.total, green = summary.green_bonds, "generated window data set");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Synthetic covered bond issuance (uniform date window, base-rate coupons)",
        &serde_json::json!({
            "start": config.start,
            "end": config.end,
            "count": config.count,
            "now": config.now,
            "green_probability": config.green_probability,
        }),
        Vec::new(),
        elapsed,
        config.seed,
        Corpus { summary, records },
    ))
}

//! Synthesis of a single issuance record.

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoveredBondsError;
use crate::record::{maturity_from, EmissionRecord, EmissionStatus};
use crate::reference::{CountryProfile, Issuer, PeriodTable};
use crate::types::{Amount, Currency, Rate};
use crate::CoveredBondsResult;

/// Tenors, in years, a historical issue may carry.
pub const MATURITY_CHOICES: [u32; 4] = [3, 5, 7, 10];

/// Decimal places kept on synthesized coupons.
pub const COUPON_DP: u32 = 3;

const GREEN: &str = "Green";

/// Issue sizes by currency, in millions.
///
/// A currency without a menu of its own draws from the EUR menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Currency, Vec<Amount>>",
    into = "BTreeMap<Currency, Vec<Amount>>"
)]
pub struct AmountMenus {
    menus: BTreeMap<Currency, Vec<Amount>>,
}

impl AmountMenus {
    pub fn new(menus: BTreeMap<Currency, Vec<Amount>>) -> CoveredBondsResult<Self> {
        match menus.get(&Currency::EUR) {
            Some(eur) if !eur.is_empty() => {}
            _ => {
                return Err(CoveredBondsError::InvalidInput {
                    field: "amount_menus.EUR".into(),
                    reason: "A non-empty EUR menu is required as the fallback".into(),
                })
            }
        }
        if let Some((currency, _)) = menus.iter().find(|(_, m)| m.is_empty()) {
            return Err(CoveredBondsError::InvalidInput {
                field: format!("amount_menus.{currency}"),
                reason: "Menu must list at least one amount".into(),
            });
        }
        Ok(Self { menus })
    }

    pub fn historical() -> Self {
        let menus = BTreeMap::from([
            (Currency::SEK, vec![2000, 3000, 4000, 5000, 6000]),
            (Currency::DKK, vec![1500, 2000, 2500, 3000, 3500]),
            (Currency::NOK, vec![1000, 1500, 2000, 2500]),
            (Currency::GBP, vec![300, 500, 750, 1000]),
            (Currency::EUR, vec![250, 500, 750, 1000, 1250, 1500, 2000]),
        ]);
        Self { menus }
    }

    pub fn for_currency(&self, currency: Currency) -> &[Amount] {
        self.menus
            .get(&currency)
            .or_else(|| self.menus.get(&Currency::EUR))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for AmountMenus {
    fn default() -> Self {
        Self::historical()
    }
}

impl TryFrom<BTreeMap<Currency, Vec<Amount>>> for AmountMenus {
    type Error = CoveredBondsError;

    fn try_from(menus: BTreeMap<Currency, Vec<Amount>>) -> Result<Self, Self::Error> {
        Self::new(menus)
    }
}

impl From<AmountMenus> for BTreeMap<Currency, Vec<Amount>> {
    fn from(menus: AmountMenus) -> Self {
        menus.menus
    }
}

/// Draw a value uniformly from `[min, max]` and round it to `dp` places.
pub(crate) fn sample_rate<R: Rng + ?Sized>(
    rng: &mut R,
    min: Rate,
    max: Rate,
    dp: u32,
) -> CoveredBondsResult<Rate> {
    let (lo, hi) = match (min.to_f64(), max.to_f64()) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => {
            return Err(CoveredBondsError::InvalidInput {
                field: "coupon_range".into(),
                reason: format!("[{min}, {max}] is not representable as f64"),
            })
        }
    };
    let draw = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
    Decimal::from_f64(draw)
        .map(|d| d.round_dp(dp))
        .ok_or_else(|| CoveredBondsError::InvalidInput {
            field: "coupon".into(),
            reason: format!("sampled value {draw} is not representable as a decimal"),
        })
}

/// Prefix "Green " onto an instrument label unless it already says Green.
pub fn green_label(instrument_type: &str) -> String {
    if instrument_type.contains(GREEN) {
        instrument_type.to_string()
    } else {
        format!("{GREEN} {instrument_type}")
    }
}

/// `{iso}{4 random digits}{yy}{index:04}`.
pub fn historical_isin<R: Rng + ?Sized>(rng: &mut R, iso_code: &str, year: i32, index: u32) -> String {
    let serial: u32 = rng.gen_range(1000..=9999);
    format!("{iso_code}{serial}{:02}{index:04}", year.rem_euclid(100))
}

/// Builds individual records from era parameters and issue-size menus.
#[derive(Debug, Clone)]
pub struct EmissionSynthesizer<'a> {
    periods: &'a PeriodTable,
    amounts: &'a AmountMenus,
}

impl<'a> EmissionSynthesizer<'a> {
    pub fn new(periods: &'a PeriodTable, amounts: &'a AmountMenus) -> Self {
        Self { periods, amounts }
    }

    /// Synthesize the record for `issuer` issuing on `issue_date`.
    ///
    /// Random draws happen in a fixed order (green flag, amount, tenor,
    /// coupon, spread, ISIN serial) so a seeded RNG reproduces a corpus exactly.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        country: &CountryProfile,
        issuer: &Issuer,
        issue_date: NaiveDate,
        index: u32,
        now: NaiveDate,
    ) -> CoveredBondsResult<EmissionRecord> {
        let year = issue_date.year();
        let params = self.periods.lookup(year);

        let is_green = rng.gen::<f64>() < params.green_probability;

        let amount = *self
            .amounts
            .for_currency(country.currency)
            .choose(rng)
            .ok_or_else(|| CoveredBondsError::InvalidInput {
                field: "amount_menus".into(),
                reason: format!("no amounts configured for {}", country.currency),
            })?;

        let maturity_years = *MATURITY_CHOICES
            .choose(rng)
            .unwrap_or(&MATURITY_CHOICES[0]);
        let maturity = maturity_from(issue_date, maturity_years);

        let coupon = sample_rate(
            rng,
            params.coupon_range.min,
            params.coupon_range.max,
            COUPON_DP,
        )?;
        let spread = rng.gen_range(params.spread_range.min..=params.spread_range.max);

        let status = EmissionStatus::derive(issue_date, maturity, now);

        let instrument_type = if is_green {
            green_label(&issuer.instrument_type)
        } else {
            issuer.instrument_type.clone()
        };

        let isin = historical_isin(rng, &country.iso_code, year, index);

        Ok(EmissionRecord {
            issuer: issuer.name.clone(),
            amount,
            currency: country.currency,
            instrument_type,
            issue_date,
            maturity,
            coupon,
            spread,
            status,
            rating: issuer.rating.clone(),
            green_bond: is_green,
            country: country.name.clone(),
            isin,
        })
    }
}

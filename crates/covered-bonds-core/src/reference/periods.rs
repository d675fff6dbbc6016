//! Historical market eras and the issuance parameters that apply in each.
//!
//! Coupons fall from the post-crisis highs of 2010 to the negative-rate trough
//! of 2020-2021 and reprice sharply from 2022. Spreads follow the same shape.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CoveredBondsError;
use crate::types::{BasisPoints, Bounds, Rate};
use crate::CoveredBondsResult;

/// Issuance parameters for one era.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodParams {
    #[serde(with = "rate_bounds")]
    pub coupon_range: Bounds<Rate>,
    pub spread_range: Bounds<BasisPoints>,
    /// Probability that an issue in this era is a green bond.
    pub green_probability: f64,
}

/// A contiguous run of calendar years sharing the same parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub label: String,
    pub first_year: i32,
    pub last_year: i32,
    #[serde(flatten)]
    pub params: PeriodParams,
}

impl PeriodBucket {
    pub fn covers(&self, year: i32) -> bool {
        year >= self.first_year && year <= self.last_year
    }
}

/// Year-bucketed parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PeriodBucket>", into = "Vec<PeriodBucket>")]
pub struct PeriodTable {
    buckets: Vec<PeriodBucket>,
}

impl PeriodTable {
    /// Build a table from ascending, non-overlapping buckets.
    pub fn new(buckets: Vec<PeriodBucket>) -> CoveredBondsResult<Self> {
        validate_buckets(&buckets)?;
        Ok(Self { buckets })
    }

    /// The eight eras from 2010 through 2026.
    pub fn historical() -> Self {
        let bucket = |first: i32, last: i32, coupon: (Decimal, Decimal), spread: (u32, u32), green: f64| {
            PeriodBucket {
                label: format!("{first}-{last}"),
                first_year: first,
                last_year: last,
                params: PeriodParams {
                    coupon_range: Bounds::new(coupon.0, coupon.1),
                    spread_range: Bounds::new(spread.0, spread.1),
                    green_probability: green,
                },
            }
        };
        Self {
            buckets: vec![
                bucket(2010, 2011, (dec!(4.0), dec!(5.5)), (80, 120), 0.0),
                bucket(2012, 2013, (dec!(3.0), dec!(4.5)), (70, 100), 0.02),
                bucket(2014, 2015, (dec!(2.0), dec!(3.5)), (50, 80), 0.05),
                bucket(2016, 2017, (dec!(1.5), dec!(2.5)), (40, 70), 0.08),
                bucket(2018, 2019, (dec!(1.0), dec!(2.0)), (35, 60), 0.10),
                bucket(2020, 2021, (dec!(0.5), dec!(1.5)), (30, 55), 0.12),
                bucket(2022, 2023, (dec!(2.5), dec!(4.0)), (40, 65), 0.14),
                bucket(2024, 2026, (dec!(2.75), dec!(4.0)), (40, 60), 0.15),
            ],
        }
    }

    /// Parameters for `year`.
    ///
    /// Resolves to the first bucket whose last year is not before `year`, so
    /// years before the table use the earliest era and years after it the latest.
    pub fn lookup(&self, year: i32) -> &PeriodParams {
        &self.bucket_for(year).params
    }

    pub fn bucket_for(&self, year: i32) -> &PeriodBucket {
        self.buckets
            .iter()
            .find(|b| year <= b.last_year)
            .unwrap_or_else(|| &self.buckets[self.buckets.len() - 1])
    }

    pub fn buckets(&self) -> &[PeriodBucket] {
        &self.buckets
    }

    pub fn first_year(&self) -> i32 {
        self.buckets[0].first_year
    }

    pub fn last_year(&self) -> i32 {
        self.buckets[self.buckets.len() - 1].last_year
    }
}

impl Default for PeriodTable {
    fn default() -> Self {
        Self::historical()
    }
}

impl TryFrom<Vec<PeriodBucket>> for PeriodTable {
    type Error = CoveredBondsError;

    fn try_from(buckets: Vec<PeriodBucket>) -> Result<Self, Self::Error> {
        Self::new(buckets)
    }
}

impl From<PeriodTable> for Vec<PeriodBucket> {
    fn from(table: PeriodTable) -> Self {
        table.buckets
    }
}

fn validate_buckets(buckets: &[PeriodBucket]) -> CoveredBondsResult<()> {
    if buckets.is_empty() {
        return Err(CoveredBondsError::InvalidInput {
            field: "periods".into(),
            reason: "At least one period bucket is required".into(),
        });
    }

    for (i, b) in buckets.iter().enumerate() {
        let field = format!("periods[{i}]");
        if b.first_year > b.last_year {
            return Err(CoveredBondsError::InvalidInput {
                field,
                reason: format!("first_year {} is after last_year {}", b.first_year, b.last_year),
            });
        }
        if !b.params.coupon_range.is_ordered() {
            return Err(CoveredBondsError::InvalidInput {
                field,
                reason: "coupon_range min exceeds max".into(),
            });
        }
        if b.params.coupon_range.min < Decimal::ZERO {
            return Err(CoveredBondsError::InvalidInput {
                field,
                reason: "coupon_range must not be negative".into(),
            });
        }
        if !b.params.spread_range.is_ordered() {
            return Err(CoveredBondsError::InvalidInput {
                field,
                reason: "spread_range min exceeds max".into(),
            });
        }
        if !(0.0..=1.0).contains(&b.params.green_probability) {
            return Err(CoveredBondsError::InvalidInput {
                field,
                reason: format!(
                    "green_probability {} is outside [0, 1]",
                    b.params.green_probability
                ),
            });
        }
    }

    for pair in buckets.windows(2) {
        if pair[1].first_year <= pair[0].last_year {
            return Err(CoveredBondsError::InvalidInput {
                field: "periods".into(),
                reason: format!(
                    "bucket {} overlaps or precedes bucket {}",
                    pair[1].label, pair[0].label
                ),
            });
        }
    }

    Ok(())
}

/// Coupon bounds as plain numbers in config files rather than decimal strings.
mod rate_bounds {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::Bounds;

    #[derive(Serialize, Deserialize)]
    struct Wire {
        #[serde(with = "rust_decimal::serde::float")]
        min: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        max: Decimal,
    }

    pub fn serialize<S: Serializer>(b: &Bounds<Decimal>, s: S) -> Result<S::Ok, S::Error> {
        Wire { min: b.min, max: b.max }.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Bounds<Decimal>, D::Error> {
        let w = Wire::deserialize(d)?;
        Ok(Bounds::new(w.min, w.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_historical_table_is_valid() {
        let table = PeriodTable::historical();
        assert!(validate_buckets(table.buckets()).is_ok());
        assert_eq!(table.buckets().len(), 8);
        assert_eq!(table.first_year(), 2010);
        assert_eq!(table.last_year(), 2026);
    }

    #[test]
    fn test_lookup_inside_buckets() {
        let table = PeriodTable::historical();
        assert_eq!(table.bucket_for(2010).label, "2010-2011");
        assert_eq!(table.bucket_for(2011).label, "2010-2011");
        assert_eq!(table.bucket_for(2017).label, "2016-2017");
        assert_eq!(table.bucket_for(2025).label, "2024-2026");

        let p = table.lookup(2020);
        assert_eq!(p.coupon_range, Bounds::new(dec!(0.5), dec!(1.5)));
        assert_eq!(p.spread_range, Bounds::new(30, 55));
        assert_eq!(p.green_probability, 0.12);
    }

    #[test]
    fn test_lookup_out_of_range_clamps_to_nearest_bucket() {
        let table = PeriodTable::historical();
        assert_eq!(table.bucket_for(1999).label, "2010-2011");
        assert_eq!(table.bucket_for(2031).label, "2024-2026");
    }

    #[test]
    fn test_rate_cycle_shape() {
        // Coupon floors fall into 2020-2021 and rise afterwards
        let table = PeriodTable::historical();
        let floors: Vec<Decimal> = table
            .buckets()
            .iter()
            .map(|b| b.params.coupon_range.min)
            .collect();
        let trough = floors
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(table.buckets()[trough].label, "2020-2021");
        assert!(floors[..=trough].windows(2).all(|w| w[0] >= w[1]));
        assert!(floors[trough..].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_overlapping_buckets_rejected() {
        let mut buckets: Vec<PeriodBucket> = PeriodTable::historical().into();
        buckets[1].first_year = 2011;
        let err = PeriodTable::new(buckets).unwrap_err();
        assert!(matches!(err, CoveredBondsError::InvalidInput { .. }));
    }

    #[test]
    fn test_bad_probability_rejected() {
        let mut buckets: Vec<PeriodBucket> = PeriodTable::historical().into();
        buckets[0].params.green_probability = 1.5;
        assert!(PeriodTable::new(buckets).is_err());
    }

    #[test]
    fn test_table_deserializes_from_json() {
        let json = r#"[
            {"label": "early", "first_year": 2000, "last_year": 2009,
             "coupon_range": {"min": 3.5, "max": 5.0},
             "spread_range": {"min": 20, "max": 40},
             "green_probability": 0.0},
            {"label": "late", "first_year": 2010, "last_year": 2030,
             "coupon_range": {"min": 1.0, "max": 2.5},
             "spread_range": {"min": 30, "max": 60},
             "green_probability": 0.2}
        ]"#;
        let table: PeriodTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.bucket_for(2005).label, "early");
        assert_eq!(table.lookup(2040).coupon_range.max, dec!(2.5));
    }

    #[test]
    fn test_invalid_table_fails_deserialization() {
        let json = r#"[
            {"label": "x", "first_year": 2010, "last_year": 2011,
             "coupon_range": {"min": 5.0, "max": 4.0},
             "spread_range": {"min": 20, "max": 40},
             "green_probability": 0.0}
        ]"#;
        assert!(serde_json::from_str::<PeriodTable>(json).is_err());
    }
}

//! The emission record: one covered bond issuance as the dashboard consumes it.
//!
//! Records are write-once. Field order of the struct is the field order of
//! every serialized form (JSON and the JS data module).

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Amount, BasisPoints, Currency, Rate};

/// Length of a "year" when rolling an issue date forward to maturity.
///
/// Leap days are ignored: a 10-year bond issued on 2016-03-01 matures on
/// 2026-02-27, not 2026-03-01.
pub const DAYS_PER_YEAR: i64 = 365;

/// Lifecycle state of an issue relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmissionStatus {
    Upcoming,
    Active,
    Mature,
}

impl EmissionStatus {
    /// Issue date after `now` is Upcoming, maturity before `now` is Mature,
    /// anything else (both boundaries inclusive) is Active.
    pub fn derive(issue_date: NaiveDate, maturity: NaiveDate, now: NaiveDate) -> Self {
        if issue_date > now {
            EmissionStatus::Upcoming
        } else if maturity < now {
            EmissionStatus::Mature
        } else {
            EmissionStatus::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionStatus::Upcoming => "Upcoming",
            EmissionStatus::Active => "Active",
            EmissionStatus::Mature => "Mature",
        }
    }
}

impl fmt::Display for EmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single covered bond issuance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionRecord {
    pub issuer: String,
    pub amount: Amount,
    pub currency: Currency,
    #[serde(rename = "type")]
    pub instrument_type: String,
    pub issue_date: NaiveDate,
    pub maturity: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub coupon: Rate,
    pub spread: BasisPoints,
    pub status: EmissionStatus,
    pub rating: String,
    pub green_bond: bool,
    pub country: String,
    pub isin: String,
}

impl EmissionRecord {
    /// Whole 365-day years between issue and maturity, if the gap is an exact multiple.
    pub fn tenor_years(&self) -> Option<i64> {
        let days = (self.maturity - self.issue_date).num_days();
        if days > 0 && days % DAYS_PER_YEAR == 0 {
            Some(days / DAYS_PER_YEAR)
        } else {
            None
        }
    }
}

/// Roll an issue date forward by `years` fixed 365-day years.
pub fn maturity_from(issue_date: NaiveDate, years: u32) -> NaiveDate {
    issue_date + Duration::days(DAYS_PER_YEAR * i64::from(years))
}

/// Requested ordering of a record sequence by issue date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
    /// Keep generation order.
    #[default]
    None,
}

/// Stable sort by issue date. Records sharing a date keep their relative order.
pub fn sort_by_issue_date(records: &mut [EmissionRecord], order: SortOrder) {
    match order {
        SortOrder::Ascending => records.sort_by(|a, b| a.issue_date.cmp(&b.issue_date)),
        SortOrder::Descending => records.sort_by(|a, b| b.issue_date.cmp(&a.issue_date)),
        SortOrder::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(issue: NaiveDate, years: u32) -> EmissionRecord {
        EmissionRecord {
            issuer: "Nykredit".into(),
            amount: 2500,
            currency: Currency::DKK,
            instrument_type: "Covered Bond".into(),
            issue_date: issue,
            maturity: maturity_from(issue, years),
            coupon: dec!(1.25),
            spread: 42,
            status: EmissionStatus::Active,
            rating: "Aaa/AAA".into(),
            green_bond: false,
            country: "Denmark".into(),
            isin: "DK1234190001".into(),
        }
    }

    #[test]
    fn test_status_upcoming_when_issued_after_now() {
        let now = date(2026, 1, 12);
        let issue = date(2026, 2, 1);
        let status = EmissionStatus::derive(issue, maturity_from(issue, 5), now);
        assert_eq!(status, EmissionStatus::Upcoming);
    }

    #[test]
    fn test_status_mature_when_matured_before_now() {
        let now = date(2026, 1, 12);
        let status = EmissionStatus::derive(date(2020, 1, 1), date(2025, 1, 1), now);
        assert_eq!(status, EmissionStatus::Mature);
    }

    #[test]
    fn test_status_active_when_spanning_now() {
        let now = date(2026, 1, 12);
        let status = EmissionStatus::derive(date(2024, 6, 1), date(2029, 6, 1), now);
        assert_eq!(status, EmissionStatus::Active);
    }

    #[test]
    fn test_status_boundaries_are_active() {
        let now = date(2026, 1, 12);
        assert_eq!(
            EmissionStatus::derive(now, date(2030, 1, 1), now),
            EmissionStatus::Active
        );
        assert_eq!(
            EmissionStatus::derive(date(2020, 1, 1), now, now),
            EmissionStatus::Active
        );
    }

    #[test]
    fn test_maturity_ignores_leap_days() {
        // 2016-03-01 + 3650 days crosses the 2020 and 2024 leap days
        assert_eq!(maturity_from(date(2016, 3, 1), 10), date(2026, 2, 27));
        assert_eq!(maturity_from(date(2021, 1, 15), 3), date(2024, 1, 15));
    }

    #[test]
    fn test_tenor_years() {
        assert_eq!(record(date(2019, 5, 20), 7).tenor_years(), Some(7));
    }

    #[test]
    fn test_json_field_names_and_order() {
        let json = serde_json::to_string(&record(date(2019, 5, 20), 3)).unwrap();
        let keys = [
            "\"issuer\"",
            "\"amount\"",
            "\"currency\"",
            "\"type\"",
            "\"issueDate\"",
            "\"maturity\"",
            "\"coupon\"",
            "\"spread\"",
            "\"status\"",
            "\"rating\"",
            "\"greenBond\"",
            "\"country\"",
            "\"isin\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(json.contains("\"coupon\":1.25"), "{json}");
        assert!(json.contains("\"issueDate\":\"2019-05-20\""), "{json}");
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let mut records = vec![
            record(date(2019, 1, 1), 3),
            record(date(2021, 1, 1), 3),
            record(date(2019, 1, 1), 5),
        ];
        sort_by_issue_date(&mut records, SortOrder::Descending);
        assert_eq!(records[0].issue_date, date(2021, 1, 1));
        assert_eq!(records[1].tenor_years(), Some(3));
        assert_eq!(records[2].tenor_years(), Some(5));
    }
}

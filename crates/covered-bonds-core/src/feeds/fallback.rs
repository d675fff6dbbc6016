//! Static payloads served when an upstream cannot be reached.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

pub const CACHED_DATA: &str = "Cached Data";
pub const FALLBACK_DATA: &str = "Fallback Data";

/// The dashboard's data endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedKind {
    Market,
    DigitalBonds,
    EconomicCalendar,
}

impl FeedKind {
    pub const ALL: [FeedKind; 3] = [
        FeedKind::Market,
        FeedKind::DigitalBonds,
        FeedKind::EconomicCalendar,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            FeedKind::Market => "/api/market",
            FeedKind::DigitalBonds => "/api/digital-bonds",
            FeedKind::EconomicCalendar => "/api/economic-calendar",
        }
    }

    /// How long a successful response may be served from cache.
    pub fn ttl(&self) -> Duration {
        match self {
            FeedKind::Market | FeedKind::DigitalBonds => Duration::hours(1),
            FeedKind::EconomicCalendar => Duration::hours(24),
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedKind::Market => "market",
            FeedKind::DigitalBonds => "digital-bonds",
            FeedKind::EconomicCalendar => "economic-calendar",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Success,
    Error,
}

/// What an endpoint returns to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResponse {
    pub status: FeedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_update: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FeedResponse {
    pub fn success(data: serde_json::Value, source: &str, updated: DateTime<Utc>) -> Self {
        Self {
            status: FeedStatus::Success,
            data: Some(data),
            message: None,
            updated,
            next_update: None,
            source: Some(source.to_string()),
            note: None,
        }
    }

    /// True for placeholder content: callers should show it but flag it.
    pub fn is_degraded(&self) -> bool {
        self.status == FeedStatus::Error
            || matches!(self.source.as_deref(), Some(CACHED_DATA) | Some(FALLBACK_DATA))
    }
}

/// The embedded payload for `kind`, dated relative to `now`.
pub fn fallback_response(kind: FeedKind, now: DateTime<Utc>) -> FeedResponse {
    match kind {
        FeedKind::Market => FeedResponse {
            status: FeedStatus::Error,
            data: None,
            message: Some("Failed to fetch market data: upstream unavailable".into()),
            updated: now,
            next_update: None,
            source: None,
            note: None,
        },
        FeedKind::DigitalBonds => FeedResponse {
            status: FeedStatus::Success,
            data: Some(digital_assets()),
            message: None,
            updated: now,
            next_update: None,
            source: Some(CACHED_DATA.into()),
            note: Some("Using cached data - API may be unavailable".into()),
        },
        FeedKind::EconomicCalendar => FeedResponse {
            status: FeedStatus::Success,
            data: Some(calendar_events(now)),
            message: None,
            updated: now,
            next_update: Some(now + Duration::hours(24)),
            source: Some(FALLBACK_DATA.into()),
            note: None,
        },
    }
}

fn digital_assets() -> serde_json::Value {
    json!([
        {
            "ticker": "USDY (Ondo Treasury)",
            "type": "Tokenized Bond",
            "price": 1.0512,
            "currency": "USD",
            "change": 0.08,
            "volume": "2500K",
            "yield": "5.10%"
        },
        {
            "ticker": "EURC (Circle Euro)",
            "type": "Digital Cash",
            "price": 1.0002,
            "currency": "EUR",
            "change": 0.01,
            "volume": "1200K",
            "yield": "N/A"
        },
        {
            "ticker": "PAXG (Tether Gold)",
            "type": "Commodity-Backed",
            "price": 2685.50,
            "currency": "USD",
            "change": -0.15,
            "volume": "850K",
            "yield": "N/A"
        }
    ])
}

fn calendar_events(now: DateTime<Utc>) -> serde_json::Value {
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);
    let event = |day: chrono::NaiveDate,
                 time: &str,
                 flag: &str,
                 code: &str,
                 name: &str,
                 importance: &str,
                 previous: &str,
                 forecast: &str| {
        json!({
            "datetime": format!("{day}T{time}"),
            "country": flag,
            "country_code": code,
            "event": name,
            "importance": importance,
            "previous": previous,
            "forecast": forecast,
            "actual": null,
            "impact": importance,
        })
    };

    json!([
        event(today, "08:30:00", "🇺🇸", "US", "Retail Sales m/m", "high", "0.3%", "0.5%"),
        event(today, "10:00:00", "🇪🇺", "EUR", "ECB President Lagarde Speaks", "high", "N/A", "N/A"),
        event(today, "14:30:00", "🇺🇸", "US", "Unemployment Claims", "medium", "210K", "215K"),
        event(tomorrow, "08:30:00", "🇬🇧", "GB", "GDP m/m", "high", "0.2%", "0.3%"),
        event(tomorrow, "13:00:00", "🇺🇸", "US", "Core CPI m/m", "high", "0.3%", "0.3%"),
    ])
}

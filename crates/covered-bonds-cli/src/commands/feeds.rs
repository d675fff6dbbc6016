use clap::{Args, ValueEnum};
use serde_json::Value;

use covered_bonds_core::feeds::{FeedKind, FeedService, OfflineUpstream, SystemClock};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FeedArg {
    Market,
    DigitalBonds,
    EconomicCalendar,
}

impl From<FeedArg> for FeedKind {
    fn from(arg: FeedArg) -> Self {
        match arg {
            FeedArg::Market => FeedKind::Market,
            FeedArg::DigitalBonds => FeedKind::DigitalBonds,
            FeedArg::EconomicCalendar => FeedKind::EconomicCalendar,
        }
    }
}

/// Arguments for the offline feed payload
#[derive(Args)]
pub struct FeedArgs {
    /// Endpoint to serve
    pub kind: FeedArg,
}

pub fn run_feed(args: FeedArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kind = FeedKind::from(args.kind);
    let mut service = FeedService::new(kind, OfflineUpstream, SystemClock);
    let response = service.latest();
    tracing::debug!(feed = %kind, path = kind.path(), degraded = response.is_degraded(), "served feed");
    Ok(serde_json::to_value(response)?)
}

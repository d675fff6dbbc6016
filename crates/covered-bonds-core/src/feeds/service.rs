use crate::error::CoveredBondsError;
use crate::feeds::cache::TtlCache;
use crate::feeds::clock::Clock;
use crate::feeds::fallback::{fallback_response, FeedKind, FeedResponse};
use crate::CoveredBondsResult;

/// A third-party data source behind one feed.
pub trait Upstream {
    /// Name reported as the response `source`.
    fn label(&self) -> &str;

    fn fetch(&self, kind: FeedKind) -> CoveredBondsResult<serde_json::Value>;
}

/// An upstream that is never reachable; every call yields the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineUpstream;

impl Upstream for OfflineUpstream {
    fn label(&self) -> &str {
        "offline"
    }

    fn fetch(&self, kind: FeedKind) -> CoveredBondsResult<serde_json::Value> {
        Err(CoveredBondsError::Upstream {
            source_name: self.label().to_string(),
            reason: format!("no network access for {}", kind.path()),
        })
    }
}

/// "Return the last computed result" for one endpoint.
///
/// Successful fetches are cached for the feed's TTL. A failed fetch never
/// reaches the caller: it is logged and the static fallback is returned
/// instead, uncached, so the next call tries the upstream again.
pub struct FeedService<U: Upstream, C: Clock> {
    kind: FeedKind,
    upstream: U,
    cache: TtlCache<FeedResponse, C>,
}

impl<U: Upstream, C: Clock> FeedService<U, C> {
    pub fn new(kind: FeedKind, upstream: U, clock: C) -> Self {
        Self {
            kind,
            upstream,
            cache: TtlCache::new(kind.ttl(), clock),
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn latest(&mut self) -> FeedResponse {
        if let Some(cached) = self.cache.get_fresh() {
            tracing::debug!(feed = %self.kind, "serving cached response");
            return cached.clone();
        }

        let now = self.cache.clock().now();
        match self.upstream.fetch(self.kind) {
            Ok(data) => {
                let response = FeedResponse::success(data, self.upstream.label(), now);
                self.cache.put(response.clone());
                response
            }
            Err(e) => {
                tracing::warn!(feed = %self.kind, error = %e, "upstream fetch failed; serving fallback");
                fallback_response(self.kind, now)
            }
        }
    }

    /// Drop the cached response so the next call refetches.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::clock::ManualClock;
    use crate::feeds::fallback::FeedStatus;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use std::cell::Cell;

    /// Succeeds or fails on demand and counts calls.
    struct Scripted {
        up: Cell<bool>,
        calls: Cell<u32>,
    }

    impl Scripted {
        fn new(up: bool) -> Self {
            Self {
                up: Cell::new(up),
                calls: Cell::new(0),
            }
        }
    }

    impl Upstream for &Scripted {
        fn label(&self) -> &str {
            "CoinGecko"
        }

        fn fetch(&self, _kind: FeedKind) -> CoveredBondsResult<serde_json::Value> {
            self.calls.set(self.calls.get() + 1);
            if self.up.get() {
                Ok(json!([{ "ticker": "PAXG", "price": 2700.0 }]))
            } else {
                Err(CoveredBondsError::Upstream {
                    source_name: "CoinGecko".into(),
                    reason: "timeout".into(),
                })
            }
        }
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 12, 8, 0, 0).unwrap())
    }

    #[test]
    fn test_success_is_cached_for_ttl() {
        let clock = clock();
        let upstream = Scripted::new(true);
        let mut svc = FeedService::new(FeedKind::DigitalBonds, &upstream, &clock);

        let first = svc.latest();
        assert_eq!(first.status, FeedStatus::Success);
        assert_eq!(first.source.as_deref(), Some("CoinGecko"));
        assert!(!first.is_degraded());

        clock.advance(Duration::minutes(30));
        assert_eq!(svc.latest(), first);
        assert_eq!(upstream.calls.get(), 1);

        clock.advance(Duration::minutes(30));
        svc.latest();
        assert_eq!(upstream.calls.get(), 2);
    }

    #[test]
    fn test_failure_serves_fallback_and_retries() {
        let clock = clock();
        let upstream = Scripted::new(false);
        let mut svc = FeedService::new(FeedKind::DigitalBonds, &upstream, &clock);

        let resp = svc.latest();
        assert!(resp.is_degraded());
        assert_eq!(resp.source.as_deref(), Some("Cached Data"));

        upstream.up.set(true);
        let resp = svc.latest();
        assert!(!resp.is_degraded());
        assert_eq!(upstream.calls.get(), 2);
    }

    #[test]
    fn test_stale_cache_is_not_served_on_failure() {
        let clock = clock();
        let upstream = Scripted::new(true);
        let mut svc = FeedService::new(FeedKind::EconomicCalendar, &upstream, &clock);
        svc.latest();

        upstream.up.set(false);
        clock.advance(Duration::hours(25));
        let resp = svc.latest();
        assert_eq!(resp.source.as_deref(), Some("Fallback Data"));
    }

    #[test]
    fn test_refresh_forces_refetch() {
        let clock = clock();
        let upstream = Scripted::new(true);
        let mut svc = FeedService::new(FeedKind::Market, &upstream, &clock);
        svc.latest();
        svc.refresh();
        svc.latest();
        assert_eq!(upstream.calls.get(), 2);
    }

    #[test]
    fn test_offline_upstream_always_falls_back() {
        let clock = clock();
        let mut svc = FeedService::new(FeedKind::Market, OfflineUpstream, &clock);
        let resp = svc.latest();
        assert_eq!(resp.status, FeedStatus::Error);
        assert!(resp.is_degraded());
    }
}

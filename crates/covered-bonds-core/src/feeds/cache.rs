use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::feeds::clock::Clock;

/// A stored value and when it was stored.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

/// Single-slot cache whose entry goes stale `ttl` after it was stored.
///
/// Staleness is judged against the injected clock, so tests can step time
/// instead of sleeping.
#[derive(Debug)]
pub struct TtlCache<T, C: Clock> {
    clock: C,
    ttl: Duration,
    entry: Option<CacheEntry<T>>,
}

impl<T, C: Clock> TtlCache<T, C> {
    pub fn new(ttl: Duration, clock: C) -> Self {
        Self {
            clock,
            ttl,
            entry: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Replace the entry, stamping it with the current time.
    pub fn put(&mut self, value: T) {
        self.entry = Some(CacheEntry {
            value,
            stored_at: self.clock.now(),
        });
    }

    /// The entry if it is younger than the TTL.
    pub fn get_fresh(&self) -> Option<&T> {
        let entry = self.entry.as_ref()?;
        let age = self.clock.now() - entry.stored_at;
        (age < self.ttl).then_some(&entry.value)
    }

    /// The entry regardless of age.
    pub fn latest(&self) -> Option<&CacheEntry<T>> {
        self.entry.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::clock::ManualClock;
    use chrono::TimeZone;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 12, 8, 0, 0).unwrap())
    }

    #[test]
    fn test_fresh_until_ttl_elapses() {
        let clock = clock();
        let mut cache = TtlCache::new(Duration::hours(1), &clock);
        assert!(cache.get_fresh().is_none());

        cache.put(7);
        assert_eq!(cache.get_fresh(), Some(&7));

        clock.advance(Duration::minutes(59));
        assert_eq!(cache.get_fresh(), Some(&7));

        // age == ttl counts as stale
        clock.advance(Duration::minutes(1));
        assert!(cache.get_fresh().is_none());
        assert_eq!(cache.latest().map(|e| e.value), Some(7));
    }

    #[test]
    fn test_put_restamps_entry() {
        let clock = clock();
        let mut cache = TtlCache::new(Duration::hours(24), &clock);
        cache.put("a");
        clock.advance(Duration::hours(30));
        cache.put("b");
        assert_eq!(cache.get_fresh(), Some(&"b"));
        assert_eq!(cache.latest().unwrap().stored_at, clock.now());
    }

    #[test]
    fn test_invalidate_clears() {
        let clock = clock();
        let mut cache = TtlCache::new(Duration::hours(1), &clock);
        cache.put(1);
        cache.invalidate();
        assert!(cache.get_fresh().is_none());
        assert!(cache.latest().is_none());
    }
}

//! The dashboard's data endpoints as a "last computed result" contract:
//! a TTL cache over an upstream, with static payloads when it is down.

pub mod cache;
pub mod clock;
pub mod fallback;
pub mod service;

pub use cache::{CacheEntry, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use fallback::{fallback_response, FeedKind, FeedResponse, FeedStatus, CACHED_DATA, FALLBACK_DATA};
pub use service::{FeedService, OfflineUpstream, Upstream};

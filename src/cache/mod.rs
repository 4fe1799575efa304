//! Optional response cache.
//!
//! The client hands every raw response body to a [`ResponseCache`] keyed by
//! request URL, and asks it first before going to the network. The client
//! never expires anything itself: each entry carries the `max_age` the client
//! was configured with, and implementations decide freshness via
//! [`CachedResponse::is_fresh`].

mod disk;
mod memory;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use disk::DiskCache;
pub use memory::MemoryCache;

/// A raw response body plus the bookkeeping needed to judge its age
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Response body exactly as received
    pub body: String,
    /// When the response was stored
    pub stored_at: DateTime<Utc>,
    /// How long the response may be served from cache
    #[serde(with = "duration_secs")]
    pub max_age: Duration,
}

impl CachedResponse {
    /// A response stored now
    pub fn new(body: impl Into<String>, max_age: Duration) -> Self {
        Self {
            body: body.into(),
            stored_at: Utc::now(),
            max_age,
        }
    }

    /// Whether the entry is still within `max_age` at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let Ok(max_age) = chrono::Duration::from_std(self.max_age) else {
            return true;
        };
        now.signed_duration_since(self.stored_at) < max_age
    }
}

/// Cache delegate consulted by the client.
///
/// Implementations must be cheap to call from async code; the disk cache
/// does small synchronous file IO.
pub trait ResponseCache: Send + Sync {
    /// Return a fresh cached response for `url`, if any
    fn cached_response(&self, url: &str) -> Option<CachedResponse>;

    /// Store a response for `url`, replacing any previous entry
    fn store_response(&self, url: &str, response: &CachedResponse) -> crate::Result<()>;

    /// Drop every entry
    fn clear(&self) -> crate::Result<()>;
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_within_max_age() {
        let response = CachedResponse::new("{}", Duration::from_secs(60));
        assert!(response.is_fresh(Utc::now()));
    }

    #[test]
    fn test_stale_after_max_age() {
        let response = CachedResponse::new("{}", Duration::from_secs(60));
        let later = response.stored_at + chrono::Duration::seconds(61);
        assert!(!response.is_fresh(later));
    }

    #[test]
    fn test_zero_max_age_is_never_fresh() {
        let response = CachedResponse::new("{}", Duration::ZERO);
        assert!(!response.is_fresh(response.stored_at));
    }

    #[test]
    fn test_envelope_serializes_max_age_as_seconds() {
        let response = CachedResponse::new("{\"resultCount\":0}", Duration::from_secs(3600));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["max_age"], 3600);

        let back: CachedResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}

use chrono::{DateTime, TimeDelta, Utc};
use scout_core::{ResultSource, SearchResultRecord, SearchType};
use serde::{Deserialize, Serialize};

/// One cached result set. Field names follow the on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub query: String,
    pub search_type: SearchType,
    pub results: Vec<SearchResultRecord>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub source: ResultSource,
}

impl CacheEntry {
    /// An entry is valid while strictly younger than `ttl`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now.timestamp_millis() - self.timestamp < ttl.num_milliseconds()
    }
}

/// Counts over entries that have not expired yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total: usize,
    #[serde(rename = "agi")]
    pub remote: usize,
    #[serde(rename = "mock")]
    pub synthetic: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: i64) -> CacheEntry {
        CacheEntry {
            query: "q".into(),
            search_type: SearchType::Google,
            results: vec![],
            timestamp,
            source: ResultSource::Remote,
        }
    }

    #[test]
    fn validity_boundary_is_exclusive() {
        let now = Utc::now();
        let ttl = TimeDelta::hours(24);
        let exactly_stale = entry(now.timestamp_millis() - ttl.num_milliseconds());
        let fresh = entry(now.timestamp_millis() - ttl.num_milliseconds() + 1);
        assert!(!exactly_stale.is_valid_at(now, ttl));
        assert!(fresh.is_valid_at(now, ttl));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(entry(1)).unwrap();
        assert_eq!(json["searchType"], "google");
        assert_eq!(json["source"], "agi");
    }
}

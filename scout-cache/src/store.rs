use crate::entry::{CacheEntry, CacheStats};
use chrono::{DateTime, TimeDelta, Utc};
use scout_core::{Result, ResultSource, SearchResultRecord, SearchType};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

type EntryMap = BTreeMap<String, CacheEntry>;

/// Default cache file name, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "agi-cache.json";

/// Entries at least this old are treated as absent.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Search results persisted to a single JSON file, keyed by
/// `search_type:query`.
///
/// Every write rewrites the whole file. Disk failures are logged and
/// swallowed: a failed load starts cold, a failed save keeps memory correct.
pub struct ResultCache {
    path: PathBuf,
    ttl: TimeDelta,
    entries: RwLock<EntryMap>,
    force_remote: AtomicBool,
}

impl ResultCache {
    /// Open the cache at `path`, loading whatever is already on disk.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load(&path);
        tracing::info!(path = %path.display(), entries = entries.len(), "Loaded cached results");
        Self {
            path,
            ttl: TimeDelta::hours(DEFAULT_TTL_HOURS),
            entries: RwLock::new(entries),
            force_remote: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Cache key: the query is trimmed and lower-cased.
    pub fn key(search_type: SearchType, query: &str) -> String {
        format!("{}:{}", search_type, query.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, search_type: SearchType, query: &str) -> Option<CacheEntry> {
        self.lookup_at(search_type, query, Utc::now())
    }

    /// Look up a valid entry as of `now`. A stale entry is evicted.
    pub fn lookup_at(
        &self,
        search_type: SearchType,
        query: &str,
        now: DateTime<Utc>,
    ) -> Option<CacheEntry> {
        let key = Self::key(search_type, query);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            Some(entry) if entry.is_valid_at(now, self.ttl) => {
                tracing::info!(
                    source = entry.source.as_str(),
                    search.type = %search_type,
                    query,
                    "Cache HIT"
                );
                Some(entry.clone())
            }
            Some(_) => {
                tracing::info!(search.type = %search_type, query, "Cache entry EXPIRED");
                entries.remove(&key);
                self.persist(&entries);
                None
            }
            None => None,
        }
    }

    /// Read-only lookup: no expiry check, no eviction.
    pub fn peek(&self, search_type: SearchType, query: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&Self::key(search_type, query)).cloned()
    }

    pub fn store(
        &self,
        search_type: SearchType,
        query: &str,
        results: Vec<SearchResultRecord>,
        source: ResultSource,
    ) {
        self.store_at(search_type, query, results, source, Utc::now());
    }

    /// Overwrite the entry for the key and persist the whole map.
    pub fn store_at(
        &self,
        search_type: SearchType,
        query: &str,
        results: Vec<SearchResultRecord>,
        source: ResultSource,
        now: DateTime<Utc>,
    ) {
        let count = results.len();
        let entry = CacheEntry {
            query: query.to_string(),
            search_type,
            results,
            timestamp: now.timestamp_millis(),
            source,
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(Self::key(search_type, query), entry);
        self.persist(&entries);

        tracing::info!(
            count,
            source = source.as_str(),
            search.type = %search_type,
            query,
            "Cached results"
        );
    }

    pub fn set_force_remote(&self, force: bool) {
        self.force_remote.store(force, Ordering::Relaxed);
        tracing::info!(force, "Force remote search toggled");
    }

    pub fn force_remote(&self) -> bool {
        self.force_remote.load(Ordering::Relaxed)
    }

    /// Whether a caller should go to the remote agent instead of the cache.
    pub fn should_query_remote(&self, search_type: SearchType, query: &str) -> bool {
        if self.force_remote() {
            return true;
        }
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        !entries
            .get(&Self::key(search_type, query))
            .is_some_and(|entry| entry.is_valid_at(Utc::now(), self.ttl))
    }

    pub fn stats(&self) -> CacheStats {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> CacheStats {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|entry| entry.is_valid_at(now, self.ttl)).fold(
            CacheStats::default(),
            |mut stats, entry| {
                stats.total += 1;
                match entry.source {
                    ResultSource::Remote => stats.remote += 1,
                    ResultSource::Synthetic => stats.synthetic += 1,
                }
                stats
            },
        )
    }

    /// Drop every entry and remove the backing file.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to remove cache file");
            }
        }
        tracing::info!("Cache cleared");
    }

    /// The whole map as pretty-printed JSON.
    pub fn export(&self) -> Result<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(serde_json::to_string_pretty(&*entries)?)
    }

    fn persist(&self, entries: &EntryMap) {
        if let Err(e) = write_file(&self.path, entries) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to save cache");
        } else {
            tracing::debug!(entries = entries.len(), "Saved cache");
        }
    }
}

fn load(path: &Path) -> EntryMap {
    if !path.exists() {
        return EntryMap::new();
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(scout_core::ScoutError::from)
        .and_then(|data| serde_json::from_str::<EntryMap>(&data).map_err(Into::into));
    match parsed {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load cache");
            EntryMap::new()
        }
    }
}

fn write_file(path: &Path, entries: &EntryMap) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, data)?;
    Ok(())
}

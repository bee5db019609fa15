//! # scout-cache
//!
//! File-backed cache of search results keyed by `(search type, query)`.
//!
//! ```rust,no_run
//! use scout_cache::ResultCache;
//! use scout_core::{ResultSource, SearchResultRecord, SearchType};
//!
//! let cache = ResultCache::open("agi-cache.json");
//! cache.store(
//!     SearchType::CostEffective,
//!     "ai fitness coach",
//!     vec![SearchResultRecord::new("Fitbod", "https://fitbod.me", "Workout planner")],
//!     ResultSource::Remote,
//! );
//! assert!(cache.lookup(SearchType::CostEffective, "AI Fitness Coach").is_some());
//! ```

mod entry;
mod store;

pub use entry::{CacheEntry, CacheStats};
pub use store::{DEFAULT_CACHE_FILE, DEFAULT_TTL_HOURS, ResultCache};

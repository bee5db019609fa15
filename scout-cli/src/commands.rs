use anyhow::{Context, Result, bail};
use scout_agi::CompetitorSearch;
use scout_cache::ResultCache;
use scout_core::SearchType;
use std::path::Path;
use std::time::Duration;

/// Queries searched by `warmup` when none are given.
pub const DEFAULT_WARMUP_QUERIES: [&str; 4] = [
    "how to use this application",
    "getting started guide",
    "features and capabilities",
    "troubleshooting common issues",
];

/// Pause between warmup searches to stay under the agent's rate limit.
pub const WARMUP_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Queries whose entry could be read back from the cache.
    pub verified: usize,
}

impl WarmupSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Run a cost-effective search per query, then check each landed in the cache.
pub async fn warmup(search: &CompetitorSearch, queries: &[String], delay: Duration) -> WarmupSummary {
    let mut summary = WarmupSummary { succeeded: 0, failed: 0, verified: 0 };

    for (index, query) in queries.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(delay).await;
        }
        match search.search_cost_effective(query).await {
            Ok(results) => {
                tracing::info!(query = %query, count = results.len(), "Warmup search cached");
                summary.succeeded += 1;
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Warmup search failed");
                summary.failed += 1;
            }
        }
    }

    summary.verified = queries
        .iter()
        .filter(|query| search.cache().peek(SearchType::CostEffective, query).is_some())
        .count();
    summary
}

pub async fn run_warmup(search: &CompetitorSearch, queries: Vec<String>) -> Result<()> {
    let queries = if queries.is_empty() {
        DEFAULT_WARMUP_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        queries
    };

    let summary = warmup(search, &queries, WARMUP_DELAY).await;
    println!("Successfully cached: {}", summary.succeeded);
    println!("Failed: {}", summary.failed);
    println!("Verified: {}/{}", summary.verified, summary.total());

    if summary.verified != queries.len() {
        bail!("{} of {} warmup queries are missing from the cache", queries.len() - summary.verified, queries.len());
    }
    Ok(())
}

pub fn cache_stats(cache: &ResultCache) -> Result<String> {
    Ok(serde_json::to_string_pretty(&cache.stats())?)
}

/// Clear the cache and report how many entries were dropped.
pub fn cache_clear(cache: &ResultCache) -> usize {
    let cleared = cache.len();
    cache.clear();
    cleared
}

pub fn cache_export(cache: &ResultCache, output: Option<&Path>) -> Result<()> {
    let json = cache.export()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write cache export to {}", path.display()))?;
            println!("Exported {} entries to {}", cache.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub async fn run_test_agi(search: &CompetitorSearch) -> Result<()> {
    if !search.is_remote_enabled() {
        println!("AGI_API_KEY is not set; searches use synthetic results");
    }
    if search.test_connection().await {
        println!("AGI API is connected and working");
        Ok(())
    } else {
        bail!("AGI API connection failed")
    }
}

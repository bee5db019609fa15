use crate::pool::{PoolStatus, SessionPool};
use crate::search::SearchClient;
use crate::synthetic;
use scout_cache::ResultCache;
use scout_core::{Result, ResultSource, ScoutError, SearchResultRecord, SearchType};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Cost-effective searches keep at most this many records.
pub const COST_EFFECTIVE_LIMIT: usize = 8;

/// Cache-aware competitor search.
///
/// Without a [`SearchClient`] every search is answered from the synthetic
/// generators, so the rest of the pipeline still runs locally.
pub struct CompetitorSearch {
    cache: Arc<ResultCache>,
    client: Option<SearchClient>,
}

impl CompetitorSearch {
    pub fn new(cache: Arc<ResultCache>, client: SearchClient) -> Self {
        Self { cache, client: Some(client) }
    }

    pub fn synthetic_only(cache: Arc<ResultCache>) -> Self {
        Self { cache, client: None }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn pool(&self) -> Option<&Arc<SessionPool>> {
        self.client.as_ref().map(SearchClient::pool)
    }

    pub fn pool_status(&self) -> Option<PoolStatus> {
        self.pool().map(|pool| pool.status())
    }

    pub async fn search_product_hunt(&self, query: &str) -> Result<Vec<SearchResultRecord>> {
        self.search_product_hunt_with_cancel(query, &CancellationToken::new()).await
    }

    /// Product Hunt search. Remote errors propagate.
    pub async fn search_product_hunt_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResultRecord>> {
        self.cached_or_remote(SearchType::ProductHunt, query, cancel, synthetic::product_results)
            .await
    }

    pub async fn search_google(&self, query: &str) -> Result<Vec<SearchResultRecord>> {
        self.search_google_with_cancel(query, &CancellationToken::new()).await
    }

    /// Web search. Remote errors propagate.
    pub async fn search_google_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResultRecord>> {
        self.cached_or_remote(SearchType::Google, query, cancel, synthetic::web_results).await
    }

    pub async fn search_cost_effective(&self, query: &str) -> Result<Vec<SearchResultRecord>> {
        self.search_cost_effective_with_cancel(query, &CancellationToken::new()).await
    }

    /// Snippet-only search capped at [`COST_EFFECTIVE_LIMIT`] records.
    ///
    /// A remote failure falls back to synthetic results, which are cached.
    /// Only cancellation is reported as an error.
    pub async fn search_cost_effective_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResultRecord>> {
        let search_type = SearchType::CostEffective;
        let Some(client) = &self.client else {
            tracing::warn!(query, "Using synthetic cost-effective results (AGI_API_KEY missing)");
            return Ok(self.store_synthetic(search_type, query, synthetic::web_results(query)));
        };

        if let Some(mut cached) = self.fresh(search_type, query) {
            cached.truncate(COST_EFFECTIVE_LIMIT);
            return Ok(cached);
        }

        match client.search_with_cancel(search_type, query, cancel).await {
            Ok(mut results) => {
                results.truncate(COST_EFFECTIVE_LIMIT);
                self.cache.store(search_type, query, results.clone(), ResultSource::Remote);
                Ok(results)
            }
            Err(ScoutError::Cancelled) => Err(ScoutError::Cancelled),
            Err(e) => {
                tracing::error!(query, error = %e, "Cost-effective search failed, using synthetic results");
                Ok(self.store_synthetic(search_type, query, synthetic::web_results(query)))
            }
        }
    }

    /// Run a throwaway cost-effective search against the agent, bypassing
    /// the cache and the synthetic fallback. `false` when no agent is
    /// configured or the search fails.
    pub async fn test_connection(&self) -> bool {
        let Some(client) = &self.client else {
            tracing::warn!("AGI connection test skipped (AGI_API_KEY missing)");
            return false;
        };
        match client.search(SearchType::CostEffective, "test").await {
            Ok(results) => {
                tracing::info!(count = results.len(), "AGI connected successfully");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "AGI connection failed");
                false
            }
        }
    }

    async fn cached_or_remote(
        &self,
        search_type: SearchType,
        query: &str,
        cancel: &CancellationToken,
        fallback: fn(&str) -> Vec<SearchResultRecord>,
    ) -> Result<Vec<SearchResultRecord>> {
        let Some(client) = &self.client else {
            tracing::warn!(search.type = %search_type, query, "Using synthetic results (AGI_API_KEY missing)");
            return Ok(self.store_synthetic(search_type, query, fallback(query)));
        };

        if let Some(cached) = self.fresh(search_type, query) {
            return Ok(cached);
        }

        let results = client.search_with_cancel(search_type, query, cancel).await.map_err(|e| {
            tracing::error!(search.type = %search_type, query, error = %e, "Search failed");
            e
        })?;
        self.cache.store(search_type, query, results.clone(), ResultSource::Remote);
        Ok(results)
    }

    fn fresh(&self, search_type: SearchType, query: &str) -> Option<Vec<SearchResultRecord>> {
        if self.cache.should_query_remote(search_type, query) {
            return None;
        }
        self.cache.lookup(search_type, query).map(|entry| entry.results)
    }

    fn store_synthetic(
        &self,
        search_type: SearchType,
        query: &str,
        results: Vec<SearchResultRecord>,
    ) -> Vec<SearchResultRecord> {
        self.cache.store(search_type, query, results.clone(), ResultSource::Synthetic);
        results
    }
}

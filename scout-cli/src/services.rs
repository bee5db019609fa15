use crate::config::ScoutConfig;
use anyhow::{Context, Result};
use chrono::TimeDelta;
use scout_agi::{AgiClient, CompetitorSearch, SearchClient, SessionPool};
use scout_analysis::LivePipeline;
use scout_cache::ResultCache;
use scout_model::OpenAIClient;
use std::sync::Arc;

/// Long-lived objects shared by every command.
pub struct Services {
    pub cache: Arc<ResultCache>,
    pub search: Arc<CompetitorSearch>,
    pub pipeline: Arc<LivePipeline>,
}

impl Services {
    pub fn build(config: &ScoutConfig) -> Result<Self> {
        let ttl = TimeDelta::try_hours(config.cache.ttl_hours)
            .with_context(|| format!("cache ttl_hours out of range: {}", config.cache.ttl_hours))?;
        let cache = Arc::new(ResultCache::open(&config.cache.path).with_ttl(ttl));
        if config.cache.force_remote {
            cache.set_force_remote(true);
        }

        let search = match config.agi_config() {
            Some(agi) => {
                let client = AgiClient::new(agi).context("Failed to create AGI client")?;
                let pool = Arc::new(SessionPool::new(Arc::new(client), config.pool_config()));
                let client = SearchClient::new(pool).with_poll_config(config.poll_config());
                CompetitorSearch::new(cache.clone(), client)
            }
            None => {
                tracing::warn!("AGI_API_KEY not set, searches will use synthetic results");
                CompetitorSearch::synthetic_only(cache.clone())
            }
        };
        let search = Arc::new(search);

        let mut pipeline = LivePipeline::new(search.clone());
        match config.openai_config() {
            Some(openai) => {
                let model = OpenAIClient::new(openai).context("Failed to create OpenAI client")?;
                pipeline = pipeline.with_model(Arc::new(model));
            }
            None => tracing::warn!("OPENAI_API_KEY not set, live analysis is disabled"),
        }

        Ok(Self { cache, search, pipeline: Arc::new(pipeline) })
    }

    /// Delete pooled remote sessions.
    pub async fn shutdown(&self) {
        if let Some(pool) = self.search.pool() {
            pool.cleanup().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> ScoutConfig {
        let mut config = ScoutConfig::default();
        config.cache.path = dir.path().join("cache.json");
        config
    }

    #[test]
    fn no_keys_means_synthetic_and_no_live_pipeline() {
        let dir = TempDir::new().unwrap();
        let services = Services::build(&config(&dir)).unwrap();
        assert!(!services.search.is_remote_enabled());
        assert!(!services.pipeline.has_model());
        assert!(!services.cache.force_remote());
    }

    #[test]
    fn keys_enable_remote_search_and_model() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.agi.api_key = Some("agi-key".into());
        config.openai.api_key = Some("sk-key".into());
        config.cache.force_remote = true;

        let services = Services::build(&config).unwrap();
        assert!(services.search.is_remote_enabled());
        assert!(services.pipeline.is_ready());
        assert!(services.cache.force_remote());
    }

    #[test]
    fn absurd_ttl_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.cache.ttl_hours = i64::MAX;
        assert!(Services::build(&config).is_err());
    }
}

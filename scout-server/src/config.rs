use scout_agi::CompetitorSearch;
use scout_analysis::LivePipeline;
use scout_cache::ResultCache;
use std::{sync::Arc, time::Duration};

/// Security configuration for the HTTP API.
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Allowed origins for CORS (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
    /// Request timeout. Live analysis can take minutes, so the default is generous.
    pub request_timeout: Duration,
    /// Whether to include detailed error messages in responses (default: false)
    pub expose_error_details: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_body_size: 1024 * 1024,
            request_timeout: Duration::from_secs(300),
            expose_error_details: false,
        }
    }
}

impl SecurityConfig {
    /// Permissive CORS and detailed errors.
    pub fn development() -> Self {
        Self { expose_error_details: true, ..Self::default() }
    }

    /// Only the given origins may call the API.
    pub fn production(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins, ..Self::default() }
    }
}

/// Everything the router needs.
#[derive(Clone)]
pub struct ServerConfig {
    pub search: Arc<CompetitorSearch>,
    pub pipeline: Arc<LivePipeline>,
    /// Upper bound on `/api/test-agi`.
    pub connection_test_timeout: Duration,
    pub security: SecurityConfig,
}

impl ServerConfig {
    /// Build from a pipeline; the search service is taken from it.
    pub fn new(pipeline: Arc<LivePipeline>) -> Self {
        Self {
            search: pipeline.search().clone(),
            pipeline,
            connection_test_timeout: Duration::from_secs(90),
            security: SecurityConfig::default(),
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        self.search.cache()
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_connection_test_timeout(mut self, timeout: Duration) -> Self {
        self.connection_test_timeout = timeout;
        self
    }

    /// Configure allowed CORS origins
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.security.allowed_origins = origins;
        self
    }

    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.security.max_body_size = size;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.security.request_timeout = timeout;
        self
    }

    /// Enable detailed error messages (for development only)
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.security.expose_error_details = expose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pipeline(dir: &TempDir) -> Arc<LivePipeline> {
        let cache = Arc::new(ResultCache::open(dir.path().join("cache.json")));
        Arc::new(LivePipeline::new(Arc::new(CompetitorSearch::synthetic_only(cache))))
    }

    #[test]
    fn test_security_config_constructors() {
        let default = SecurityConfig::default();
        assert!(default.allowed_origins.is_empty());
        assert_eq!(default.max_body_size, 1024 * 1024);
        assert_eq!(default.request_timeout, Duration::from_secs(300));
        assert!(!default.expose_error_details);

        assert!(SecurityConfig::development().expose_error_details);

        let prod = SecurityConfig::production(vec!["https://example.com".to_string()]);
        assert_eq!(prod.allowed_origins, vec!["https://example.com"]);
        assert!(!prod.expose_error_details);
    }

    #[test]
    fn test_server_config_builder() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig::new(pipeline(&dir))
            .with_allowed_origins(vec!["test".into()])
            .with_max_body_size(100)
            .with_request_timeout(Duration::from_secs(10))
            .with_connection_test_timeout(Duration::from_secs(5))
            .with_error_details(true);

        assert_eq!(config.security.allowed_origins, vec!["test"]);
        assert_eq!(config.security.max_body_size, 100);
        assert_eq!(config.security.request_timeout, Duration::from_secs(10));
        assert_eq!(config.connection_test_timeout, Duration::from_secs(5));
        assert!(config.security.expose_error_details);
        assert!(config.cache().is_empty());
    }
}

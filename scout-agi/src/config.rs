//! Configuration for the remote agent API, the session pool and polling.

use scout_core::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.agi.tech/v1";

/// Connection settings for the remote agent API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgiConfig {
    /// Bearer token.
    pub api_key: String,

    /// API base URL, without trailing slash.
    pub base_url: String,

    /// Agent to run inside new sessions.
    pub agent_name: String,

    /// Timeout for session creation in seconds
    pub create_timeout_secs: u64,

    /// Timeout for sending an instruction in seconds
    pub message_timeout_secs: u64,

    /// Timeout for a single status check in seconds
    pub status_timeout_secs: u64,

    /// Timeout for fetching the transcript in seconds
    pub messages_timeout_secs: u64,

    /// Timeout for session deletion in seconds
    pub delete_timeout_secs: u64,
}

impl Default for AgiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            agent_name: "agi-0".to_string(),
            create_timeout_secs: 30,
            message_timeout_secs: 30,
            status_timeout_secs: 10,
            messages_timeout_secs: 30,
            delete_timeout_secs: 10,
        }
    }
}

impl AgiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), ..Default::default() }
    }

    /// Read `AGI_API_KEY` (required) and `AGI_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("AGI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ScoutError::Config("AGI_API_KEY environment variable is required".to_string())
            })?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("AGI_BASE_URL") {
            config = config.base_url(base_url);
        }
        Ok(config)
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn status_timeout(mut self, secs: u64) -> Self {
        self.status_timeout_secs = secs;
        self
    }
}

/// Sizing and timing of the session pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Hard cap on sessions, including creations in flight.
    pub max_pool_size: usize,
    /// Soft target; above it the oldest idle session is evicted.
    pub target_size: usize,
    /// Idle sessions older than this are deleted on the next acquire.
    pub session_ttl: Duration,
    /// Re-check interval while waiting for a free session.
    pub wait_interval: Duration,
    /// Total time an acquire may wait before failing.
    pub wait_budget: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_pool_size: 3,
            target_size: 2,
            session_ttl: Duration::from_secs(25 * 60),
            wait_interval: Duration::from_secs(2),
            wait_budget: Duration::from_secs(60),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_pool_size(mut self, size: usize) -> Self {
        self.max_pool_size = size;
        self
    }

    pub fn target_size(mut self, size: usize) -> Self {
        self.target_size = size;
        self
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn wait(mut self, interval: Duration, budget: Duration) -> Self {
        self.wait_interval = interval;
        self.wait_budget = budget;
        self
    }
}

/// Status polling schedule for one search.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(3), max_attempts: 5 }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }

    /// Upper bound on time spent polling.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

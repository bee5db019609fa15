//! Layered configuration: defaults, then an optional TOML file, then the
//! environment.

use anyhow::{Context, Result};
use scout_agi::{AgiConfig, PollConfig, PoolConfig};
use scout_cache::{DEFAULT_CACHE_FILE, DEFAULT_TTL_HOURS};
use scout_model::OpenAIConfig;
use scout_server::SecurityConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub server: ServerSection,
    pub cache: CacheSection,
    pub agi: AgiSection,
    pub pool: PoolSection,
    pub openai: OpenAISection,
    pub telemetry: TelemetrySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub expose_error_details: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origins: Vec::new(),
            request_timeout_secs: 300,
            expose_error_details: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub path: PathBuf,
    pub ttl_hours: i64,
    /// Skip cache hits and always ask the agent.
    pub force_remote: bool,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_CACHE_FILE), ttl_hours: DEFAULT_TTL_HOURS, force_remote: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgiSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub agent_name: Option<String>,
    pub poll_interval_secs: u64,
    pub poll_max_attempts: u32,
}

impl Default for AgiSection {
    fn default() -> Self {
        let poll = PollConfig::default();
        Self {
            api_key: None,
            base_url: None,
            agent_name: None,
            poll_interval_secs: poll.interval.as_secs(),
            poll_max_attempts: poll.max_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSection {
    pub max_size: usize,
    pub target_size: usize,
    pub session_ttl_secs: u64,
    pub wait_interval_secs: u64,
    pub wait_budget_secs: u64,
}

impl Default for PoolSection {
    fn default() -> Self {
        let pool = PoolConfig::default();
        Self {
            max_size: pool.max_pool_size,
            target_size: pool.target_size,
            session_ttl_secs: pool.session_ttl.as_secs(),
            wait_interval_secs: pool.wait_interval.as_secs(),
            wait_budget_secs: pool.wait_budget.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySection {
    pub log_format: String,
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self { log_format: "text".to_string(), otlp_endpoint: None }
    }
}

impl ScoutConfig {
    /// Defaults, overlaid by `path` when given, overlaid by the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = var("AGI_API_KEY") {
            self.agi.api_key = Some(key);
        }
        if let Some(url) = var("AGI_BASE_URL") {
            self.agi.base_url = Some(url);
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.openai.model = Some(model);
        }
        if let Some(path) = var("SCOUT_CACHE_PATH") {
            self.cache.path = PathBuf::from(path);
        }
        if let Some(port) = var("SCOUT_PORT") {
            self.server.port =
                port.parse().with_context(|| format!("SCOUT_PORT is not a valid port: {port}"))?;
        }
        Ok(())
    }

    /// `None` when no agent API key is configured.
    pub fn agi_config(&self) -> Option<AgiConfig> {
        let api_key = self.agi.api_key.as_deref().filter(|k| !k.is_empty())?;
        let mut config = AgiConfig::new(api_key);
        if let Some(url) = &self.agi.base_url {
            config = config.base_url(url.clone());
        }
        if let Some(name) = &self.agi.agent_name {
            config = config.agent_name(name.clone());
        }
        Some(config)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new(Duration::from_secs(self.agi.poll_interval_secs), self.agi.poll_max_attempts)
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_pool_size(self.pool.max_size)
            .target_size(self.pool.target_size)
            .session_ttl(Duration::from_secs(self.pool.session_ttl_secs))
            .wait(
                Duration::from_secs(self.pool.wait_interval_secs),
                Duration::from_secs(self.pool.wait_budget_secs),
            )
    }

    /// `None` when no OpenAI key is configured.
    pub fn openai_config(&self) -> Option<OpenAIConfig> {
        let api_key = self.openai.api_key.as_deref().filter(|k| !k.is_empty())?;
        let mut config = OpenAIConfig { api_key: api_key.to_string(), ..Default::default() };
        if let Some(model) = &self.openai.model {
            config.model = model.clone();
        }
        if let Some(url) = &self.openai.base_url {
            config = config.with_base_url(url.clone());
        }
        Some(config)
    }

    pub fn security_config(&self) -> SecurityConfig {
        SecurityConfig {
            allowed_origins: self.server.allowed_origins.clone(),
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            expose_error_details: self.server.expose_error_details,
            ..SecurityConfig::default()
        }
    }
}

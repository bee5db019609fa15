//! # scout-agi
//!
//! Client for the remote browser-agent API used to find competitors.
//!
//! ## Overview
//!
//! - [`AgentApi`] / [`AgiClient`] - Session, message, status and transcript calls
//! - [`SessionPool`] - Reuses a handful of remote sessions under a hard cap
//! - [`SearchClient`] - Instruction, polling state machine, result extraction
//! - [`CompetitorSearch`] - Cache-first searches with synthetic fallbacks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scout_agi::{AgiClient, AgiConfig, CompetitorSearch, PoolConfig, SearchClient, SessionPool};
//! use scout_cache::ResultCache;
//! use std::sync::Arc;
//!
//! let api = Arc::new(AgiClient::new(AgiConfig::from_env()?)?);
//! let pool = Arc::new(SessionPool::new(api, PoolConfig::default()));
//! let cache = Arc::new(ResultCache::open("agi-cache.json"));
//! let search = CompetitorSearch::new(cache, SearchClient::new(pool));
//!
//! let hits = search.search_product_hunt("ai fitness coach").await?;
//! ```

pub mod client;
pub mod config;
pub mod extract;
pub mod pool;
pub mod search;
pub mod service;
pub mod synthetic;

pub use client::{AgentApi, AgentMessage, AgiClient, SessionStatus, TaskStatus};
pub use config::{AgiConfig, PollConfig, PoolConfig, DEFAULT_BASE_URL};
pub use extract::{Extraction, extract_from_messages, extract_results};
pub use pool::{PoolStatus, SessionLease, SessionPool};
pub use search::{PollState, SearchClient, instruction};
pub use service::{COST_EFFECTIVE_LIMIT, CompetitorSearch};

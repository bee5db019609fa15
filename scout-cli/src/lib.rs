//! # scout-cli
//!
//! Command-line launcher for idea-scout.
//!
//! ## Commands
//!
//! - `serve` - HTTP API server
//! - `warmup` - pre-populate the result cache
//! - `cache stats|clear|export` - inspect the result cache
//! - `test-agi` - check the agent API connection
//!
//! Configuration is layered: built-in defaults, then an optional TOML file
//! (`--config`), then environment variables (a `.env` file is read first).
//!
//! ```rust,no_run
//! use scout_cli::{ScoutConfig, Services};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ScoutConfig::load(None)?;
//! let services = Services::build(&config)?;
//! println!("{}", serde_json::to_string(&services.cache.stats())?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod serve;
pub mod services;

pub use config::ScoutConfig;
pub use services::Services;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "idea-scout")]
#[command(version, about = "Competitive analysis for startup ideas", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format (text or json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Server port (overrides SCOUT_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Cache file (overrides SCOUT_CACHE_PATH)
        #[arg(long)]
        cache_path: Option<PathBuf>,
    },

    /// Pre-populate the result cache with cost-effective searches
    Warmup {
        /// Queries to search (defaults to a small built-in set)
        queries: Vec<String>,
    },

    /// Inspect or manage the result cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Check that the AGI agent API is reachable
    TestAgi,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Count valid entries by source
    Stats,
    /// Remove every entry and the cache file
    Clear,
    /// Print the whole cache as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

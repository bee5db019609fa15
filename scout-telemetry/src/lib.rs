//! # scout-telemetry
//!
//! Structured logging and distributed tracing for idea-scout.
//!
//! ## Features
//! - Structured logging with `tracing`
//! - Optional OTLP span export
//! - Span helpers for searches, pool operations and model calls
//!
//! ## Usage
//!
//! ```rust
//! use scout_telemetry::{init_telemetry, info, LogFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("idea-scout", LogFormat::Text).map_err(|e| e as Box<dyn std::error::Error>)?;
//!     info!("ready");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, trace, warn, Instrument, Span};

pub use init::{init_telemetry, init_with_otlp, shutdown_telemetry, LogFormat};
pub use spans::*;

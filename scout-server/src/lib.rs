//! # scout-server
//!
//! axum router exposing idea analysis over HTTP.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /health` | Liveness |
//! | `GET/POST /api/analyze` | Status payload / canned analysis |
//! | `POST /api/analyze/live` | Searches, templater and advisors |
//! | `GET /api/test-agi` | Agent connectivity probe |
//! | `GET /api/cache/stats`, `DELETE /api/cache` | Result cache |
//! | `GET /api/pool` | Session pool occupancy |

pub mod config;
pub mod rest;

pub use config::{SecurityConfig, ServerConfig};
pub use rest::create_app;

//! # scout-core
//!
//! Core types shared by every idea-scout crate.
//!
//! ## Overview
//!
//! - [`ScoutError`] / [`Result`] - Unified error handling
//! - [`SearchType`], [`ResultSource`], [`SearchResultRecord`], [`Competitor`] - Search records
//! - [`ChatModel`] - The seam between analysis code and chat-completion backends
//!
//! ## Quick Start
//!
//! ```rust
//! use scout_core::{SearchResultRecord, SearchType};
//!
//! let record = SearchResultRecord::new("Fitbod", "https://fitbod.me", "Workout planner");
//! assert_eq!(SearchType::ProductHunt.as_str(), "producthunt");
//! assert_eq!(record.upvotes, None);
//! ```

pub mod error;
pub mod model;
pub mod types;

pub use error::{Result, ScoutError};
pub use model::{ChatMessage, ChatModel, ChatRequest, ChatResponse, Role};
pub use types::{Competitor, ResultSource, SearchResultRecord, SearchType};

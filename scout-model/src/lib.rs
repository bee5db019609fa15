//! # scout-model
//!
//! Chat-completion backends for idea-scout.
//!
//! ## Overview
//!
//! - [`openai::OpenAIClient`] - OpenAI `/chat/completions` over reqwest
//! - [`MockChatModel`] - Scripted responses for tests
//! - [`retry`] - Bounded exponential backoff with per-attempt timeouts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scout_core::{ChatMessage, ChatModel, ChatRequest};
//! use scout_model::openai::OpenAIClient;
//!
//! let model = OpenAIClient::from_env()?;
//! let reply = model
//!     .complete(ChatRequest::new(vec![ChatMessage::user("Hello")]).json_object())
//!     .await?;
//! ```

pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod retry;

pub use mock::MockChatModel;
#[cfg(feature = "openai")]
pub use openai::{OpenAIClient, OpenAIConfig};
pub use retry::RetryConfig;

//! OpenAI provider.

mod client;
mod config;

pub use client::OpenAIClient;
pub use config::{DEFAULT_OPENAI_BASE_URL, OpenAIConfig};

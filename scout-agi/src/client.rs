//! HTTP client for the remote agent-session API.

use crate::config::AgiConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use scout_core::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

/// Operations on remote agent sessions.
///
/// [`AgiClient`] talks HTTP; tests substitute in-memory fakes.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Create a session and return its id.
    async fn create_session(&self) -> Result<String>;

    /// Send one instruction to the agent running in the session.
    async fn send_message(&self, session_id: &str, message: &str) -> Result<()>;

    /// Current task status of the session.
    async fn status(&self, session_id: &str) -> Result<SessionStatus>;

    /// The session transcript.
    async fn messages(&self, session_id: &str) -> Result<Vec<AgentMessage>>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;
}

/// Task state reported by `GET /sessions/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TaskStatus {
    Running,
    Finished,
    Error,
    Other(String),
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "running" => TaskStatus::Running,
            "finished" => TaskStatus::Finished,
            "error" => TaskStatus::Error,
            _ => TaskStatus::Other(value),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub status: TaskStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl SessionStatus {
    pub fn new(status: TaskStatus) -> Self {
        Self { status, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { status: TaskStatus::Error, error: Some(message.into()) }
    }
}

/// One transcript entry. `content` is either a string or structured JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Value,
}

impl AgentMessage {
    pub fn new(kind: impl Into<String>, content: Value) -> Self {
        Self { kind: kind.into(), content }
    }

    /// Message kinds that may carry the agent's answer.
    pub fn carries_result(&self) -> bool {
        matches!(self.kind.as_str(), "DONE" | "result" | "assistant")
    }
}

#[derive(Deserialize)]
struct CreateSessionResponse {
    session_id: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<AgentMessage>,
}

/// reqwest implementation of [`AgentApi`].
///
/// # Example
///
/// ```rust,ignore
/// use scout_agi::{AgiClient, AgiConfig};
///
/// let client = AgiClient::new(AgiConfig::from_env()?)?;
/// let session_id = client.create_session().await?;
/// ```
pub struct AgiClient {
    client: Client,
    config: AgiConfig,
}

impl AgiClient {
    pub fn new(config: AgiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ScoutError::Config("AGI API key is empty".to_string()));
        }
        let client = Client::builder()
            .build()
            .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AgiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder, timeout_secs: u64) -> RequestBuilder {
        builder.bearer_auth(&self.config.api_key).timeout(Duration::from_secs(timeout_secs))
    }
}

async fn dispatch(builder: RequestBuilder, context: &str) -> Result<Response> {
    let response = builder.send().await.map_err(|e| ScoutError::Transport {
        message: format!("{context}: {e}"),
        timeout: e.is_timeout(),
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ScoutError::Remote {
        status: status.as_u16(),
        message: format!(
            "{context}: {} {}",
            status.canonical_reason().unwrap_or("Unknown"),
            body.trim()
        )
        .trim_end()
        .to_string(),
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        ScoutError::MalformedResponse(format!("{context}: could not decode body: {e}"))
    })
}

fn is_rate_limited(status: u16, message: &str) -> bool {
    status == StatusCode::SERVICE_UNAVAILABLE.as_u16()
        && message.to_ascii_lowercase().contains("rate limit exceeded")
}

#[async_trait]
impl AgentApi for AgiClient {
    async fn create_session(&self) -> Result<String> {
        tracing::debug!(agent = %self.config.agent_name, "Creating AGI session");
        let request = self.authorized(
            self.client
                .post(self.url("/sessions"))
                .json(&json!({ "agent_name": self.config.agent_name })),
            self.config.create_timeout_secs,
        );

        let response = match dispatch(request, "AGI session creation failed").await {
            Ok(response) => response,
            Err(ScoutError::Remote { status, message }) if is_rate_limited(status, &message) => {
                return Err(ScoutError::SessionLimit);
            }
            Err(e) => return Err(e),
        };

        let body: CreateSessionResponse = decode(response, "AGI session creation").await?;
        body.session_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            ScoutError::MalformedResponse("AGI API returned null session_id".to_string())
        })
    }

    async fn send_message(&self, session_id: &str, message: &str) -> Result<()> {
        let request = self.authorized(
            self.client
                .post(self.url(&format!("/sessions/{session_id}/message")))
                .json(&json!({ "message": message })),
            self.config.message_timeout_secs,
        );
        dispatch(request, "Failed to send message to AGI agent").await?;
        Ok(())
    }

    async fn status(&self, session_id: &str) -> Result<SessionStatus> {
        let request = self.authorized(
            self.client.get(self.url(&format!("/sessions/{session_id}/status"))),
            self.config.status_timeout_secs,
        );
        let response = dispatch(request, "AGI status check failed").await?;
        decode(response, "AGI status check").await
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<AgentMessage>> {
        let request = self.authorized(
            self.client.get(self.url(&format!("/sessions/{session_id}/messages"))),
            self.config.messages_timeout_secs,
        );
        let response = dispatch(request, "AGI transcript fetch failed").await?;
        let body: MessagesResponse = decode(response, "AGI transcript fetch").await?;
        Ok(body.messages)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let request = self.authorized(
            self.client.delete(self.url(&format!("/sessions/{session_id}"))),
            self.config.delete_timeout_secs,
        );
        dispatch(request, "AGI session deletion failed").await?;
        Ok(())
    }
}

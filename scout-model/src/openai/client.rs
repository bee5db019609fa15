//! OpenAI chat-completions client.

use super::config::OpenAIConfig;
use crate::retry::{RetryConfig, execute_with_retry, is_retryable_model_error};
use async_trait::async_trait;
use reqwest::Client;
use scout_core::{ChatModel, ChatRequest, ChatResponse, Result, ScoutError};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::Instrument;

/// OpenAI client speaking the `/chat/completions` REST API.
///
/// HTTP-level retries are off by default; callers that need an application
/// level retry (such as the advisor generator) run their own loop.
///
/// # Example
///
/// ```rust,ignore
/// use scout_model::openai::{OpenAIClient, OpenAIConfig};
///
/// let client = OpenAIClient::new(OpenAIConfig::from_env()?)?;
/// ```
pub struct OpenAIClient {
    client: Client,
    config: OpenAIConfig,
    retry_config: RetryConfig,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAIClient {
    /// Create a new client. An empty API key is rejected up front.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ScoutError::Config("OPENAI_API_KEY environment variable is not set".into()));
        }
        let client = Client::builder()
            .build()
            .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config, retry_config: RetryConfig::disabled() })
    }

    /// Create a client from `OPENAI_API_KEY` / `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint())
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let mut body = json!({
            "model": model,
            "messages": request.messages,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if request.json_object {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl ChatModel for OpenAIClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_body(&request);
        let api_url = self.api_url();
        let span = scout_telemetry::model_call_span(
            request.model.as_deref().unwrap_or(&self.config.model),
        );

        let response = execute_with_retry(&self.retry_config, is_retryable_model_error, || {
            let mut builder = self.client.post(&api_url).bearer_auth(&self.config.api_key).json(&body);
            if let Some(org) = &self.config.organization_id {
                builder = builder.header("OpenAI-Organization", org);
            }
            async move {
                let resp = builder.send().await.map_err(|e| ScoutError::Transport {
                    message: format!("OpenAI request failed: {e}"),
                    timeout: e.is_timeout(),
                })?;

                if !resp.status().is_success() {
                    let status = resp.status();
                    let error_text = resp.text().await.unwrap_or_default();
                    return Err(ScoutError::Remote {
                        status: status.as_u16(),
                        message: format!("OpenAI error: {error_text}"),
                    });
                }

                resp.json::<CompletionResponse>().await.map_err(|e| {
                    ScoutError::MalformedResponse(format!("OpenAI response body: {e}"))
                })
            }
        })
        .instrument(span)
        .await?;

        let choice = response.choices.into_iter().next();
        let finish_reason = choice.as_ref().and_then(|c| c.finish_reason.clone());
        let content = choice.and_then(|c| c.message).and_then(|m| m.content);
        tracing::debug!(
            has_content = content.is_some(),
            finish_reason = finish_reason.as_deref().unwrap_or("none"),
            "Chat completion received"
        );

        Ok(ChatResponse { content, finish_reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::ChatMessage;

    #[test]
    fn body_carries_json_mode_and_sampling() {
        let client = OpenAIClient::new(OpenAIConfig::new("k", "gpt-4o-mini")).unwrap();
        let request = ChatRequest::new(vec![ChatMessage::system("s"), ChatMessage::user("u")])
            .with_temperature(0.7)
            .with_max_tokens(400)
            .json_object();

        let body = client.build_body(&request);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 400);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn request_model_overrides_default() {
        let client = OpenAIClient::new(OpenAIConfig::new("k", "gpt-4o-mini")).unwrap();
        let body = client.build_body(&ChatRequest::new(vec![]).with_model("gpt-4"));
        assert_eq!(body["model"], "gpt-4");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            OpenAIClient::new(OpenAIConfig::new("", "gpt-4o-mini")),
            Err(ScoutError::Config(_))
        ));
    }
}

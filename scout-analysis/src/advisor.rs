//! Two advisor personalities, an optimist and a realist, written by a chat
//! model.

use scout_core::{ChatMessage, ChatModel, ChatRequest, Competitor, Result, ScoutError};
use scout_model::retry::{RetryConfig, always_retry, execute_with_retry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = r#"You are two AI business advisors analyzing a startup idea.

Advisor 1 (Optimist): You find opportunities and suggest pivots. Be encouraging but realistic. Focus on gaps in the market.

Advisor 2 (Realist): You point out challenges honestly. Be measured and analytical. Focus on real obstacles.

CRITICAL: Return ONLY a valid JSON object with EXACTLY these two fields:
{
  "optimist": "your optimistic response here (100-150 words)",
  "realist": "your realistic response here (100-150 words)"
}

Requirements:
- Both fields must be present and non-empty
- Each response should be 100-150 words
- NO markdown formatting, NO code blocks, NO explanations
- Return ONLY the JSON object, nothing else"#;

const MISSING_FIELDS: &str = "Invalid response format: missing optimist or realist fields";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorResponses {
    pub optimist: String,
    pub realist: String,
}

#[derive(Deserialize)]
struct RawResponses {
    optimist: Option<String>,
    realist: Option<String>,
}

pub fn user_prompt(idea: &str, total_competitors: usize, top_competitors: &[Competitor]) -> String {
    let names = top_competitors.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ");
    let names = if names.is_empty() { "None found".to_string() } else { names };
    format!(
        "Idea: {idea}\n\nNumber of competitors found: {total_competitors}\n\nTop competitors: {names}"
    )
}

/// Parse the model's reply, tolerating a surrounding markdown fence.
pub fn parse_responses(content: &str) -> Result<AdvisorResponses> {
    let cleaned = strip_fence(content.trim());
    let raw: RawResponses = serde_json::from_str(cleaned).map_err(|e| {
        ScoutError::MalformedResponse(format!("Failed to parse JSON response: {e}"))
    })?;

    match (raw.optimist, raw.realist) {
        (Some(optimist), Some(realist))
            if !optimist.trim().is_empty() && !realist.trim().is_empty() =>
        {
            Ok(AdvisorResponses { optimist, realist })
        }
        _ => Err(ScoutError::MalformedResponse(MISSING_FIELDS.to_string())),
    }
}

fn strip_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Generates advisor texts with a bounded retry: 3 attempts, 2s then 4s
/// between them, 60s per attempt.
pub struct AdvisorGenerator {
    model: Arc<dyn ChatModel>,
    retry_config: RetryConfig,
}

impl AdvisorGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model, retry_config: RetryConfig::default() }
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn generate(
        &self,
        idea: &str,
        total_competitors: usize,
        top_competitors: &[Competitor],
    ) -> Result<AdvisorResponses> {
        tracing::info!(
            idea,
            total_competitors,
            top = top_competitors.len(),
            "Generating advisor responses"
        );
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt(idea, total_competitors, top_competitors)),
        ])
        .with_temperature(0.7)
        .with_max_tokens(400)
        .json_object();

        let result = execute_with_retry(&self.retry_config, always_retry, || {
            let request = request.clone();
            async move {
                let response = self.model.complete(request).await?;
                let content = response.content.filter(|c| !c.trim().is_empty()).ok_or_else(|| {
                    ScoutError::Model("No response content received from model".to_string())
                })?;
                parse_responses(&content)
            }
        })
        .await;

        match &result {
            Ok(_) => tracing::info!("Advisor responses generated"),
            Err(e) => tracing::error!(error = %e, "Advisor generation failed"),
        }
        result
    }
}

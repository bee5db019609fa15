//! One remote search cycle: claim a session, send the instruction, poll the
//! task until it settles, extract results, give the session back.

use crate::config::PollConfig;
use crate::extract::{Extraction, extract_from_messages};
use crate::pool::SessionPool;
use crate::client::TaskStatus;
use scout_core::{Result, ScoutError, SearchResultRecord, SearchType};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Where a search cycle stands.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// Instruction delivered, no status checked yet.
    Sent,
    Polling { attempt: u32 },
    Finished(Vec<Value>),
    Failed(String),
    TimedOut,
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Sent | PollState::Polling { .. })
    }

    fn attempts(&self) -> u32 {
        match self {
            PollState::Polling { attempt } => *attempt,
            _ => 0,
        }
    }
}

/// Instruction text sent to the agent for a search.
pub fn instruction(search_type: SearchType, query: &str) -> String {
    match search_type {
        SearchType::ProductHunt => format!(
            "Search Product Hunt for innovative products and startups related to \"{query}\". Focus on:
1. Recently launched products (past 6 months)
2. Products with significant user engagement (upvotes, comments)
3. Tools that solve real problems in this domain
4. Both direct competitors and adjacent solutions

Return a JSON array with the top 5 most relevant results, each containing:
- name: Product name as shown on Product Hunt
- url: Direct Product Hunt URL
- description: Clear description of what the product does
- upvotes: Number of upvotes (if available)

Format: [{{\"name\": \"...\", \"url\": \"...\", \"description\": \"...\", \"upvotes\": ...}}]"
        ),
        SearchType::Google => format!(
            "Search Google for comprehensive information about \"{query}\" startups, competitors, and market landscape. Focus on:
1. Established companies and startups in this space
2. Recent market reports and analysis
3. Technology solutions and alternatives
4. Industry trends and innovations

Return a JSON array with the top 5 most relevant results, each containing:
- name: Company/product name
- url: Direct URL to the source
- description: Brief summary of their relevance to \"{query}\"

Format: [{{\"name\": \"...\", \"url\": \"...\", \"description\": \"...\"}}]"
        ),
        SearchType::CostEffective => format!(
            "Search Google for: \"{query} startup\".
Return the first 5 results only. Do not visit any websites. Return results immediately as JSON.
Format as JSON array with exactly this structure: [{{\"name\": \"...\", \"url\": \"...\", \"description\": \"...\"}}]"
        ),
    }
}

/// Runs searches on pooled agent sessions.
pub struct SearchClient {
    pool: Arc<SessionPool>,
    poll: PollConfig,
}

impl SearchClient {
    pub fn new(pool: Arc<SessionPool>) -> Self {
        Self { pool, poll: PollConfig::default() }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn pool(&self) -> &Arc<SessionPool> {
        &self.pool
    }

    pub async fn search(
        &self,
        search_type: SearchType,
        query: &str,
    ) -> Result<Vec<SearchResultRecord>> {
        self.search_with_cancel(search_type, query, &CancellationToken::new()).await
    }

    /// Run one search cycle. A timed-out task yields an empty list; a failed
    /// task or a cancelled token is an error.
    pub async fn search_with_cancel(
        &self,
        search_type: SearchType,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResultRecord>> {
        let span = scout_telemetry::search_span(search_type.as_str(), query);
        async {
            let raw = self.run(search_type, query, cancel).await?;
            Ok(raw.iter().map(SearchResultRecord::from_value).collect())
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        search_type: SearchType,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Value>> {
        let task = format!("{search_type}_search");
        let lease = tokio::select! {
            _ = cancel.cancelled() => return Err(ScoutError::Cancelled),
            lease = self.pool.lease(&task) => lease?,
        };
        scout_telemetry::record_session_id(lease.id());

        let status = self.pool.status();
        tracing::info!(
            total = status.total,
            active = status.active,
            available = status.available,
            "Session pool status"
        );

        let message = instruction(search_type, query);
        tokio::select! {
            _ = cancel.cancelled() => return Err(ScoutError::Cancelled),
            sent = self.pool.api().send_message(lease.id(), &message) => sent?,
        }
        tracing::info!(
            max_attempts = self.poll.max_attempts,
            interval_secs = self.poll.interval.as_secs(),
            "Instruction sent, polling"
        );

        let mut state = PollState::Sent;
        loop {
            state = match state {
                PollState::Finished(items) => {
                    if items.is_empty() {
                        tracing::warn!("Task finished but no results were extracted");
                    } else {
                        tracing::info!(count = items.len(), "Extracted results");
                    }
                    return Ok(items);
                }
                PollState::Failed(message) => {
                    tracing::error!(error = %message, "Agent task failed");
                    return Err(ScoutError::AgentTask(message));
                }
                PollState::TimedOut => {
                    tracing::warn!(
                        attempts = self.poll.max_attempts,
                        "Polling timed out, returning empty results"
                    );
                    return Ok(Vec::new());
                }
                PollState::Cancelled => return Err(ScoutError::Cancelled),
                pending if pending.attempts() >= self.poll.max_attempts => PollState::TimedOut,
                pending => {
                    let attempt = pending.attempts() + 1;
                    tokio::select! {
                        _ = cancel.cancelled() => PollState::Cancelled,
                        next = self.poll_once(lease.id(), attempt) => next,
                    }
                }
            };
        }
    }

    /// Sleep one interval, then check status. Transport trouble keeps polling.
    async fn poll_once(&self, session_id: &str, attempt: u32) -> PollState {
        tokio::time::sleep(self.poll.interval).await;
        let api = self.pool.api();

        let status = match api.status(session_id).await {
            Ok(status) => status,
            Err(e) if e.is_timeout() => {
                tracing::warn!(attempt, "Status check timed out");
                return PollState::Polling { attempt };
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Status check failed");
                return PollState::Polling { attempt };
            }
        };
        tracing::debug!(attempt, max = self.poll.max_attempts, status = ?status.status, "Polled");

        match status.status {
            TaskStatus::Finished => match api.messages(session_id).await {
                Ok(messages) => {
                    tracing::info!(count = messages.len(), "Task finished, extracting results");
                    match extract_from_messages(&messages) {
                        Extraction::Parsed(items) => PollState::Finished(items),
                        Extraction::NotFound => PollState::Finished(Vec::new()),
                    }
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Transcript fetch failed");
                    PollState::Polling { attempt }
                }
            },
            TaskStatus::Error => {
                PollState::Failed(status.error.unwrap_or_else(|| "Unknown error".to_string()))
            }
            TaskStatus::Running | TaskStatus::Other(_) => PollState::Polling { attempt },
        }
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use scout_agi::{AgentApi, AgentMessage, SessionStatus, TaskStatus};
use scout_core::{Result, ScoutError};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory agent API with scripted responses.
#[derive(Default)]
pub struct FakeAgentApi {
    next_id: AtomicUsize,
    create_delay: Duration,
    delete_delay: Duration,
    create_errors: Mutex<VecDeque<ScoutError>>,
    send_errors: Mutex<VecDeque<ScoutError>>,
    statuses: Mutex<VecDeque<Result<SessionStatus>>>,
    messages: Mutex<Vec<AgentMessage>>,
    pub sent: Mutex<Vec<(String, String)>>,
    pub deleted: Mutex<Vec<String>>,
    pub status_calls: AtomicUsize,
}

impl FakeAgentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = delay;
        self
    }

    pub fn fail_next_create(&self, error: ScoutError) {
        self.create_errors.lock().unwrap().push_back(error);
    }

    pub fn fail_next_send(&self, error: ScoutError) {
        self.send_errors.lock().unwrap().push_back(error);
    }

    /// Queue status responses; once drained every check reports `running`.
    pub fn push_status(&self, status: Result<SessionStatus>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn set_messages(&self, messages: Vec<AgentMessage>) {
        *self.messages.lock().unwrap() = messages;
    }

    pub fn created(&self) -> usize {
        self.next_id.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentApi for FakeAgentApi {
    async fn create_session(&self) -> Result<String> {
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }
        if let Some(error) = self.create_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("session-{n}"))
    }

    async fn send_message(&self, session_id: &str, message: &str) -> Result<()> {
        if let Some(error) = self.send_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.sent.lock().unwrap().push((session_id.to_string(), message.to_string()));
        Ok(())
    }

    async fn status(&self, _session_id: &str) -> Result<SessionStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SessionStatus::new(TaskStatus::Running)))
    }

    async fn messages(&self, _session_id: &str) -> Result<Vec<AgentMessage>> {
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        if !self.delete_delay.is_zero() {
            tokio::time::sleep(self.delete_delay).await;
        }
        self.deleted.lock().unwrap().push(session_id.to_string());
        Ok(())
    }
}

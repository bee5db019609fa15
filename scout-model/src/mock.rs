use async_trait::async_trait;
use scout_core::{ChatModel, ChatRequest, ChatResponse, Result, ScoutError};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

enum Scripted {
    Reply(ChatResponse),
    Fail(String),
    Hang(Duration),
}

/// Chat model that replays queued outcomes in order.
///
/// Once the queue is drained every call fails with a model error.
pub struct MockChatModel {
    name: String,
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Scripted::Reply(ChatResponse::text(content)))
    }

    /// Reply with no content at all.
    pub fn with_empty_response(self) -> Self {
        self.push(Scripted::Reply(ChatResponse::default()))
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Fail(message.into()))
    }

    /// Sleep before answering with the next scripted outcome.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.push(Scripted::Hang(delay))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    fn push(self, item: Scripted) -> Self {
        self.script.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push_back(item);
        self
    }

    fn next(&self) -> Option<Scripted> {
        self.script.lock().unwrap_or_else(std::sync::PoisonError::into_inner).pop_front()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: ChatRequest) -> Result<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(req);

        let mut next = self.next();
        while let Some(Scripted::Hang(delay)) = next {
            tokio::time::sleep(delay).await;
            next = self.next();
        }
        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ScoutError::Model(message)),
            Some(Scripted::Hang(_)) | None => {
                Err(ScoutError::Model("mock has no scripted response".to_string()))
            }
        }
    }
}

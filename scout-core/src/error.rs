use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote API error (status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error(
        "AGI session limit reached. Please wait for sessions to expire or check dashboard for cleanup."
    )]
    SessionLimit,

    #[error("No available session after waiting {} seconds", .0.as_secs())]
    PoolExhausted(Duration),

    #[error("AGI agent task failed: {0}")]
    AgentTask(String),

    #[error("Transport error: {message}")]
    Transport { message: String, timeout: bool },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ScoutError {
    /// Errors worth retrying inside the operation's own bounded loop.
    pub fn is_transient(&self) -> bool {
        match self {
            ScoutError::Transport { .. } => true,
            ScoutError::Remote { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ScoutError::Transport { timeout: true, .. })
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

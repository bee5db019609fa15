use axum::{Json, extract::State};
use scout_agi::{CompetitorSearch, PoolStatus};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AgiController {
    search: Arc<CompetitorSearch>,
    connection_test_timeout: Duration,
}

impl AgiController {
    pub fn new(search: Arc<CompetitorSearch>, connection_test_timeout: Duration) -> Self {
        Self { search, connection_test_timeout }
    }
}

#[derive(Serialize)]
pub struct ConnectionTestResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ActiveTask {
    pub session_id: String,
    pub task: String,
}

#[derive(Serialize)]
pub struct PoolResponse {
    pub enabled: bool,
    #[serde(flatten)]
    pub status: Option<PoolStatus>,
    pub tasks: Vec<ActiveTask>,
}

/// Probe the agent with a throwaway cost-effective search.
pub async fn test_agi(State(controller): State<AgiController>) -> Json<ConnectionTestResponse> {
    let probe = controller.search.test_connection();
    let response = match tokio::time::timeout(controller.connection_test_timeout, probe).await {
        Ok(true) => ConnectionTestResponse {
            status: "success",
            message: "AGI API is connected and working",
            connected: true,
            error: None,
        },
        Ok(false) => ConnectionTestResponse {
            status: "error",
            message: "AGI API connection failed",
            connected: false,
            error: None,
        },
        Err(_) => {
            let secs = controller.connection_test_timeout.as_secs();
            tracing::error!(timeout_secs = secs, "AGI connection test timed out");
            ConnectionTestResponse {
                status: "error",
                message: "Test failed with error",
                connected: false,
                error: Some(format!("Connection test timed out after {secs} seconds")),
            }
        }
    };
    Json(response)
}

pub async fn pool_status(State(controller): State<AgiController>) -> Json<PoolResponse> {
    let Some(pool) = controller.search.pool() else {
        return Json(PoolResponse { enabled: false, status: None, tasks: Vec::new() });
    };
    let tasks = pool
        .current_tasks()
        .into_iter()
        .map(|(session_id, task)| ActiveTask { session_id, task })
        .collect();
    Json(PoolResponse { enabled: true, status: Some(pool.status()), tasks })
}

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use scout_agi::{
    AgentApi, AgentMessage, CompetitorSearch, PoolConfig, SearchClient, SessionPool,
    SessionStatus, TaskStatus,
};
use scout_analysis::LivePipeline;
use scout_cache::ResultCache;
use scout_core::{Result, ResultSource, SearchResultRecord, SearchType};
use scout_model::MockChatModel;
use scout_server::{ServerConfig, create_app};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Agent whose tasks finish immediately with one fixed result.
#[derive(Default)]
struct QuickAgent {
    created: AtomicUsize,
}

#[async_trait]
impl AgentApi for QuickAgent {
    async fn create_session(&self) -> Result<String> {
        Ok(format!("s-{}", self.created.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn send_message(&self, _session_id: &str, _message: &str) -> Result<()> {
        Ok(())
    }

    async fn status(&self, _session_id: &str) -> Result<SessionStatus> {
        Ok(SessionStatus::new(TaskStatus::Finished))
    }

    async fn messages(&self, _session_id: &str) -> Result<Vec<AgentMessage>> {
        Ok(vec![AgentMessage::new(
            "DONE",
            json!([{"name": "Fitbod", "url": "https://fitbod.me", "description": "Workout planner"}]),
        )])
    }

    async fn delete_session(&self, _session_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Agent that never hands out a session.
struct StuckAgent;

#[async_trait]
impl AgentApi for StuckAgent {
    async fn create_session(&self) -> Result<String> {
        std::future::pending().await
    }

    async fn send_message(&self, _session_id: &str, _message: &str) -> Result<()> {
        Ok(())
    }

    async fn status(&self, _session_id: &str) -> Result<SessionStatus> {
        Ok(SessionStatus::new(TaskStatus::Running))
    }

    async fn messages(&self, _session_id: &str) -> Result<Vec<AgentMessage>> {
        Ok(Vec::new())
    }

    async fn delete_session(&self, _session_id: &str) -> Result<()> {
        Ok(())
    }
}

fn cache(dir: &TempDir) -> Arc<ResultCache> {
    Arc::new(ResultCache::open(dir.path().join("cache.json")))
}

fn synthetic_config(dir: &TempDir) -> ServerConfig {
    let search = Arc::new(CompetitorSearch::synthetic_only(cache(dir)));
    ServerConfig::new(Arc::new(LivePipeline::new(search)))
}

fn remote_search(dir: &TempDir, agent: Arc<dyn AgentApi>) -> Arc<CompetitorSearch> {
    let pool = Arc::new(SessionPool::new(agent, PoolConfig::default()));
    Arc::new(CompetitorSearch::new(cache(dir), SearchClient::new(pool)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_returns_ok_with_security_headers() {
    let dir = TempDir::new().unwrap();
    let app = create_app(synthetic_config(&dir));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn analyze_status_payload() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(create_app(synthetic_config(&dir)), get("/api/analyze")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AGI Analysis API is operational");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["version"], "2.0.1");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn canned_analysis_for_fitness_idea() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        create_app(synthetic_config(&dir)),
        post("/api/analyze", r#"{"idea": "AI fitness coach"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["analysis"]["category"], "fitness");
    assert_eq!(data["analysis"]["opportunityScore"], 6);
    assert_eq!(data["analysis"]["totalCompetitors"], 30);
    assert_eq!(data["analysis"]["topCompetitors"][0]["name"], "Freeletics");
    assert!(data.get("pivot").is_none());
    assert_eq!(data["workflow"]["step2_google"]["results"], 8);
    assert!(data["optimist"]["text"].as_str().unwrap().contains("AI fitness coach"));
}

#[tokio::test]
async fn crowded_category_includes_pivot() {
    let dir = TempDir::new().unwrap();
    let (_, body) = send(
        create_app(synthetic_config(&dir)),
        post("/api/analyze", r#"{"idea": "AI dating assistant"}"#),
    )
    .await;

    assert_eq!(body["data"]["analysis"]["opportunityScore"], 3);
    assert!(body["data"]["pivot"].as_str().unwrap().starts_with("Consider pivoting"));
}

#[tokio::test]
async fn invalid_idea_is_bad_request() {
    let dir = TempDir::new().unwrap();
    for payload in [r#"{}"#, r#"{"idea": 42}"#, r#"{"idea": ""}"#, r#"[1, 2]"#] {
        let (status, body) =
            send(create_app(synthetic_config(&dir)), post("/api/analyze", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body, json!({"success": false, "error": "Invalid idea provided"}));
    }
}

#[tokio::test]
async fn unparseable_body_is_internal_error() {
    let dir = TempDir::new().unwrap();
    let (status, body) =
        send(create_app(synthetic_config(&dir)), post("/api/analyze", "{not json")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": "Internal server error"}));

    let verbose = synthetic_config(&dir).with_error_details(true);
    let (_, body) = send(create_app(verbose), post("/api/analyze", "{not json")).await;
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn live_analysis_unavailable_without_configuration() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        create_app(synthetic_config(&dir)),
        post("/api/analyze/live", r#"{"idea": "AI fitness coach"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}

#[tokio::test(start_paused = true)]
async fn live_analysis_runs_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let model = MockChatModel::new("mock")
        .with_error("insights unavailable")
        .with_response(r#"{"optimist": "Go for it.", "realist": "Watch Fitbod."}"#);
    let pipeline =
        LivePipeline::new(remote_search(&dir, Arc::new(QuickAgent::default()))).with_model(Arc::new(model));
    let app = create_app(ServerConfig::new(Arc::new(pipeline)));

    let (status, body) =
        send(app, post("/api/analyze/live", r#"{"idea": "gym planner"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["analysis"]["totalCompetitors"], 1);
    assert_eq!(data["analysis"]["opportunityScore"], 9);
    assert_eq!(data["realist"]["text"], "Watch Fitbod.");
    assert_eq!(data["workflow"]["step1_productHunt"]["status"], "success");
    assert_eq!(data["insights"]["marketGaps"][0]["category"], "General");
}

#[tokio::test]
async fn cache_stats_and_clear() {
    let dir = TempDir::new().unwrap();
    let config = synthetic_config(&dir);
    config.cache().store(
        SearchType::Google,
        "ai coach",
        vec![SearchResultRecord::new("A", "https://a", "a")],
        ResultSource::Remote,
    );
    config.cache().store(SearchType::ProductHunt, "ai coach", Vec::new(), ResultSource::Synthetic);

    let (status, body) = send(create_app(config.clone()), get("/api/cache/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"total": 2, "agi": 1, "mock": 1}));

    let request = Request::builder().method("DELETE").uri("/api/cache").body(Body::empty()).unwrap();
    let (status, body) = send(create_app(config.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "cleared": 2}));
    assert!(config.cache().is_empty());
}

#[tokio::test]
async fn pool_disabled_without_agent() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(create_app(synthetic_config(&dir)), get("/api/pool")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"enabled": false, "tasks": []}));
}

#[tokio::test(start_paused = true)]
async fn pool_reports_idle_sessions() {
    let dir = TempDir::new().unwrap();
    let search = remote_search(&dir, Arc::new(QuickAgent::default()));
    search.search_google("gym planner").await.unwrap();
    let app = create_app(ServerConfig::new(Arc::new(LivePipeline::new(search))));

    let (_, body) = send(app, get("/api/pool")).await;
    assert_eq!(body["enabled"], true);
    assert_eq!(body["total"], 1);
    assert_eq!(body["available"], 1);
    assert_eq!(body["tasks"], json!([]));
}

#[tokio::test(start_paused = true)]
async fn test_agi_reports_connected() {
    let dir = TempDir::new().unwrap();
    let search = remote_search(&dir, Arc::new(QuickAgent::default()));
    let app = create_app(ServerConfig::new(Arc::new(LivePipeline::new(search))));

    let (status, body) = send(app, get("/api/test-agi")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "success", "message": "AGI API is connected and working", "connected": true})
    );
}

#[tokio::test]
async fn test_agi_reports_failure_without_agent() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(create_app(synthetic_config(&dir)), get("/api/test-agi")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "error", "message": "AGI API connection failed", "connected": false})
    );
}

#[tokio::test(start_paused = true)]
async fn test_agi_times_out() {
    let dir = TempDir::new().unwrap();
    let search = remote_search(&dir, Arc::new(StuckAgent));
    let config = ServerConfig::new(Arc::new(LivePipeline::new(search)))
        .with_connection_test_timeout(Duration::from_secs(5));

    let (status, body) = send(create_app(config), get("/api/test-agi")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Test failed with error");
    assert_eq!(body["connected"], false);
    assert_eq!(body["error"], "Connection test timed out after 5 seconds");
}

use async_trait::async_trait;
use scout_agi::{
    AgentApi, AgentMessage, CompetitorSearch, PoolConfig, SearchClient, SessionPool,
    SessionStatus, TaskStatus,
};
use scout_analysis::{LivePipeline, StepStatus};
use scout_cache::ResultCache;
use scout_core::{ChatModel, Result, ScoutError};
use scout_model::MockChatModel;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const ADVICE: &str = r#"{"optimist": "There is room to grow.", "realist": "Incumbents are strong."}"#;

const INSIGHTS: &str = r#"Here you go: {
  "marketGaps": [{"category": "Form", "opportunity": "Real-time correction", "reason": "Few do it"}],
  "threatAssessment": {"level": "high", "description": "Crowded", "mitigatingFactors": ["Niche focus"]},
  "positioningOpportunities": ["Injury prevention"],
  "recommendedStrategy": "Start with physiotherapists"
}"#;

/// Agent that finishes every task on the first poll. Product Hunt tasks can
/// be made to fail at send time.
#[derive(Default)]
struct InstantAgent {
    next_id: AtomicUsize,
    tasks: Mutex<HashMap<String, String>>,
    fail_product_hunt: bool,
}

#[async_trait]
impl AgentApi for InstantAgent {
    async fn create_session(&self) -> Result<String> {
        Ok(format!("s-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn send_message(&self, session_id: &str, message: &str) -> Result<()> {
        if self.fail_product_hunt && message.starts_with("Search Product Hunt") {
            return Err(ScoutError::Remote { status: 500, message: "agent crashed".into() });
        }
        self.tasks.lock().unwrap().insert(session_id.to_string(), message.to_string());
        Ok(())
    }

    async fn status(&self, _session_id: &str) -> Result<SessionStatus> {
        Ok(SessionStatus::new(TaskStatus::Finished))
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<AgentMessage>> {
        let task = self.tasks.lock().unwrap().get(session_id).cloned().unwrap_or_default();
        let results = if task.starts_with("Search Product Hunt") {
            json!([
                {"name": "Fitbod", "url": "https://fitbod.me", "description": "Workout planner", "upvotes": 300},
                {"name": "Future", "url": "https://future.co", "description": "Remote coaching"}
            ])
        } else {
            json!([
                {"name": "Fitbod (web)", "url": "https://fitbod.me", "description": "duplicate"},
                {"name": "Aaptiv", "url": "https://aaptiv.com", "description": "Audio workouts"}
            ])
        };
        Ok(vec![AgentMessage::new("DONE", json!(results.to_string()))])
    }

    async fn delete_session(&self, _session_id: &str) -> Result<()> {
        Ok(())
    }
}

fn remote_search(agent: InstantAgent, dir: &TempDir) -> Arc<CompetitorSearch> {
    let cache = Arc::new(ResultCache::open(dir.path().join("cache.json")));
    let pool = Arc::new(SessionPool::new(Arc::new(agent), PoolConfig::default()));
    Arc::new(CompetitorSearch::new(cache, SearchClient::new(pool)))
}

#[tokio::test]
async fn missing_model_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(ResultCache::open(dir.path().join("cache.json")));
    let pipeline = LivePipeline::new(Arc::new(CompetitorSearch::synthetic_only(cache)));

    assert!(!pipeline.is_ready());
    let err = pipeline.run("ai fitness coach", &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ScoutError::Config(_)));
}

#[tokio::test]
async fn synthetic_searches_feed_templater_and_advisors() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(ResultCache::open(dir.path().join("cache.json")));
    let model = Arc::new(MockChatModel::new("mock").with_response(INSIGHTS).with_response(ADVICE));
    let pipeline = LivePipeline::new(Arc::new(CompetitorSearch::synthetic_only(cache)))
        .with_model(model.clone() as Arc<dyn ChatModel>);

    assert!(pipeline.has_model());
    assert!(!pipeline.is_ready());

    let report = pipeline.run("AI fitness coach", &CancellationToken::new()).await.unwrap();
    assert_eq!(report.analysis.total_competitors, 10);
    assert_eq!(report.analysis.opportunity_score, 9);
    assert_eq!(report.analysis.category, "fitness");
    assert_eq!(report.analysis.top_competitors.len(), 5);
    assert!(report.pivot.is_none());
    assert_eq!(report.optimist.text, "There is room to grow.");
    assert_eq!(report.workflow.product_hunt.results, Some(5));
    assert_eq!(report.workflow.google.results, Some(5));

    let insights = report.insights.unwrap();
    assert_eq!(insights.recommended_strategy, "Start with physiotherapists");
    assert_eq!(model.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn remote_results_are_merged_and_deduplicated() {
    let dir = TempDir::new().unwrap();
    let search = remote_search(InstantAgent::default(), &dir);
    let model = Arc::new(MockChatModel::new("mock").with_error("insights down").with_response(ADVICE));
    let pipeline = LivePipeline::new(search.clone()).with_model(model);

    assert!(pipeline.is_ready());
    let report = pipeline.run("gym buddy", &CancellationToken::new()).await.unwrap();

    let names: Vec<_> =
        report.analysis.top_competitors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Fitbod", "Future", "Aaptiv"]);
    assert_eq!(report.analysis.total_competitors, 3);
    assert_eq!(report.workflow.product_hunt.results, Some(2));
    // Insight failure falls back rather than failing the run.
    assert_eq!(
        report.insights.unwrap().recommended_strategy,
        "Conduct deeper market research before proceeding"
    );
    assert_eq!(search.pool_status().unwrap().active, 0);
}

#[tokio::test(start_paused = true)]
async fn one_failed_search_is_marked_and_skipped() {
    let dir = TempDir::new().unwrap();
    let agent = InstantAgent { fail_product_hunt: true, ..Default::default() };
    let model = Arc::new(MockChatModel::new("mock").with_response(INSIGHTS).with_response(ADVICE));
    let pipeline = LivePipeline::new(remote_search(agent, &dir)).with_model(model);

    let report = pipeline.run("gym buddy", &CancellationToken::new()).await.unwrap();

    assert_eq!(report.workflow.product_hunt.status, StepStatus::Error);
    assert!(report.workflow.product_hunt.error.as_deref().unwrap().contains("agent crashed"));
    assert_eq!(report.workflow.google.status, StepStatus::Success);
    assert_eq!(report.analysis.total_competitors, 2);
}

#[tokio::test(start_paused = true)]
async fn advisor_failure_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(ResultCache::open(dir.path().join("cache.json")));
    let model = MockChatModel::new("mock")
        .with_response(INSIGHTS)
        .with_response("not json")
        .with_response("still not json")
        .with_response(r#"{"optimist": "half"}"#);
    let pipeline = LivePipeline::new(Arc::new(CompetitorSearch::synthetic_only(cache)))
        .with_model(Arc::new(model));

    let err = pipeline.run("anything", &CancellationToken::new()).await.unwrap_err();
    assert!(err.to_string().contains("missing optimist or realist fields"));
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let search = remote_search(InstantAgent::default(), &dir);
    let model = Arc::new(MockChatModel::new("mock").with_response(ADVICE));
    let pipeline = LivePipeline::new(search.clone()).with_model(model);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = pipeline.run("gym buddy", &cancel).await.unwrap_err();
    assert!(matches!(err, ScoutError::Cancelled));
    assert_eq!(search.pool_status().unwrap().active, 0);
}

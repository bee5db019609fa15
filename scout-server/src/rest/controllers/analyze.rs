use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use scout_analysis::{AnalysisReport, LivePipeline, analyze_idea};
use scout_core::ScoutError;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const API_VERSION: &str = "2.0.1";

#[derive(Clone)]
pub struct AnalyzeController {
    pipeline: Arc<LivePipeline>,
    expose_error_details: bool,
}

impl AnalyzeController {
    pub fn new(pipeline: Arc<LivePipeline>, expose_error_details: bool) -> Self {
        Self { pipeline, expose_error_details }
    }

    /// Pull a non-empty string `idea` out of a JSON body, or build the error
    /// response. An unparseable body is a 500, a bad `idea` a 400.
    #[allow(clippy::result_large_err)]
    fn read_idea(&self, body: &[u8]) -> Result<String, Response> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(error = %e, "Unparseable analyze request");
            let mut response = AnalyzeResponse::failed("Internal server error");
            if self.expose_error_details {
                response.details = Some(e.to_string());
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        })?;

        match value.get("idea").and_then(Value::as_str) {
            Some(idea) if !idea.is_empty() => Ok(idea.to_string()),
            _ => Err((StatusCode::BAD_REQUEST, Json(AnalyzeResponse::failed("Invalid idea provided")))
                .into_response()),
        }
    }
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AnalyzeResponse {
    fn ok(report: AnalysisReport) -> Self {
        Self { success: true, data: Some(report), error: None, details: None }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()), details: None }
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

pub async fn analyze_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "AGI Analysis API is operational",
        status: "ready",
        version: API_VERSION,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Canned analysis. Never touches the network.
pub async fn analyze(State(controller): State<AnalyzeController>, body: Bytes) -> Response {
    let idea = match controller.read_idea(&body) {
        Ok(idea) => idea,
        Err(response) => return response,
    };
    let report = analyze_idea(&idea);
    tracing::info!(idea = %idea, "Canned analysis served");
    (StatusCode::OK, Json(AnalyzeResponse::ok(report))).into_response()
}

/// Full pipeline. Dropping the request cancels in-flight searches.
pub async fn analyze_live(State(controller): State<AnalyzeController>, body: Bytes) -> Response {
    let idea = match controller.read_idea(&body) {
        Ok(idea) => idea,
        Err(response) => return response,
    };
    if !controller.pipeline.is_ready() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(AnalyzeResponse::failed(
                "Live analysis requires AGI_API_KEY and OPENAI_API_KEY to be configured",
            )),
        )
            .into_response();
    }

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match controller.pipeline.run(&idea, &cancel).await {
        Ok(report) => (StatusCode::OK, Json(AnalyzeResponse::ok(report))).into_response(),
        Err(e) => {
            tracing::error!(idea = %idea, error = %e, "Live analysis failed");
            let status = match e {
                ScoutError::Config(_) | ScoutError::SessionLimit | ScoutError::PoolExhausted(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(AnalyzeResponse::failed(e.to_string()))).into_response()
        }
    }
}

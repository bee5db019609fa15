//! Response shapes shared by the canned analyzer and the live pipeline.

use crate::templater::MarketInsights;
use scout_core::Competitor;
use serde::{Deserialize, Serialize};

pub const PIVOT_SUGGESTION: &str = "Consider pivoting to a niche market or adding unique features that differentiate from existing competitors";

/// Pivot advice is given for crowded markets only.
pub fn pivot_for(opportunity_score: u8) -> Option<String> {
    (opportunity_score <= 5).then(|| PIVOT_SUGGESTION.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorText {
    pub text: String,
}

impl AdvisorText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_competitors: usize,
    pub opportunity_score: u8,
    pub category: String,
    pub top_competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMarker {
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepMarker {
    pub fn success() -> Self {
        Self { status: StepStatus::Success, results: None, error: None }
    }

    pub fn with_results(count: usize) -> Self {
        Self { results: Some(count), ..Self::success() }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { status: StepStatus::Error, results: None, error: Some(error.into()) }
    }
}

/// Per-step status markers, keyed the way the UI expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(rename = "step1_productHunt")]
    pub product_hunt: StepMarker,
    #[serde(rename = "step2_google")]
    pub google: StepMarker,
    #[serde(rename = "step3_analysis")]
    pub analysis: StepMarker,
    #[serde(rename = "step4_advisor")]
    pub advisor: StepMarker,
}

/// Body of a successful `/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub optimist: AdvisorText,
    pub realist: AdvisorText,
    pub analysis: AnalysisSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<String>,
    pub workflow: Workflow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<MarketInsights>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_threshold() {
        assert!(pivot_for(5).is_some());
        assert!(pivot_for(6).is_none());
    }

    #[test]
    fn workflow_uses_step_keys() {
        let workflow = Workflow {
            product_hunt: StepMarker::with_results(5),
            google: StepMarker::failed("timeout"),
            analysis: StepMarker::success(),
            advisor: StepMarker::success(),
        };
        let json = serde_json::to_value(&workflow).unwrap();
        assert_eq!(json["step1_productHunt"]["results"], 5);
        assert_eq!(json["step2_google"]["status"], "error");
        assert!(json["step3_analysis"].get("results").is_none());
    }
}

//! Turns two competitor lists into a scored competition summary.

use regex::Regex;
use scout_core::{ChatMessage, ChatModel, ChatRequest, Competitor, Result, ScoutError, SearchResultRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Number of competitors surfaced in a summary.
pub const TOP_COMPETITORS: usize = 5;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object pattern"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketGap {
    pub category: String,
    pub opportunity: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatAssessment {
    pub level: ThreatLevel,
    pub description: String,
    #[serde(default)]
    pub mitigating_factors: Vec<String>,
}

/// Qualitative fields produced by a chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    #[serde(default)]
    pub market_gaps: Vec<MarketGap>,
    pub threat_assessment: ThreatAssessment,
    #[serde(default)]
    pub positioning_opportunities: Vec<String>,
    pub recommended_strategy: String,
}

impl MarketInsights {
    /// Payload used whenever the model cannot be reached or understood.
    pub fn fallback() -> Self {
        Self {
            market_gaps: vec![MarketGap {
                category: "General".to_string(),
                opportunity: "Market entry opportunity exists".to_string(),
                reason: "Analysis unavailable - using fallback".to_string(),
            }],
            threat_assessment: ThreatAssessment {
                level: ThreatLevel::Medium,
                description: "Unable to assess threats due to analysis failure".to_string(),
                mitigating_factors: vec!["Further research needed".to_string()],
            },
            positioning_opportunities: vec!["Differentiation through unique features".to_string()],
            recommended_strategy: "Conduct deeper market research before proceeding".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionAnalysis {
    pub total_competitors: usize,
    pub opportunity_score: u8,
    pub top_competitors: Vec<Competitor>,
    #[serde(flatten)]
    pub insights: Option<MarketInsights>,
}

/// Concatenate both lists and drop repeated URLs. The first occurrence wins
/// and keeps its position.
pub fn merge_competitors(
    first: &[SearchResultRecord],
    second: &[SearchResultRecord],
) -> Vec<Competitor> {
    let mut seen = HashSet::new();
    first
        .iter()
        .chain(second)
        .filter(|record| seen.insert(record.url.as_str()))
        .map(Competitor::from)
        .collect()
}

/// Fewer competitors means more room: 9, 7, 5 or 3.
pub fn opportunity_score(total_competitors: usize) -> u8 {
    match total_competitors {
        0..=10 => 9,
        11..=25 => 7,
        26..=50 => 5,
        _ => 3,
    }
}

/// Deterministic part of the analysis.
pub fn summarize(first: &[SearchResultRecord], second: &[SearchResultRecord]) -> CompetitionAnalysis {
    let merged = merge_competitors(first, second);
    CompetitionAnalysis {
        total_competitors: merged.len(),
        opportunity_score: opportunity_score(merged.len()),
        top_competitors: merged.into_iter().take(TOP_COMPETITORS).collect(),
        insights: None,
    }
}

/// [`summarize`] plus model-generated insights. Without a model, or when the
/// model call fails, the fallback insights are attached.
pub async fn analyze_competition(
    model: Option<&dyn ChatModel>,
    first: &[SearchResultRecord],
    second: &[SearchResultRecord],
    query: &str,
) -> CompetitionAnalysis {
    let mut analysis = summarize(first, second);
    let merged = merge_competitors(first, second);

    let insights = match model {
        Some(model) => match market_insights(model, &merged, query).await {
            Ok(insights) => insights,
            Err(e) => {
                tracing::warn!(error = %e, "Market analysis failed, using fallback");
                MarketInsights::fallback()
            }
        },
        None => {
            tracing::debug!("No chat model configured, using fallback market analysis");
            MarketInsights::fallback()
        }
    };
    analysis.insights = Some(insights);
    analysis
}

fn insights_prompt(competitors: &[Competitor], query: &str) -> String {
    let competitor_data = competitors
        .iter()
        .map(|c| format!("- {}: {} ({})", c.name, c.description, c.url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert market analyst. Analyze the following competitor data for "{query}" and provide strategic insights.

Competitors:
{competitor_data}

Provide a JSON response with these exact keys:
{{
  "marketGaps": [
    {{"category": "string", "opportunity": "string", "reason": "string"}}
  ],
  "threatAssessment": {{
    "level": "low|medium|high",
    "description": "string",
    "mitigatingFactors": ["string"]
  }},
  "positioningOpportunities": ["string"],
  "recommendedStrategy": "string"
}}

Focus on actionable insights, market positioning, and strategic opportunities."#
    )
}

async fn market_insights(
    model: &dyn ChatModel,
    competitors: &[Competitor],
    query: &str,
) -> Result<MarketInsights> {
    let request = ChatRequest::new(vec![ChatMessage::user(insights_prompt(competitors, query))])
        .with_temperature(0.3)
        .with_max_tokens(1500);
    let response = model.complete(request).await?;
    let content = response
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ScoutError::Model("No response from model".to_string()))?;

    let object = JSON_OBJECT
        .find(&content)
        .ok_or_else(|| ScoutError::MalformedResponse("No JSON found in model response".into()))?;
    Ok(serde_json::from_str(object.as_str())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, url: &str) -> SearchResultRecord {
        SearchResultRecord::new(name, url, format!("{name} description"))
    }

    #[test]
    fn score_thresholds() {
        let cases = [(0, 9), (10, 9), (11, 7), (25, 7), (26, 5), (50, 5), (51, 3), (500, 3)];
        for (count, score) in cases {
            assert_eq!(opportunity_score(count), score, "count {count}");
        }
    }

    #[test]
    fn merge_keeps_first_occurrence() {
        let ph = vec![record("A", "https://a"), record("B", "https://b")];
        let google = vec![record("B-dup", "https://b"), record("C", "https://c")];
        let merged = merge_competitors(&ph, &google);
        let names: Vec<_> = merged.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn summary_takes_top_five() {
        let many: Vec<_> = (0..12).map(|i| record(&format!("R{i}"), &format!("u{i}"))).collect();
        let summary = summarize(&many, &[]);
        assert_eq!(summary.total_competitors, 12);
        assert_eq!(summary.opportunity_score, 7);
        assert_eq!(summary.top_competitors.len(), 5);
        assert_eq!(summary.top_competitors[4].name, "R4");
    }

    #[test]
    fn fallback_serializes_expected_shape() {
        let analysis = CompetitionAnalysis {
            insights: Some(MarketInsights::fallback()),
            ..summarize(&[], &[])
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["totalCompetitors"], 0);
        assert_eq!(json["opportunityScore"], 9);
        assert_eq!(json["marketGaps"][0]["category"], "General");
        assert_eq!(json["threatAssessment"]["level"], "medium");
        assert_eq!(json["recommendedStrategy"], "Conduct deeper market research before proceeding");
    }
}

use crate::advisor::AdvisorGenerator;
use crate::canned::categorize;
use crate::report::{AdvisorText, AnalysisReport, AnalysisSummary, StepMarker, Workflow, pivot_for};
use crate::templater::analyze_competition;
use scout_agi::CompetitorSearch;
use scout_core::{ChatModel, Result, ScoutError, SearchResultRecord};
use scout_model::RetryConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// End-to-end analysis: both searches, the templater, then the advisors.
pub struct LivePipeline {
    search: Arc<CompetitorSearch>,
    model: Option<Arc<dyn ChatModel>>,
    advisor: Option<AdvisorGenerator>,
}

impl LivePipeline {
    pub fn new(search: Arc<CompetitorSearch>) -> Self {
        Self { search, model: None, advisor: None }
    }

    /// Use `model` for market insights and the advisors.
    #[must_use]
    pub fn with_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.advisor = Some(AdvisorGenerator::new(model.clone()));
        self.model = Some(model);
        self
    }

    /// Override the advisor retry policy. Has no effect before [`Self::with_model`].
    #[must_use]
    pub fn with_advisor_retry(mut self, retry_config: RetryConfig) -> Self {
        self.advisor = self.advisor.map(|advisor| advisor.with_retry_config(retry_config));
        self
    }

    pub fn search(&self) -> &Arc<CompetitorSearch> {
        &self.search
    }

    pub fn has_model(&self) -> bool {
        self.advisor.is_some()
    }

    /// Both the agent API and a chat model are configured.
    pub fn is_ready(&self) -> bool {
        self.has_model() && self.search.is_remote_enabled()
    }

    pub async fn run(&self, idea: &str, cancel: &CancellationToken) -> Result<AnalysisReport> {
        let span = tracing::info_span!("pipeline.run", idea = idea);
        self.run_inner(idea, cancel).instrument(span).await
    }

    async fn run_inner(&self, idea: &str, cancel: &CancellationToken) -> Result<AnalysisReport> {
        let advisor = self
            .advisor
            .as_ref()
            .ok_or_else(|| ScoutError::Config("Live analysis requires a chat model".to_string()))?;

        let (product_hunt, google) = tokio::join!(
            self.search.search_product_hunt_with_cancel(idea, cancel),
            self.search.search_google_with_cancel(idea, cancel),
        );
        let (product_hunt, google) = match (product_hunt, google) {
            (Err(ScoutError::Cancelled), _) | (_, Err(ScoutError::Cancelled)) => {
                return Err(ScoutError::Cancelled);
            }
            (Err(e), Err(other)) => {
                tracing::error!(error = %e, other = %other, "Both searches failed");
                return Err(e);
            }
            (ph, g) => (step_outcome("producthunt", ph), step_outcome("google", g)),
        };
        let (ph_results, ph_marker) = product_hunt;
        let (google_results, google_marker) = google;

        let analysis =
            analyze_competition(self.model.as_deref(), &ph_results, &google_results, idea).await;

        let advice = tokio::select! {
            _ = cancel.cancelled() => return Err(ScoutError::Cancelled),
            advice = advisor.generate(idea, analysis.total_competitors, &analysis.top_competitors) => advice?,
        };

        tracing::info!(
            total_competitors = analysis.total_competitors,
            opportunity_score = analysis.opportunity_score,
            "Live analysis complete"
        );

        Ok(AnalysisReport {
            optimist: AdvisorText::new(advice.optimist),
            realist: AdvisorText::new(advice.realist),
            pivot: pivot_for(analysis.opportunity_score),
            analysis: AnalysisSummary {
                total_competitors: analysis.total_competitors,
                opportunity_score: analysis.opportunity_score,
                category: categorize(idea).as_str().to_string(),
                top_competitors: analysis.top_competitors,
            },
            workflow: Workflow {
                product_hunt: ph_marker,
                google: google_marker,
                analysis: StepMarker::success(),
                advisor: StepMarker::success(),
            },
            insights: analysis.insights,
        })
    }
}

fn step_outcome(
    step: &str,
    outcome: Result<Vec<SearchResultRecord>>,
) -> (Vec<SearchResultRecord>, StepMarker) {
    match outcome {
        Ok(results) => {
            let marker = StepMarker::with_results(results.len());
            (results, marker)
        }
        Err(e) => {
            tracing::warn!(step, error = %e, "Search step failed, continuing without it");
            (Vec::new(), StepMarker::failed(e.to_string()))
        }
    }
}

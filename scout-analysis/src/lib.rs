//! # scout-analysis
//!
//! Everything between raw search results and the `/analyze` response.
//!
//! ## Overview
//!
//! - [`templater`] - Merge, deduplicate and score competitor lists
//! - [`advisor`] - Optimist and realist texts from a chat model, with retry
//! - [`canned`] - Instant keyword-based analysis with no remote calls
//! - [`LivePipeline`] - Searches, templater and advisors chained together
//!
//! ## Quick Start
//!
//! ```rust
//! use scout_analysis::canned::analyze_idea;
//!
//! let report = analyze_idea("AI fitness coach");
//! assert_eq!(report.analysis.category, "fitness");
//! assert_eq!(report.analysis.opportunity_score, 6);
//! ```

pub mod advisor;
pub mod canned;
mod pipeline;
pub mod report;
pub mod templater;

pub use advisor::{AdvisorGenerator, AdvisorResponses};
pub use canned::{Category, analyze_idea, analyze_idea_with_rng, categorize};
pub use pipeline::LivePipeline;
pub use report::{AnalysisReport, AnalysisSummary, StepMarker, StepStatus, Workflow};
pub use templater::{
    CompetitionAnalysis, MarketInsights, analyze_competition, merge_competitors,
    opportunity_score, summarize,
};

//! Review analysis providers
//!
//! An analyzer turns `(text, rating)` into an [`AnalysisResult`]. Analysis is
//! enrichment only: [`ReviewAnalyzer::analyze`] returns a fully populated
//! result on every path, so a slow, missing, or broken text-generation
//! service changes the richness of the stored metadata and never whether the
//! review is stored.
//!
//! Two implementations:
//! - [`RuleAnalyzer`]: deterministic, rating-driven (no credential configured)
//! - [`OpenAiAnalyzer`]: OpenAI-compatible chat completion, falling back to
//!   [`AnalysisResult::fallback`] on any failure

mod openai;
mod rules;

pub use openai::{strip_code_fence, OpenAiAnalyzer};
pub use rules::{rule_action, rule_summary, RuleAnalyzer};

use async_trait::async_trait;
use fb_common::config::AnalysisSettings;
use fb_common::AiAction;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::validator::Rating;

/// Derived metadata attached to a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Reply shown to the submitter
    pub user_response: String,
    /// Short synopsis
    pub summary: String,
    pub action: AiAction,
}

impl AnalysisResult {
    /// Safe substitute used whenever analysis cannot complete
    ///
    /// Echoes the review text, labels the summary as a failure, and never
    /// suggests an action.
    pub fn fallback(text: &str, reason: impl fmt::Display) -> Self {
        Self {
            user_response: text.to_string(),
            summary: format!("Review analysis failed: {}", reason),
            action: AiAction::Neutral,
        }
    }
}

/// Why an external analysis call was abandoned
///
/// Internal to the analyzers; converted into [`AnalysisResult::fallback`]
/// before leaving them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("OpenAI API error: {0}")]
    Api(u16),

    #[error("No response from LLM")]
    EmptyCompletion,

    #[error("invalid JSON: {0}")]
    Parse(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Review analyzer
///
/// Implementations absorb every internal failure; there is no error path.
#[async_trait]
pub trait ReviewAnalyzer: Send + Sync {
    /// Analyzer name for logging
    fn name(&self) -> &'static str;

    async fn analyze(&self, text: &str, rating: Rating) -> AnalysisResult;
}

/// Build the analyzer selected by configuration
///
/// A non-blank credential selects [`OpenAiAnalyzer`]; otherwise
/// [`RuleAnalyzer`].
pub fn build_analyzer(settings: &AnalysisSettings) -> Result<Arc<dyn ReviewAnalyzer>, AnalysisError> {
    match settings.credential() {
        Some(_) => {
            let analyzer = OpenAiAnalyzer::from_settings(settings)?;
            info!(
                model = %settings.model,
                base_url = %settings.base_url,
                timeout_ms = settings.timeout_ms,
                "Review analysis: external text generation"
            );
            Ok(Arc::new(analyzer))
        }
        None => {
            info!("Review analysis: deterministic rules (no API key configured)");
            Ok(Arc::new(RuleAnalyzer))
        }
    }
}

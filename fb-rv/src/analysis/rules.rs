//! Deterministic rating-driven analyzer

use async_trait::async_trait;
use fb_common::AiAction;

use super::{AnalysisResult, ReviewAnalyzer};
use crate::validator::Rating;

/// Characters of review text quoted in the summary
const SUMMARY_PREFIX_CHARS: usize = 100;

/// Analyzer used when no text-generation service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnalyzer;

#[async_trait]
impl ReviewAnalyzer for RuleAnalyzer {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn analyze(&self, text: &str, rating: Rating) -> AnalysisResult {
        AnalysisResult {
            user_response: text.to_string(),
            summary: rule_summary(text, rating),
            action: rule_action(rating),
        }
    }
}

/// 4-5 positive, 1-2 negative, 3 neutral
pub fn rule_action(rating: Rating) -> AiAction {
    let r = rating.get();
    if r >= 4 {
        AiAction::Positive
    } else if r <= 2 {
        AiAction::Negative
    } else {
        AiAction::Neutral
    }
}

/// `Review with rating <r>: <first 100 chars>` plus `...` when truncated
pub fn rule_summary(text: &str, rating: Rating) -> String {
    let mut prefix: String = text.chars().take(SUMMARY_PREFIX_CHARS).collect();
    if text.chars().nth(SUMMARY_PREFIX_CHARS).is_some() {
        prefix.push_str("...");
    }

    format!("Review with rating {}: {}", rating.get(), prefix)
}

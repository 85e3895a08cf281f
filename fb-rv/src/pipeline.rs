//! Review submission pipeline
//!
//! Per submission: `Received → Validated → Analyzed → Persisted → Returned`.
//! Two exits: invalid input (before analysis, nothing written) and storage
//! failure (after analysis, nothing written). Analysis can't end a
//! submission: the analyzer is total, and a panic inside it is caught here
//! and replaced by [`AnalysisResult::fallback`]. Single attempt, no retries.

use fb_common::ReviewRecord;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::analysis::{AnalysisResult, ReviewAnalyzer};
use crate::db::{NewReview, ReviewStore};
use crate::error::SubmissionError;
use crate::validator::{self, RawReview, ReviewSubmission};

/// Validation → analysis → persistence
#[derive(Clone)]
pub struct ReviewPipeline {
    analyzer: Arc<dyn ReviewAnalyzer>,
    store: ReviewStore,
}

impl ReviewPipeline {
    pub fn new(analyzer: Arc<dyn ReviewAnalyzer>, store: ReviewStore) -> Self {
        Self { analyzer, store }
    }

    /// Submit one review
    ///
    /// Returns the stored record, or the validation/persistence error that
    /// stopped it.
    pub async fn submit(&self, raw: &RawReview) -> Result<ReviewRecord, SubmissionError> {
        let submission = match validator::validate(raw.rating.as_ref(), raw.review.as_ref()) {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Review rejected");
                return Err(e.into());
            }
        };
        let rating = submission.rating.get();
        debug!(rating, "Review validated");

        let analysis = self.analyze_contained(&submission).await;
        debug!(rating, action = %analysis.action, "Review analyzed");

        let new_review = NewReview {
            rating: submission.rating,
            review: submission.text,
            ai_response: analysis.user_response,
            ai_summary: analysis.summary,
            ai_action: analysis.action,
        };

        let record = self.store.insert(new_review).await.map_err(|e| {
            error!(rating, error = %e, "Review not stored");
            e
        })?;

        info!(
            review_id = record.id,
            rating,
            action = %record.ai_action,
            "Review stored"
        );

        Ok(record)
    }

    /// Run the analyzer, replacing a panic with the fallback result
    async fn analyze_contained(&self, submission: &ReviewSubmission) -> AnalysisResult {
        let analysis = self.analyzer.analyze(&submission.text, submission.rating);

        match AssertUnwindSafe(analysis).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(
                    analyzer = self.analyzer.name(),
                    reason = %reason,
                    "Review analyzer panicked, using fallback"
                );
                AnalysisResult::fallback(&submission.text, format!("analyzer panicked: {}", reason))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

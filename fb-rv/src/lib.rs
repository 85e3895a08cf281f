//! fb-rv library - Review service
//!
//! Accepts star ratings with free-text reviews, attaches an analysis
//! (echo response, summary, suggested action) and stores the result for the
//! monitoring dashboard.

pub mod analysis;
pub mod api;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod validator;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analysis::ReviewAnalyzer;
use crate::db::ReviewStore;
use crate::pipeline::ReviewPipeline;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Submission pipeline (sole writer of reviews)
    pub pipeline: ReviewPipeline,
    /// Read access for listing and health checks
    pub store: ReviewStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ReviewAnalyzer>, store: ReviewStore) -> Self {
        Self {
            pipeline: ReviewPipeline::new(analyzer, store.clone()),
            store,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Cross-origin requests are allowed: the dashboards are served separately.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::review_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

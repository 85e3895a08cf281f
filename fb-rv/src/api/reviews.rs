//! Review endpoints
//!
//! - `POST /api/review`: submit `{rating, review}`, 201 with the stored record
//! - `GET /api/reviews`: every stored review, newest first
//!
//! Responses use the `{status, data}` / `{status, error}` envelope.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fb_common::{Envelope, ReviewRecord};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::validator::RawReview;
use crate::AppState;

/// POST /api/review
///
/// **Errors:**
/// - 400: body is not a JSON object, invalid rating, empty review
/// - 500: review could not be stored
pub async fn submit_review(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<ReviewRecord>>)> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let raw = RawReview::from_body(body)
        .ok_or_else(|| ApiError::BadRequest("Request body must be a JSON object".to_string()))?;

    let record = state.pipeline.submit(&raw).await?;

    Ok((StatusCode::CREATED, Json(Envelope::success(record))))
}

/// GET /api/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<ReviewRecord>>>> {
    let records = state.store.list_all().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list reviews");
        e
    })?;

    Ok(Json(Envelope::success(records)))
}

/// Build review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/api/review", post(submit_review))
        .route("/api/reviews", get(list_reviews))
}

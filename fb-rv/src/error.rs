//! Error types for fb-rv
//!
//! Validation errors are client errors (400) and are raised before any side
//! effect. Persistence errors are server errors (500) and mean the review was
//! not recorded. Analysis errors never reach this layer; see
//! [`crate::analysis::AnalysisError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fb_common::Envelope;
use thiserror::Error;

/// Rejected review input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Rating missing, non-numeric, fractional, or outside 1..=5
    #[error("Rating must be a number between 1 and 5")]
    InvalidRating,

    /// Review text missing, not a string, or blank after trimming
    #[error("Review cannot be empty")]
    EmptyReview,
}

/// Storage unavailable or query failed
#[derive(Debug, Error)]
#[error("Storage error: {0}")]
pub struct PersistenceError(#[from] pub sqlx::Error);

/// Failure of a single review submission
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Review input rejected (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage failure (500)
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Invalid(e) => ApiError::Validation(e),
            SubmissionError::Persistence(e) => ApiError::Persistence(e),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(Envelope::<()>::error(self.to_string()));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

//! Review record and response envelope types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ========================================
// Review Types
// ========================================

/// Suggested action derived from a review's sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiAction {
    Positive,
    Negative,
    Neutral,
}

impl AiAction {
    /// Lowercase label as stored in the database and sent over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::Positive => "positive",
            AiAction::Negative => "negative",
            AiAction::Neutral => "neutral",
        }
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the three action labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for AiAction {
    type Err = UnknownAction;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(AiAction::Positive),
            "negative" => Ok(AiAction::Negative),
            "neutral" => Ok(AiAction::Neutral),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

/// A stored review with its derived analysis fields
///
/// Serialized with the column names of the `reviews` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Store-assigned surrogate key
    pub id: i64,
    /// Star rating, 1 to 5
    pub rating: u8,
    /// Review text as submitted (trimmed)
    pub review: String,
    /// Reply shown to the submitter
    pub ai_response: String,
    /// Short machine-generated synopsis
    pub ai_summary: String,
    /// Suggested action
    pub ai_action: AiAction,
    /// Store-assigned creation time
    pub created_at: DateTime<Utc>,
}

// ========================================
// Response Envelope
// ========================================

/// Response envelope shared by every review endpoint
///
/// ```
/// use fb_common::api::Envelope;
///
/// let ok: Envelope<u32> = Envelope::success(7);
/// assert_eq!(serde_json::to_value(&ok).unwrap()["status"], "success");
///
/// let err: Envelope<u32> = Envelope::error("Review cannot be empty");
/// assert_eq!(serde_json::to_value(&err).unwrap()["error"], "Review cannot be empty");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T },
    Error { error: String },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            error: message.into(),
        }
    }

    /// Convert into a `Result`, with the error message on failure
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Envelope::Success { data } => Ok(data),
            Envelope::Error { error } => Err(error),
        }
    }
}

// ========================================
// Tests
// ========================================

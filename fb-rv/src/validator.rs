//! Review input validation
//!
//! Pure checks on the raw request fields. Nothing is analyzed or stored
//! unless [`validate`] returns a [`ReviewSubmission`].

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Star rating, guaranteed to be in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(ValidationError::InvalidRating)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A validated review: rating in range, text non-empty and trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub rating: Rating,
    pub text: String,
}

/// Review fields as they arrived, before any type checking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReview {
    pub rating: Option<Value>,
    pub review: Option<Value>,
}

impl RawReview {
    pub fn new(rating: impl Into<Value>, review: impl Into<Value>) -> Self {
        Self {
            rating: Some(rating.into()),
            review: Some(review.into()),
        }
    }

    /// Pick the `rating` and `review` fields out of a JSON object body
    ///
    /// Returns `None` when the body is not an object. Unknown fields are
    /// ignored; JSON `null` counts as absent.
    pub fn from_body(body: Value) -> Option<Self> {
        match body {
            Value::Object(mut map) => Some(Self {
                rating: take_non_null(&mut map, "rating"),
                review: take_non_null(&mut map, "review"),
            }),
            _ => None,
        }
    }
}

fn take_non_null(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    map.remove(key).filter(|v| !v.is_null())
}

/// Validate a raw review
///
/// Rating is checked first, so input failing both checks reports
/// [`ValidationError::InvalidRating`].
pub fn validate(
    rating: Option<&Value>,
    text: Option<&Value>,
) -> Result<ReviewSubmission, ValidationError> {
    let rating = parse_rating(rating)?;
    let text = parse_text(text)?;

    Ok(ReviewSubmission { rating, text })
}

/// Rating must be a JSON number with no fractional part, in 1..=5
///
/// `4.0` is accepted; `4.5`, `"4"` and `true` are not.
fn parse_rating(value: Option<&Value>) -> Result<Rating, ValidationError> {
    let number = match value {
        Some(Value::Number(n)) => n,
        _ => return Err(ValidationError::InvalidRating),
    };

    if let Some(i) = number.as_i64() {
        return Rating::new(i);
    }

    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => {
            if f < f64::from(Rating::MIN) || f > f64::from(Rating::MAX) {
                Err(ValidationError::InvalidRating)
            } else {
                Rating::new(f as i64)
            }
        }
        _ => Err(ValidationError::InvalidRating),
    }
}

fn parse_text(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ValidationError::EmptyReview)
            } else {
                Ok(trimmed.to_string())
            }
        }
        _ => Err(ValidationError::EmptyReview),
    }
}

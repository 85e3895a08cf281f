//! Review store
//!
//! Append-only: rows are inserted once and never updated or deleted. The
//! store assigns `id` and `created_at` inside the insert statement, so both
//! are taken under SQLite's write lock. `created_at` is fixed-width RFC 3339
//! (milliseconds, `Z`) so text order is time order, and it is strictly
//! greater than every earlier row's, even if the wall clock steps back.

use chrono::{DateTime, Utc};
use fb_common::{AiAction, ReviewRecord};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error::PersistenceError;
use crate::validator::Rating;

const RECORD_COLUMNS: &str = "id, rating, review, ai_response, ai_summary, ai_action, created_at";

/// Tail of the insert SELECT yielding `created_at`: current time, or 1 ms
/// past the newest stored row when the clock is at or behind it
const NEXT_CREATED_AT: &str = r#"
    CASE
        WHEN ts_latest IS NULL OR ts_now > ts_latest THEN ts_now
        ELSE strftime('%Y-%m-%dT%H:%M:%fZ', ts_latest, '+0.001 seconds')
    END
    FROM (
        SELECT strftime('%Y-%m-%dT%H:%M:%fZ', 'now') AS ts_now,
               (SELECT MAX(created_at) FROM reviews) AS ts_latest
    )
"#;

/// Fields of a review supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: Rating,
    pub review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_action: AiAction,
}

/// Access to the `reviews` table
#[derive(Debug, Clone)]
pub struct ReviewStore {
    pool: SqlitePool,
}

impl ReviewStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one review and return the stored row
    ///
    /// The returned record is decoded from the inserted row, so it equals
    /// what [`list_all`](Self::list_all) returns for it.
    pub async fn insert(&self, review: NewReview) -> Result<ReviewRecord, PersistenceError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO reviews (rating, review, ai_response, ai_summary, ai_action, created_at)
            SELECT ?, ?, ?, ?, ?, {}
            RETURNING {}
            "#,
            NEXT_CREATED_AT, RECORD_COLUMNS
        ))
        .bind(i64::from(review.rating.get()))
        .bind(&review.review)
        .bind(&review.ai_response)
        .bind(&review.ai_summary)
        .bind(review.ai_action.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(record_from_row(&row)?)
    }

    /// All reviews, newest first
    pub async fn list_all(&self) -> Result<Vec<ReviewRecord>, PersistenceError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM reviews ORDER BY created_at DESC, id DESC",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<(), PersistenceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<ReviewRecord, sqlx::Error> {
    let rating: i64 = row.try_get("rating")?;
    let rating = u8::try_from(rating).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    let ai_action: String = row.try_get("ai_action")?;
    let ai_action = ai_action
        .parse::<AiAction>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    let created_at: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);

    Ok(ReviewRecord {
        id: row.try_get("id")?,
        rating,
        review: row.try_get("review")?,
        ai_response: row.try_get("ai_response")?,
        ai_summary: row.try_get("ai_summary")?,
        ai_action,
        created_at,
    })
}

//! Database access for fb-rv
//!
//! Single SQLite database holding the `reviews` table.

mod reviews;

pub use reviews::{NewReview, ReviewStore};

use fb_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Open (creating if needed) the review database and its tables
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Private in-memory database with the review tables
///
/// Held on a single connection that never expires, since every SQLite
/// connection to `:memory:` gets its own database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the review tables if they don't exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            review TEXT NOT NULL,
            ai_response TEXT NOT NULL,
            ai_summary TEXT NOT NULL,
            ai_action TEXT NOT NULL CHECK (ai_action IN ('positive', 'negative', 'neutral')),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_created_at ON reviews (created_at)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (reviews)");

    Ok(())
}

//! Database operations for the `pages` table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// Status written by every successful fetch.
pub const STATUS_SCRAPED: &str = "scraped";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `pages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PageRow {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: String,
    pub scraped_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert the page for `url`, or overwrite its title, content, status and
/// `scraped_at` if the URL is already stored. Returns the page id, which is
/// stable across repeated upserts of the same URL.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction fails.
pub async fn upsert_page(
    pool: &SqlitePool,
    url: &str,
    title: &str,
    content: &str,
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO pages (url, title, content, status, scraped_at) \
         VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(url) DO UPDATE SET \
             title = excluded.title, \
             content = excluded.content, \
             status = excluded.status, \
             scraped_at = excluded.scraped_at \
         RETURNING id",
    )
    .bind(url)
    .bind(title)
    .bind(content)
    .bind(STATUS_SCRAPED)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_page_by_url(pool: &SqlitePool, url: &str) -> Result<Option<PageRow>, DbError> {
    let row = sqlx::query_as::<_, PageRow>(
        "SELECT id, url, title, content, status, scraped_at FROM pages WHERE url = ?",
    )
    .bind(url)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_pages(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

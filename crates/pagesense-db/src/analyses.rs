//! Database operations for the `analyses` table.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pagesense_core::{Keyword, SentimentLabel};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub url_id: i64,
    pub sentiment_score: f64,
    pub sentiment_label: String,
    pub keywords: Json<Vec<Keyword>>,
    pub word_count: i64,
    pub analyzed_at: DateTime<Utc>,
}

/// An analysis joined with the page it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct HistoryRow {
    pub url: String,
    pub title: Option<String>,
    pub sentiment_score: f64,
    pub sentiment_label: String,
    pub word_count: i64,
    pub analyzed_at: DateTime<Utc>,
}

/// Totals over every stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total_analyses: i64,
    /// Count per label; labels with no analyses are absent.
    pub sentiment_distribution: BTreeMap<String, i64>,
    /// Mean sentiment score, 0 when there are no analyses.
    pub average_sentiment: f64,
    /// Analyses with `analyzed_at >= since`.
    pub recent_analyses: i64,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Append one analysis run for `page_id` and return its id.
///
/// # Errors
///
/// Returns [`DbError::Integrity`] if no page with `page_id` exists, or
/// [`DbError::Sqlx`] if the transaction fails.
pub async fn insert_analysis(
    pool: &SqlitePool,
    page_id: i64,
    sentiment_score: f64,
    sentiment_label: SentimentLabel,
    keywords: &[Keyword],
    word_count: usize,
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let page_exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pages WHERE id = ?)")
        .bind(page_id)
        .fetch_one(&mut *tx)
        .await?;
    if page_exists == 0 {
        return Err(DbError::Integrity(format!("page {page_id} does not exist")));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO analyses \
             (url_id, sentiment_score, sentiment_label, keywords, word_count, analyzed_at) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(page_id)
    .bind(sentiment_score)
    .bind(sentiment_label.as_str())
    .bind(Json(keywords))
    .bind(i64::try_from(word_count).unwrap_or(i64::MAX))
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Most recent analyses first, ties broken by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_history(pool: &SqlitePool, limit: u32) -> Result<Vec<HistoryRow>, DbError> {
    let rows = sqlx::query_as::<_, HistoryRow>(
        "SELECT p.url, p.title, a.sentiment_score, a.sentiment_label, a.word_count, a.analyzed_at \
         FROM analyses a \
         JOIN pages p ON p.id = a.url_id \
         ORDER BY a.analyzed_at DESC, a.id DESC \
         LIMIT ?",
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Analyses carrying `label`, highest score first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_by_sentiment(
    pool: &SqlitePool,
    label: SentimentLabel,
) -> Result<Vec<HistoryRow>, DbError> {
    let rows = sqlx::query_as::<_, HistoryRow>(
        "SELECT p.url, p.title, a.sentiment_score, a.sentiment_label, a.word_count, a.analyzed_at \
         FROM analyses a \
         JOIN pages p ON p.id = a.url_id \
         WHERE a.sentiment_label = ? \
         ORDER BY a.sentiment_score DESC, a.analyzed_at DESC, a.id DESC",
    )
    .bind(label.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every stored keyword list, oldest analysis first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::Json`] if a
/// stored list cannot be decoded.
pub async fn query_all_keyword_blobs(pool: &SqlitePool) -> Result<Vec<Vec<Keyword>>, DbError> {
    let blobs: Vec<String> = sqlx::query_scalar("SELECT keywords FROM analyses ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    blobs
        .iter()
        .map(|blob| serde_json::from_str::<Vec<Keyword>>(blob).map_err(DbError::from))
        .collect()
}

/// Counts, label distribution and mean score, read in a single transaction
/// so the figures agree with each other.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn aggregate_stats(
    pool: &SqlitePool,
    since: DateTime<Utc>,
) -> Result<AggregateStats, DbError> {
    let mut tx = pool.begin().await?;

    let total_analyses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyses")
        .fetch_one(&mut *tx)
        .await?;

    let distribution: Vec<(String, i64)> = sqlx::query_as(
        "SELECT sentiment_label, COUNT(*) FROM analyses \
         GROUP BY sentiment_label ORDER BY sentiment_label",
    )
    .fetch_all(&mut *tx)
    .await?;

    let average: Option<f64> = sqlx::query_scalar("SELECT AVG(sentiment_score) FROM analyses")
        .fetch_one(&mut *tx)
        .await?;

    let recent_analyses: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM analyses WHERE analyzed_at >= ?")
            .bind(since)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    Ok(AggregateStats {
        total_analyses,
        sentiment_distribution: distribution.into_iter().collect(),
        average_sentiment: average.unwrap_or(0.0),
        recent_analyses,
    })
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_analyses(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM analyses")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// All analyses of one page in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_analyses_for_page(
    pool: &SqlitePool,
    page_id: i64,
) -> Result<Vec<AnalysisRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisRow>(
        "SELECT id, url_id, sentiment_score, sentiment_label, keywords, word_count, analyzed_at \
         FROM analyses WHERE url_id = ? ORDER BY id ASC",
    )
    .bind(page_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
#[path = "analyses_test.rs"]
mod tests;

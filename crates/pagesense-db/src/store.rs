//! [`ResultStore`]: owned handle over the pool exposing every table operation.

use std::path::Path;

use chrono::{DateTime, Utc};
use pagesense_core::{AppConfig, Keyword, SentimentLabel};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::analyses::{self, AggregateStats, AnalysisRow, HistoryRow};
use crate::pages::{self, PageRow};
use crate::reports::{self, ReportRow};
use crate::{connect_in_memory, connect_pool, run_migrations, DbError, PoolConfig};

/// Persistence for pages, analyses and reports.
///
/// Cheap to clone; clones share the same pool.
#[derive(Debug, Clone)]
pub struct ResultStore {
    pool: SqlitePool,
}

impl ResultStore {
    /// Wrap an existing pool. Migrations are not run.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database file at `path` and bring its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened or a migration fails.
    pub async fn open(path: &Path, config: PoolConfig) -> Result<Self, DbError> {
        let pool = connect_pool(path, config).await?;
        let applied = run_migrations(&pool).await?;
        if applied > 0 {
            tracing::info!(path = %path.display(), applied, "applied database migrations");
        }
        Ok(Self { pool })
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened or a migration fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, DbError> {
        Self::open(&config.database_path, PoolConfig::from_app_config(config)).await
    }

    /// Fresh private in-memory store with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    pub async fn open_in_memory() -> Result<Self, DbError> {
        let pool = connect_in_memory().await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // -- writes -------------------------------------------------------------

    /// # Errors
    ///
    /// See [`pages::upsert_page`].
    pub async fn upsert_page(&self, url: &str, title: &str, content: &str) -> Result<i64, DbError> {
        pages::upsert_page(&self.pool, url, title, content).await
    }

    /// # Errors
    ///
    /// See [`analyses::insert_analysis`].
    pub async fn insert_analysis(
        &self,
        page_id: i64,
        sentiment_score: f64,
        sentiment_label: SentimentLabel,
        keywords: &[Keyword],
        word_count: usize,
    ) -> Result<i64, DbError> {
        analyses::insert_analysis(
            &self.pool,
            page_id,
            sentiment_score,
            sentiment_label,
            keywords,
            word_count,
        )
        .await
    }

    /// # Errors
    ///
    /// See [`reports::insert_report`].
    pub async fn insert_report(
        &self,
        name: &str,
        description: &str,
        data: &Value,
    ) -> Result<i64, DbError> {
        reports::insert_report(&self.pool, name, description, data).await
    }

    // -- reads --------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn query_history(&self, limit: u32) -> Result<Vec<HistoryRow>, DbError> {
        analyses::query_history(&self.pool, limit).await
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn query_by_sentiment(
        &self,
        label: SentimentLabel,
    ) -> Result<Vec<HistoryRow>, DbError> {
        analyses::query_by_sentiment(&self.pool, label).await
    }

    /// # Errors
    ///
    /// See [`analyses::query_all_keyword_blobs`].
    pub async fn query_all_keyword_blobs(&self) -> Result<Vec<Vec<Keyword>>, DbError> {
        analyses::query_all_keyword_blobs(&self.pool).await
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if any query fails.
    pub async fn aggregate_stats(&self, since: DateTime<Utc>) -> Result<AggregateStats, DbError> {
        analyses::aggregate_stats(&self.pool, since).await
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn get_page_by_url(&self, url: &str) -> Result<Option<PageRow>, DbError> {
        pages::get_page_by_url(&self.pool, url).await
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn count_pages(&self) -> Result<i64, DbError> {
        pages::count_pages(&self.pool).await
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn count_analyses(&self) -> Result<i64, DbError> {
        analyses::count_analyses(&self.pool).await
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn list_analyses_for_page(&self, page_id: i64) -> Result<Vec<AnalysisRow>, DbError> {
        analyses::list_analyses_for_page(&self.pool, page_id).await
    }

    /// # Errors
    ///
    /// See [`reports::get_report`].
    pub async fn get_report(&self, id: i64) -> Result<ReportRow, DbError> {
        reports::get_report(&self.pool, id).await
    }
}

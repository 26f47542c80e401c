//! Database operations for the `reports` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `reports` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub data: Json<Value>,
    pub created_at: DateTime<Utc>,
}

/// Persist a report snapshot and return its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction fails.
pub async fn insert_report(
    pool: &SqlitePool,
    name: &str,
    description: &str,
    data: &Value,
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO reports (name, description, data, created_at) \
         VALUES (?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(name)
    .bind(description)
    .bind(Json(data))
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// # Errors
///
/// Returns [`DbError::NotFound`] if no report has `id`, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn get_report(pool: &SqlitePool, id: i64) -> Result<ReportRow, DbError> {
    sqlx::query_as::<_, ReportRow>(
        "SELECT id, name, description, data, created_at FROM reports WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

//! Database operations for the `workflows` table.

use chrono::{DateTime, Utc};
use flowpulse_core::NormalizedWorkflow;
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `workflows` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkflowRow {
    pub id: i64,
    pub name: String,
    pub platform: String,
    pub url: String,
    pub country: String,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub popularity_score: f64,
    /// JSONB; only populated for trend records.
    pub meta_data: Option<Value>,
    pub last_updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Upsert a batch of normalized workflows keyed on `url`.
///
/// On conflict only the counters, `popularity_score`, `meta_data` and
/// `last_updated` are refreshed; `name`, `platform` and `country` keep the
/// values from the first insert. All rows run inside a single transaction, so
/// one failing row rolls back the whole batch. An empty batch is a no-op.
///
/// Returns the number of rows inserted or updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn upsert_workflows(pool: &PgPool, rows: &[NormalizedWorkflow]) -> Result<u64, DbError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut affected = 0u64;

    for row in rows {
        let result = sqlx::query(
            "INSERT INTO workflows \
                 (name, platform, url, country, views, likes, comments, popularity_score, meta_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (url) DO UPDATE SET \
                 views            = EXCLUDED.views, \
                 likes            = EXCLUDED.likes, \
                 comments         = EXCLUDED.comments, \
                 popularity_score = EXCLUDED.popularity_score, \
                 meta_data        = EXCLUDED.meta_data, \
                 last_updated     = NOW()",
        )
        .bind(&row.name)
        .bind(&row.platform)
        .bind(&row.url)
        .bind(&row.country)
        .bind(row.views)
        .bind(row.likes)
        .bind(row.comments)
        .bind(row.popularity_score)
        .bind(&row.meta_data)
        .execute(&mut *tx)
        .await?;

        affected += result.rows_affected();
    }

    // Dropping `tx` without commit (any `?` above) rolls the batch back.
    tx.commit().await?;
    Ok(affected)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// List workflows by descending `popularity_score`, optionally filtered by platform label.
///
/// Ties are broken by `id` so repeated calls return a stable order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_workflows(
    pool: &PgPool,
    platform: Option<&str>,
    limit: i64,
) -> Result<Vec<WorkflowRow>, DbError> {
    let rows = sqlx::query_as::<_, WorkflowRow>(
        "SELECT id, name, platform, url, country, views, likes, comments, \
                popularity_score, meta_data, last_updated \
         FROM workflows \
         WHERE ($1::TEXT IS NULL OR platform = $1) \
         ORDER BY popularity_score DESC, id ASC \
         LIMIT $2",
    )
    .bind(platform)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Return every workflow in insertion order. Used by the SQL exporter.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_workflows(pool: &PgPool) -> Result<Vec<WorkflowRow>, DbError> {
    let rows = sqlx::query_as::<_, WorkflowRow>(
        "SELECT id, name, platform, url, country, views, likes, comments, \
                popularity_score, meta_data, last_updated \
         FROM workflows \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

//! Postgres persistence for collected workflows.
//!
//! Callers own the pool: open it with [`connect_pool`], hand `&PgPool` to the
//! query functions, and release it with [`close_pool`] when the process is done.

pub mod export;
pub mod schema;
pub mod workflows;

use std::time::Duration;

use flowpulse_core::AppConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

pub use export::{escape_sql_literal, export_sql_dump, render_sql_dump};
pub use schema::{reset_workflows_table, WORKFLOWS_DDL};
pub use workflows::{list_all_workflows, list_workflows, upsert_workflows, WorkflowRow};

// Resolved relative to this crate's manifest.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Pool sizing, taken from [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open a pool against `database_url`.
///
/// Queries check a connection out per statement (or per transaction) and the
/// pool reclaims it when the future completes or is dropped.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can be established within the
/// acquire timeout.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await?;
    tracing::debug!(
        max_connections = config.max_connections,
        "database pool connected"
    );
    Ok(pool)
}

/// Close the pool, waiting for checked-out connections to come back.
pub async fn close_pool(pool: PgPool) {
    pool.close().await;
    tracing::debug!("database pool closed");
}

/// Successfully applied migrations; zero before the bookkeeping table exists.
async fn applied_migration_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

/// Apply pending migrations and return how many ran.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DbError> {
    let before = applied_migration_count(pool).await;
    MIGRATOR.run(pool).await?;
    let after = applied_migration_count(pool).await;

    let applied = usize::try_from(after.saturating_sub(before)).unwrap_or(0);
    if applied > 0 {
        tracing::info!(applied, "database migrations applied");
    }
    Ok(applied)
}

/// Round-trip `SELECT 1` on a pooled connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection is available or the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// [`ping`] with the error lifted into [`DbError`] for the HTTP layer.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the ping fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    Ok(ping(pool).await?)
}

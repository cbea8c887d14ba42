//! Destructive schema operations for the `workflows` table.

use sqlx::PgPool;

use crate::DbError;

/// DDL for the `workflows` table, shared with the migration and the SQL exporter.
pub const WORKFLOWS_DDL: &str = include_str!("../../../migrations/0001_create_workflows.sql");

/// Drop `workflows` and recreate it empty, in one transaction.
///
/// Migration bookkeeping is left untouched, so the recreated table matches
/// the already-applied migration.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the drop, the create, or the commit fails.
pub async fn reset_workflows_table(pool: &PgPool) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DROP TABLE IF EXISTS workflows")
        .execute(&mut *tx)
        .await?;
    sqlx::raw_sql(WORKFLOWS_DDL).execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(())
}

//! `flowpulse export`: write the table as a SQL dump file.

use std::path::Path;

use anyhow::Context;

/// Dump `workflows` to `output`, returning the number of exported rows.
///
/// # Errors
///
/// Returns an error if the table cannot be read or the file cannot be written.
pub(crate) async fn run_export(pool: &sqlx::PgPool, output: &Path) -> anyhow::Result<usize> {
    let (dump, count) = flowpulse_db::export_sql_dump(pool).await?;
    tokio::fs::write(output, dump)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(path = %output.display(), count, "exported workflows");
    Ok(count)
}

//! Portable SQL dump of the `workflows` table.

use std::fmt::Write as _;

use sqlx::PgPool;

use crate::schema::WORKFLOWS_DDL;
use crate::workflows::{list_all_workflows, WorkflowRow};
use crate::DbError;

/// Quote a value as a single-quoted SQL string literal, doubling embedded quotes.
#[must_use]
pub fn escape_sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn render_score(score: f64) -> String {
    if score.is_finite() {
        score.to_string()
    } else {
        "0".to_string()
    }
}

fn render_values(row: &WorkflowRow) -> String {
    let meta = row.meta_data.as_ref().map_or_else(
        || "NULL".to_string(),
        |value| format!("{}::jsonb", escape_sql_literal(&value.to_string())),
    );

    format!(
        "({}, {}, {}, {}, {}, {}, {}, {}, {}, {}::timestamptz)",
        escape_sql_literal(&row.name),
        escape_sql_literal(&row.platform),
        escape_sql_literal(&row.url),
        escape_sql_literal(&row.country),
        row.views,
        row.likes,
        row.comments,
        render_score(row.popularity_score),
        meta,
        escape_sql_literal(&row.last_updated.to_rfc3339()),
    )
}

/// Render a self-contained dump: drop, recreate, then one multi-row INSERT.
///
/// The INSERT is omitted entirely when `rows` is empty.
#[must_use]
pub fn render_sql_dump(rows: &[WorkflowRow]) -> String {
    let mut out = String::new();
    out.push_str("DROP TABLE IF EXISTS workflows;\n\n");
    out.push_str(WORKFLOWS_DDL.trim_end());
    out.push_str("\n\n");

    if rows.is_empty() {
        return out;
    }

    out.push_str(
        "INSERT INTO workflows \
         (name, platform, url, country, views, likes, comments, popularity_score, meta_data, last_updated) VALUES\n",
    );
    let values: Vec<String> = rows.iter().map(render_values).collect();
    let _ = writeln!(out, "{};", values.join(",\n"));
    out
}

/// Read the whole table and render it as a SQL dump.
///
/// Returns the dump text and the number of exported rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the table cannot be read.
pub async fn export_sql_dump(pool: &PgPool) -> Result<(String, usize), DbError> {
    let rows = list_all_workflows(pool).await?;
    Ok((render_sql_dump(&rows), rows.len()))
}

//! Live integration tests for flowpulse-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/flowpulse-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use flowpulse_core::{
    normalize_candidates, NormalizedWorkflow, Platform, TrendDirection, TrendSignal,
    WorkflowCandidate,
};
use flowpulse_db::{
    export_sql_dump, list_all_workflows, list_workflows, reset_workflows_table, upsert_workflows,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn engagement(name: &str, platform: &str, url: &str, score: f64) -> NormalizedWorkflow {
    NormalizedWorkflow {
        name: name.to_string(),
        platform: platform.to_string(),
        url: url.to_string(),
        country: "US".to_string(),
        views: 100,
        likes: 10,
        comments: 1,
        popularity_score: score,
        meta_data: None,
    }
}

fn trend_candidate(keyword: &str, growth: f64, score: f64) -> WorkflowCandidate {
    let direction = TrendDirection::from_growth(growth);
    #[allow(clippy::cast_possible_truncation)]
    let likes = growth as i64;
    WorkflowCandidate {
        name: keyword.to_string(),
        url: format!("https://trends.google.com/trends/explore?geo=US&q={keyword}"),
        platform: Platform::GoogleTrends,
        country: "US".to_string(),
        views: 0,
        likes,
        comments: 70,
        popularity_score: score,
        trend: Some(TrendSignal {
            growth_percent: growth,
            direction,
            description: format!("{direction} {growth:.1}% in last 30 days"),
        }),
    }
}

async fn row_count(pool: &sqlx::PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workflows")
        .fetch_one(pool)
        .await
        .expect("count workflows")
}

// ---------------------------------------------------------------------------
// Section 1: Upsert semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_inserts_new_rows(pool: sqlx::PgPool) {
    let rows = vec![
        engagement("a", "YouTube", "https://example.com/a", 10.0),
        engagement("b", "YouTube", "https://example.com/b", 20.0),
    ];

    let affected = upsert_workflows(&pool, &rows).await.expect("upsert");

    assert_eq!(affected, 2);
    assert_eq!(row_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_batch_is_a_noop(pool: sqlx::PgPool) {
    let affected = upsert_workflows(&pool, &[]).await.expect("empty upsert");
    assert_eq!(affected, 0);
    assert_eq!(row_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn reingesting_same_url_updates_counters_without_duplicating(pool: sqlx::PgPool) {
    let first = engagement("Original title", "YouTube", "https://example.com/v", 10.0);
    upsert_workflows(&pool, &[first]).await.expect("first upsert");
    let before = list_all_workflows(&pool).await.expect("list")[0].clone();

    let mut second = engagement("Renamed title", "n8n Forum", "https://example.com/v", 99.0);
    second.views = 5000;
    second.likes = 250;
    second.comments = 40;
    second.country = "IN".to_string();
    upsert_workflows(&pool, &[second]).await.expect("second upsert");

    assert_eq!(row_count(&pool).await, 1);
    let after = list_all_workflows(&pool).await.expect("list")[0].clone();

    assert_eq!(after.id, before.id);
    assert_eq!((after.views, after.likes, after.comments), (5000, 250, 40));
    assert!((after.popularity_score - 99.0).abs() < f64::EPSILON);
    assert!(after.last_updated >= before.last_updated);

    // Identity fields are only written on first insert.
    assert_eq!(after.name, "Original title");
    assert_eq!(after.platform, "YouTube");
    assert_eq!(after.country, "US");
}

#[sqlx::test(migrations = "../../migrations")]
async fn failing_row_rolls_back_whole_batch(pool: sqlx::PgPool) {
    let good = engagement("good", "YouTube", "https://example.com/good", 1.0);
    // NUL bytes are rejected by Postgres text columns, failing the second statement.
    let bad = engagement("bad\0name", "YouTube", "https://example.com/bad", 2.0);

    let result = upsert_workflows(&pool, &[good, bad]).await;

    assert!(result.is_err(), "expected batch to fail");
    assert_eq!(row_count(&pool).await, 0, "first row must be rolled back");
}

#[sqlx::test(migrations = "../../migrations")]
async fn trend_rows_store_metadata_and_zero_counters(pool: sqlx::PgPool) {
    let rows = normalize_candidates(
        Platform::GoogleTrends,
        &[trend_candidate("n8n workflow", 50.0, 170.0)],
    );
    upsert_workflows(&pool, &rows).await.expect("upsert");

    let stored = &list_all_workflows(&pool).await.expect("list")[0];
    assert_eq!((stored.views, stored.likes, stored.comments), (0, 0, 0));
    let meta = stored.meta_data.as_ref().expect("metadata stored");
    assert_eq!(meta["trend_direction"], "UP");
    assert_eq!(meta["trend_growth_percent"], 50.0);
    assert_eq!(meta["trend_description"], "UP 50.0% in last 30 days");
}

// ---------------------------------------------------------------------------
// Section 2: Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_orders_by_score_and_respects_limit(pool: sqlx::PgPool) {
    let rows: Vec<NormalizedWorkflow> = (0..60)
        .map(|i| {
            engagement(
                &format!("wf {i}"),
                "YouTube",
                &format!("https://example.com/{i}"),
                f64::from(i),
            )
        })
        .collect();
    upsert_workflows(&pool, &rows).await.expect("upsert");

    let listed = list_workflows(&pool, None, 50).await.expect("list");

    assert_eq!(listed.len(), 50);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].popularity_score >= pair[1].popularity_score));
    assert!((listed[0].popularity_score - 59.0).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_filters_by_platform(pool: sqlx::PgPool) {
    let rows = vec![
        engagement("video", "YouTube", "https://example.com/video", 5.0),
        engagement("topic", "n8n Forum", "https://example.com/topic", 6.0),
    ];
    upsert_workflows(&pool, &rows).await.expect("upsert");

    let forum = list_workflows(&pool, Some("n8n Forum"), 50)
        .await
        .expect("list");

    assert_eq!(forum.len(), 1);
    assert_eq!(forum[0].name, "topic");

    let none = list_workflows(&pool, Some("Reddit"), 50).await.expect("list");
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Section 3: Reset and export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn reset_empties_the_table_and_keeps_schema(pool: sqlx::PgPool) {
    upsert_workflows(
        &pool,
        &[engagement("a", "YouTube", "https://example.com/a", 1.0)],
    )
    .await
    .expect("upsert");

    reset_workflows_table(&pool).await.expect("reset");

    assert_eq!(row_count(&pool).await, 0);
    upsert_workflows(
        &pool,
        &[engagement("b", "YouTube", "https://example.com/b", 1.0)],
    )
    .await
    .expect("table usable after reset");
    assert_eq!(row_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn exported_dump_restores_the_same_rows(pool: sqlx::PgPool) {
    let mut rows = normalize_candidates(
        Platform::GoogleTrends,
        &[trend_candidate("n8n vs zapier", -10.0, 40.0)],
    );
    rows.push(engagement(
        "Don't panic: error workflows",
        "YouTube",
        "https://example.com/quote",
        12.5,
    ));
    upsert_workflows(&pool, &rows).await.expect("upsert");

    let (dump, exported) = export_sql_dump(&pool).await.expect("export");
    assert_eq!(exported, 2);

    sqlx::raw_sql(&dump).execute(&pool).await.expect("replay dump");

    let restored = list_all_workflows(&pool).await.expect("list");
    assert_eq!(restored.len(), 2);
    assert!(restored
        .iter()
        .any(|r| r.name == "Don't panic: error workflows"));
    let trend = restored
        .iter()
        .find(|r| r.platform == "Google Trends")
        .expect("trend row restored");
    assert_eq!(
        trend.meta_data.as_ref().expect("meta")["trend_direction"],
        "DOWN"
    );
}

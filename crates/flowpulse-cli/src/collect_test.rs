use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use flowpulse_core::Environment;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

/// Config with fast pagination and the forum pointed at `forum_base_url`.
fn test_config(forum_base_url: &str) -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000),
        log_level: "info".to_string(),
        db_max_connections: 5,
        db_min_connections: 1,
        db_acquire_timeout_secs: 5,
        http_timeout_secs: 5,
        user_agent: "flowpulse-test/0.1".to_string(),
        youtube_api_key: None,
        youtube_query: "n8n popular workflows".to_string(),
        youtube_max_results: 50,
        youtube_region: "US".to_string(),
        forum_base_url: forum_base_url.to_string(),
        forum_query: "workflow".to_string(),
        forum_max_pages: 2,
        forum_page_delay_ms: 0,
        trends_keywords: vec!["n8n workflow".to_string()],
        trends_geos: vec!["US".to_string()],
        trends_pause_min_ms: 0,
        trends_pause_max_ms: 0,
    }
}

async fn mount_forum(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topics": [
                { "id": 1, "title": "Slack digest", "slug": "slack-digest", "reply_count": 3, "liked": true },
                { "id": 2, "title": "Unanswered", "slug": "unanswered", "reply_count": 0, "liked": false }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "topics": [] })))
        .mount(server)
        .await;
}

async fn count_rows(pool: &sqlx::PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workflows")
        .fetch_one(pool)
        .await
        .expect("count")
}

#[sqlx::test(migrations = "../../migrations")]
async fn forum_run_persists_scored_topics(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_forum(&server).await;
    let config = test_config(&server.uri());

    let outcomes = run_ingestion(&pool, &config, &[Platform::Forum], false).await;

    assert_eq!(
        outcomes,
        vec![SourceOutcome {
            platform: Platform::Forum,
            fetched: 1,
            saved: Some(1),
            error: None,
        }]
    );
    let rows = flowpulse_db::list_all_workflows(&pool).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].platform, "n8n Forum");
    assert_eq!(rows[0].country, "Global");
    assert!((rows[0].popularity_score - 65.0).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "../../migrations")]
async fn repeated_runs_update_instead_of_duplicating(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_forum(&server).await;
    let config = test_config(&server.uri());

    run_ingestion(&pool, &config, &[Platform::Forum], false).await;
    run_ingestion(&pool, &config, &[Platform::Forum], false).await;

    assert_eq!(count_rows(&pool).await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn dry_run_writes_nothing(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_forum(&server).await;
    let config = test_config(&server.uri());

    let outcomes = run_ingestion(&pool, &config, &[Platform::Forum], true).await;

    assert_eq!(outcomes[0].fetched, 1);
    assert_eq!(outcomes[0].saved, None);
    assert_eq!(count_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn youtube_without_key_is_skipped_and_forum_still_runs(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_forum(&server).await;
    let config = test_config(&server.uri());

    let outcomes =
        run_ingestion(&pool, &config, &[Platform::YouTube, Platform::Forum], false).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].platform, Platform::YouTube);
    assert_eq!(outcomes[0].fetched, 0);
    assert_eq!(outcomes[0].saved, Some(0));
    assert_eq!(outcomes[1].saved, Some(1));
}

#[sqlx::test(migrations = "../../migrations")]
async fn persist_failure_is_reported_not_propagated(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_forum(&server).await;
    let config = test_config(&server.uri());

    sqlx::query("DROP TABLE workflows")
        .execute(&pool)
        .await
        .expect("drop table");

    let outcomes = run_ingestion(&pool, &config, &[Platform::Forum], false).await;

    assert_eq!(outcomes[0].fetched, 1);
    assert_eq!(outcomes[0].saved, None);
    assert!(outcomes[0].error.is_some());
}

#[test]
fn invalid_forum_base_url_is_a_fetch_error() {
    let config = test_config("not a url");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");

    let result = runtime.block_on(fetch_source(&config, Platform::Forum));

    assert!(matches!(
        result,
        Err(SourceError::InvalidBaseUrl { .. })
    ));
}

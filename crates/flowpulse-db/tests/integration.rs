//! Offline unit tests for flowpulse-db pool configuration and row types.
//! These tests do not require a live database connection.

use flowpulse_core::{AppConfig, Environment};
use flowpulse_db::{render_sql_dump, PoolConfig, WorkflowRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        http_timeout_secs: 10,
        user_agent: "ua".to_string(),
        youtube_api_key: None,
        youtube_query: "n8n popular workflows".to_string(),
        youtube_max_results: 50,
        youtube_region: "US".to_string(),
        forum_base_url: "https://community.n8n.io".to_string(),
        forum_query: "workflow".to_string(),
        forum_max_pages: 4,
        forum_page_delay_ms: 0,
        trends_keywords: vec!["n8n workflow".to_string()],
        trends_geos: vec!["US".to_string()],
        trends_pause_min_ms: 0,
        trends_pause_max_ms: 0,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`WorkflowRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn workflow_row_has_expected_fields() {
    use chrono::Utc;

    let row = WorkflowRow {
        id: 7_i64,
        name: "Slack to Notion sync".to_string(),
        platform: "n8n Forum".to_string(),
        url: "https://community.n8n.io/t/slack-to-notion-sync/7".to_string(),
        country: "Global".to_string(),
        views: 0_i64,
        likes: 1_i64,
        comments: 3_i64,
        popularity_score: 65.0_f64,
        meta_data: None,
        last_updated: Utc::now(),
    };

    assert_eq!(row.id, 7);
    assert_eq!(row.country, "Global");
    assert!(row.meta_data.is_none());

    let dump = render_sql_dump(&[row]);
    assert!(dump.contains("'Slack to Notion sync'"));
}

//! Source adapters for flowpulse.
//!
//! Each adapter owns its own `reqwest::Client`, takes an explicit config
//! struct built once from [`flowpulse_core::AppConfig`], and maps one external
//! schema onto [`flowpulse_core::WorkflowCandidate`]s.

pub mod error;
pub mod forum;
pub mod trends;
pub mod youtube;

use std::time::Duration;

use reqwest::{Client, Url};

pub use error::SourceError;
pub use forum::{ForumClient, ForumConfig};
pub use trends::{analyze_series, TrendAnalysis, TrendsClient, TrendsConfig};
pub use youtube::{YoutubeClient, YoutubeConfig};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build an HTTP client with a bounded request timeout and the configured `User-Agent`.
pub(crate) fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs.max(1))))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parse a base URL, normalising it to end with exactly one slash so that
/// [`Url::join`] appends to the path instead of replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, SourceError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Join an endpoint path onto a normalised base URL.
pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, SourceError> {
    base_url
        .join(path)
        .map_err(|e| SourceError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })
}

/// Render a URL for logs and errors without its query string, which may carry API keys.
pub(crate) fn display_url(url: &Url) -> String {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.to_string()
}

//! Discourse forum search adapter (community.n8n.io).
//!
//! The search API exposes no view or like counts, so ranking relies on reply
//! counts plus the boolean `liked` flag as a weak proxy.

use std::time::Duration;

use flowpulse_core::{AppConfig, Platform, WorkflowCandidate, GLOBAL_COUNTRY};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::SourceError;
use crate::{build_http_client, display_url, endpoint, parse_base_url};

const DEFAULT_BASE_URL: &str = "https://community.n8n.io";

/// Settings for [`ForumClient`].
#[derive(Debug, Clone)]
pub struct ForumConfig {
    pub query: String,
    pub max_pages: u32,
    /// Pause after every processed page.
    pub page_delay: Duration,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ForumConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            query: config.forum_query.clone(),
            max_pages: config.forum_max_pages,
            page_delay: Duration::from_millis(config.forum_page_delay_ms),
            timeout_secs: config.http_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
struct Topic {
    id: i64,
    title: Option<String>,
    slug: Option<String>,
    reply_count: Option<i64>,
    liked: Option<bool>,
}

/// `replies*20 + liked*5`.
#[must_use]
pub fn forum_score(replies: i64, liked: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let score = replies as f64 * 20.0 + liked as f64 * 5.0;
    score
}

/// Client for the Discourse `search.json` endpoint.
pub struct ForumClient {
    client: Client,
    config: ForumConfig,
    base_url: Url,
}

impl ForumClient {
    /// Creates a client pointed at the production forum.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: ForumConfig) -> Result<Self, SourceError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Creates a client against another Discourse instance or a mock server.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(config: ForumConfig, base_url: &str) -> Result<Self, SourceError> {
        let client = build_http_client(config.timeout_secs, &config.user_agent)?;
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Page through search results, newest first.
    ///
    /// Stops at the page cap, the first empty page, or the first failing
    /// page, and returns everything accumulated up to that point. Topics
    /// without replies or without a title are dropped.
    pub async fn fetch_workflows(&self) -> Vec<WorkflowCandidate> {
        let search_query = format!("{} order:latest", self.config.query);
        tracing::info!(query = %search_query, "searching forum");

        let mut results = Vec::new();

        for page in 1..=self.config.max_pages {
            let topics = match self.fetch_page(&search_query, page).await {
                Ok(topics) => topics,
                Err(e) => {
                    tracing::warn!(source = "forum", page, error = %e, "stopping forum pagination");
                    break;
                }
            };

            if topics.is_empty() {
                tracing::debug!(page, "forum page empty; no more results");
                break;
            }

            tracing::debug!(page, count = topics.len(), "forum page fetched");
            results.extend(topics.into_iter().filter_map(|t| self.to_candidate(t)));

            if !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        tracing::info!(count = results.len(), "processed forum topics");
        results
    }

    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<Topic>, SourceError> {
        let mut url = endpoint(&self.base_url, "search.json")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string());

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: display_url(&url),
            });
        }

        let body = response.text().await?;
        let parsed: SearchPage =
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: format!("forum search page {page}"),
                source: e,
            })?;
        Ok(parsed.topics)
    }

    fn to_candidate(&self, topic: Topic) -> Option<WorkflowCandidate> {
        let replies = topic.reply_count.unwrap_or(0);
        if replies <= 0 {
            return None;
        }
        let name = topic.title.filter(|t| !t.trim().is_empty())?;
        let liked = i64::from(topic.liked.unwrap_or(false));

        Some(WorkflowCandidate {
            name,
            url: self.topic_url(topic.id, topic.slug.as_deref()),
            platform: Platform::Forum,
            country: GLOBAL_COUNTRY.to_string(),
            views: 0,
            likes: liked,
            comments: replies,
            popularity_score: forum_score(replies, liked),
            trend: None,
        })
    }

    /// `{base}/t/{slug}/{id}`; Discourse also resolves `{base}/t/{id}` when the slug is missing.
    fn topic_url(&self, id: i64, slug: Option<&str>) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        match slug.filter(|s| !s.is_empty()) {
            Some(slug) => format!("{base}/t/{slug}/{id}"),
            None => format!("{base}/t/{id}"),
        }
    }
}

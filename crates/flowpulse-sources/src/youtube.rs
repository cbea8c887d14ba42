//! `YouTube` Data API v3 adapter.
//!
//! One `search` call collects candidate video ids, then a single batched
//! `videos` call fetches their statistics.

use std::collections::{HashMap, HashSet};

use flowpulse_core::{AppConfig, Platform, WorkflowCandidate};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::SourceError;
use crate::{build_http_client, display_url, endpoint, parse_base_url};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
/// Upper bound the search endpoint accepts for `maxResults`.
const MAX_RESULTS_CAP: u32 = 50;

/// Settings for [`YoutubeClient`].
#[derive(Clone)]
pub struct YoutubeConfig {
    pub api_key: String,
    pub query: String,
    pub max_results: u32,
    /// Country tag stamped on every record; the API gives no per-video locale.
    pub region: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl YoutubeConfig {
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.youtube_api_key.clone()?;
        Some(Self {
            api_key,
            query: config.youtube_query.clone(),
            max_results: config.youtube_max_results,
            region: config.youtube_region.clone(),
            timeout_secs: config.http_timeout_secs,
            user_agent: config.user_agent.clone(),
        })
    }
}

impl std::fmt::Debug for YoutubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeConfig")
            .field("api_key", &"[redacted]")
            .field("query", &self.query)
            .field("max_results", &self.max_results)
            .field("region", &self.region)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    statistics: Option<Statistics>,
    snippet: Option<Snippet>,
}

/// Counters arrive as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

fn parse_count(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0)
}

/// `views + likes*10 + comments*20`.
#[must_use]
pub fn engagement_score(views: i64, likes: i64, comments: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let score = views as f64 + likes as f64 * 10.0 + comments as f64 * 20.0;
    score
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the `YouTube` Data API.
pub struct YoutubeClient {
    client: Client,
    config: YoutubeConfig,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: YoutubeConfig) -> Result<Self, SourceError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(config: YoutubeConfig, base_url: &str) -> Result<Self, SourceError> {
        let client = build_http_client(config.timeout_secs, &config.user_agent)?;
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Search for videos and return one candidate per unique video with nonzero views.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SourceError::Deserialize`] if either body does not match the expected shape.
    pub async fn fetch_workflows(&self) -> Result<Vec<WorkflowCandidate>, SourceError> {
        tracing::info!(query = %self.config.query, "searching YouTube");

        let search: SearchResponse = self.get_json("search", &self.search_params()).await?;

        let mut video_ids: Vec<String> = Vec::new();
        let mut titles: HashMap<String, String> = HashMap::new();
        for item in search.items {
            let Some(id) = item.id.video_id else {
                continue;
            };
            if titles.contains_key(&id) {
                continue;
            }
            let title = item.snippet.and_then(|s| s.title).unwrap_or_default();
            titles.insert(id.clone(), title);
            video_ids.push(id);
        }

        if video_ids.is_empty() {
            tracing::info!("YouTube search returned no videos");
            return Ok(Vec::new());
        }

        tracing::debug!(count = video_ids.len(), "fetching YouTube video statistics");
        let joined = video_ids.join(",");
        let videos: VideosResponse = self
            .get_json(
                "videos",
                &[("part", "statistics,snippet"), ("id", joined.as_str())],
            )
            .await?;

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for video in videos.items {
            if !seen.insert(video.id.clone()) {
                continue;
            }
            let Some(stats) = video.statistics else {
                continue;
            };
            let views = parse_count(stats.view_count.as_deref());
            if views == 0 {
                continue;
            }
            let likes = parse_count(stats.like_count.as_deref());
            let comments = parse_count(stats.comment_count.as_deref());

            let name = titles
                .get(&video.id)
                .filter(|t| !t.is_empty())
                .cloned()
                .or_else(|| video.snippet.and_then(|s| s.title))
                .unwrap_or_default();
            if name.is_empty() {
                continue;
            }

            candidates.push(WorkflowCandidate {
                name,
                url: format!("https://www.youtube.com/watch?v={}", video.id),
                platform: Platform::YouTube,
                country: self.config.region.clone(),
                views,
                likes,
                comments,
                popularity_score: engagement_score(views, likes, comments),
                trend: None,
            });
        }

        tracing::info!(count = candidates.len(), "processed YouTube videos");
        Ok(candidates)
    }

    fn search_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("relevanceLanguage", "en".to_string()),
            (
                "maxResults",
                self.config.max_results.clamp(1, MAX_RESULTS_CAP).to_string(),
            ),
            ("q", self.config.query.clone()),
        ]
    }

    async fn get_json<T, V>(&self, path: &str, params: &[(&str, V)]) -> Result<T, SourceError>
    where
        T: serde::de::DeserializeOwned,
        V: AsRef<str>,
    {
        let mut url = endpoint(&self.base_url, path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v.as_ref());
            }
            pairs.append_pair("key", &self.config.api_key);
        }

        // The query string carries the API key; keep it out of transport errors.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: display_url(&url),
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: format!("youtube {path}"),
            source: e,
        })
    }
}

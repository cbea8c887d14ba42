//! Google Trends adapter.
//!
//! Uses the unofficial two-step protocol: `explore` returns a token for the
//! `TIMESERIES` widget, and `widgetdata/multiline` returns the interest
//! series for every requested keyword in one call per region.

mod analysis;
mod response;

use std::time::Duration;

use flowpulse_core::{AppConfig, Platform, WorkflowCandidate};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use rand::Rng;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::{build_http_client, display_url, endpoint, parse_base_url};

pub use analysis::{analyze_series, growth_percent, TrendAnalysis};
use response::{
    strip_xssi_prefix, ComparisonItem, ExploreRequest, ExploreResponse, MultilineResponse,
};

const DEFAULT_BASE_URL: &str = "https://trends.google.com";
/// Per-request keyword limit enforced by the service.
pub const MAX_KEYWORDS: usize = 5;
const TIMEFRAME: &str = "today 3-m";
const HOST_LANGUAGE: &str = "en-US";
const TIMEZONE_OFFSET: &str = "360";
const TIMESERIES_WIDGET: &str = "TIMESERIES";

/// Settings for [`TrendsClient`].
#[derive(Debug, Clone)]
pub struct TrendsConfig {
    pub keywords: Vec<String>,
    pub geos: Vec<String>,
    pub pause_min: Duration,
    pub pause_max: Duration,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl TrendsConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            keywords: config.trends_keywords.clone(),
            geos: config.trends_geos.clone(),
            pause_min: Duration::from_millis(config.trends_pause_min_ms),
            pause_max: Duration::from_millis(config.trends_pause_max_ms),
            timeout_secs: config.http_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Keywords actually sent, capped at [`MAX_KEYWORDS`].
    #[must_use]
    pub fn request_keywords(&self) -> &[String] {
        &self.keywords[..self.keywords.len().min(MAX_KEYWORDS)]
    }
}

/// Canonical explore link for a keyword in one region.
#[must_use]
pub fn explore_url(geo: &str, keyword: &str) -> String {
    let encoded = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
    format!("https://trends.google.com/trends/explore?date=today%203-m&geo={geo}&q={encoded}")
}

/// Uniform jitter in `[min, max]`; collapses to `min` when the range is empty.
fn pause_duration(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    #[allow(clippy::cast_possible_truncation)]
    let (lo, hi) = (min.as_millis() as u64, max.as_millis() as u64);
    Duration::from_millis(rand::rng().random_range(lo..=hi))
}

/// Client for the Google Trends web API.
pub struct TrendsClient {
    client: Client,
    config: TrendsConfig,
    base_url: Url,
}

impl TrendsClient {
    /// Creates a client pointed at trends.google.com.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: TrendsConfig) -> Result<Self, SourceError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(config: TrendsConfig, base_url: &str) -> Result<Self, SourceError> {
        let client = build_http_client(config.timeout_secs, &config.user_agent)?;
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Fetch every configured region in turn, pausing between regions.
    ///
    /// A failing region is logged and skipped; the others still contribute.
    pub async fn fetch_workflows(&self) -> Vec<WorkflowCandidate> {
        if self.config.keywords.len() > MAX_KEYWORDS {
            tracing::warn!(
                configured = self.config.keywords.len(),
                limit = MAX_KEYWORDS,
                "too many trend keywords; extra keywords ignored"
            );
        }

        let mut results = Vec::new();
        for (idx, geo) in self.config.geos.iter().enumerate() {
            if idx > 0 {
                let pause = pause_duration(self.config.pause_min, self.config.pause_max);
                tracing::debug!(geo = %geo, pause_ms = pause.as_millis(), "pausing before next region");
                tokio::time::sleep(pause).await;
            }

            match self.fetch_region(geo).await {
                Ok(candidates) => {
                    tracing::info!(geo = %geo, count = candidates.len(), "processed trend keywords");
                    results.extend(candidates);
                }
                Err(e) => {
                    tracing::warn!(source = "trends", geo = %geo, error = %e, "trends region failed");
                }
            }
        }
        results
    }

    /// Fetch and analyze the interest series for all keywords in one region.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SourceError::Deserialize`] if a body does not decode.
    /// - [`SourceError::Api`] if the explore response has no usable time-series widget.
    pub async fn fetch_region(&self, geo: &str) -> Result<Vec<WorkflowCandidate>, SourceError> {
        let keywords = self.config.request_keywords();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let explore_req = ExploreRequest {
            comparison_item: keywords
                .iter()
                .map(|keyword| ComparisonItem {
                    keyword,
                    geo,
                    time: TIMEFRAME,
                })
                .collect(),
            category: 0,
            property: "",
        };
        let explore_req = serde_json::to_string(&explore_req)
            .map_err(|e| SourceError::Api(format!("cannot encode explore request: {e}")))?;

        let explore: ExploreResponse = self
            .get_guarded_json("trends/api/explore", &[("req", explore_req.as_str())])
            .await?;

        let widget = explore
            .widgets
            .into_iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or_else(|| SourceError::Api(format!("no {TIMESERIES_WIDGET} widget for {geo}")))?;
        let token = widget
            .token
            .ok_or_else(|| SourceError::Api(format!("{TIMESERIES_WIDGET} widget has no token")))?;
        let widget_req = widget
            .request
            .ok_or_else(|| SourceError::Api(format!("{TIMESERIES_WIDGET} widget has no request")))?
            .to_string();

        let multiline: MultilineResponse = self
            .get_guarded_json(
                "trends/api/widgetdata/multiline",
                &[("req", widget_req.as_str()), ("token", token.as_str())],
            )
            .await?;

        if multiline.default.timeline_data.is_empty() {
            tracing::info!(geo = %geo, "trends returned no data");
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for (column, keyword) in keywords.iter().enumerate() {
            let series = multiline.default.column(column);
            let Some(analysis) = analyze_series(&series) else {
                continue;
            };
            candidates.push(to_candidate(keyword, geo, &analysis));
        }
        Ok(candidates)
    }

    async fn get_guarded_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let mut url = endpoint(&self.base_url, path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("hl", HOST_LANGUAGE);
            pairs.append_pair("tz", TIMEZONE_OFFSET);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: display_url(&url),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(strip_xssi_prefix(&body)).map_err(|e| SourceError::Deserialize {
            context: format!("trends {path}"),
            source: e,
        })
    }
}

fn to_candidate(keyword: &str, geo: &str, analysis: &TrendAnalysis) -> WorkflowCandidate {
    #[allow(clippy::cast_possible_truncation)]
    let (growth, current) = (analysis.growth_percent as i64, analysis.current as i64);
    WorkflowCandidate {
        name: keyword.to_string(),
        url: explore_url(geo, keyword),
        platform: Platform::GoogleTrends,
        country: geo.to_string(),
        views: 0,
        likes: growth,
        comments: current,
        popularity_score: analysis.popularity_score,
        trend: Some(analysis.signal()),
    }
}

//! Wire types for the Google Trends explore and multiline endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anti-JSON-hijacking prefix Google prepends to every API body.
const XSSI_PREFIX: &str = ")]}'";

/// Strip the `)]}'` guard (and the trailing comma some endpoints add) before decoding.
pub(crate) fn strip_xssi_prefix(body: &str) -> &str {
    let trimmed = body.trim_start();
    match trimmed.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.trim_start_matches(',').trim_start(),
        None => trimmed,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExploreRequest<'a> {
    pub(crate) comparison_item: Vec<ComparisonItem<'a>>,
    pub(crate) category: u32,
    pub(crate) property: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ComparisonItem<'a> {
    pub(crate) keyword: &'a str,
    pub(crate) geo: &'a str,
    pub(crate) time: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExploreResponse {
    #[serde(default)]
    pub(crate) widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Widget {
    pub(crate) id: String,
    pub(crate) token: Option<String>,
    /// Echoed back verbatim to the widget data endpoint.
    pub(crate) request: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MultilineResponse {
    pub(crate) default: MultilineData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MultilineData {
    #[serde(default)]
    pub(crate) timeline_data: Vec<TimelinePoint>,
}

/// One timestamp; `value` holds one column per requested keyword, in request order.
#[derive(Debug, Deserialize)]
pub(crate) struct TimelinePoint {
    #[serde(default)]
    pub(crate) value: Vec<f64>,
}

impl MultilineData {
    /// Extract the series for the keyword at `column`.
    pub(crate) fn column(&self, column: usize) -> Vec<f64> {
        self.timeline_data
            .iter()
            .filter_map(|point| point.value.get(column).copied())
            .collect()
    }
}

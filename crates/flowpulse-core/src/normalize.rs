//! Maps adapter output onto the `workflows` row shape.
//!
//! Trend records zero out the generic counters and move their real signal
//! into the `meta_data` JSON blob; every other platform passes its counters
//! through and leaves `meta_data` empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::candidate::WorkflowCandidate;
use crate::platform::Platform;

/// Contents of `workflows.meta_data` for trend records.
///
/// All fields are optional on read so older or hand-edited rows still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendMetadata {
    #[serde(default)]
    pub trend_growth_percent: Option<f64>,
    #[serde(default)]
    pub trend_direction: Option<String>,
    #[serde(default)]
    pub trend_description: Option<String>,
}

impl TrendMetadata {
    /// Decode a stored blob. Missing or malformed metadata yields an empty value.
    #[must_use]
    pub fn from_stored(value: Option<&Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// A row ready for insertion into `workflows`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWorkflow {
    pub name: String,
    pub platform: String,
    pub url: String,
    pub country: String,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub popularity_score: f64,
    pub meta_data: Option<Value>,
}

/// Normalize a batch produced by the adapter for `source`.
///
/// The source tag, not each candidate's own platform, decides whether the
/// trend repacking applies. A trend candidate without a [`TrendSignal`] is
/// defaulted rather than rejected.
///
/// [`TrendSignal`]: crate::TrendSignal
#[must_use]
pub fn normalize_candidates(
    source: Platform,
    candidates: &[WorkflowCandidate],
) -> Vec<NormalizedWorkflow> {
    candidates
        .iter()
        .map(|candidate| normalize_one(source, candidate))
        .collect()
}

fn normalize_one(source: Platform, candidate: &WorkflowCandidate) -> NormalizedWorkflow {
    let (views, likes, comments, meta_data) = if source.uses_trend_metadata() {
        let metadata = match &candidate.trend {
            Some(signal) => TrendMetadata {
                trend_growth_percent: Some(signal.growth_percent),
                trend_direction: Some(signal.direction.to_string()),
                trend_description: Some(signal.description.clone()),
            },
            None => {
                #[allow(clippy::cast_precision_loss)]
                let growth = candidate.likes as f64;
                TrendMetadata {
                    trend_growth_percent: Some(growth),
                    trend_direction: Some("N/A".to_string()),
                    trend_description: None,
                }
            }
        };
        // Serializing a struct of plain options cannot fail.
        let blob = serde_json::to_value(metadata).unwrap_or(Value::Null);
        (0, 0, 0, Some(blob))
    } else {
        (candidate.views, candidate.likes, candidate.comments, None)
    };

    NormalizedWorkflow {
        name: candidate.name.clone(),
        platform: candidate.platform.label().to_string(),
        url: candidate.url.clone(),
        country: candidate.country.clone(),
        views,
        likes,
        comments,
        popularity_score: candidate.popularity_score,
        meta_data,
    }
}

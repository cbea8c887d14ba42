//! `GET /api/workflows`: ranked workflows, reshaped per platform.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use flowpulse_core::{Platform, TrendMetadata};
use flowpulse_db::WorkflowRow;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct WorkflowsQuery {
    pub platform: Option<String>,
    pub limit: Option<i64>,
}

/// Platform-specific evidence block.
///
/// Trend rows surface what was packed into `meta_data`; every other
/// platform, including unknown tags, surfaces the raw counters.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub(super) enum Evidence {
    Trend {
        popularity_index: f64,
        growth_percentage: Option<f64>,
        trend_direction: Option<String>,
        insight: Option<String>,
    },
    Engagement {
        views: i64,
        likes: i64,
        comments: i64,
        engagement_score: f64,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct WorkflowItem {
    workflow: String,
    platform: String,
    country: String,
    evidence: Evidence,
    link: String,
}

#[derive(Debug, Serialize)]
pub(super) struct WorkflowsResponse {
    count: usize,
    results: Vec<WorkflowItem>,
}

impl Evidence {
    fn from_row(row: &WorkflowRow) -> Self {
        let is_trend = Platform::from_label(&row.platform).is_some_and(Platform::uses_trend_metadata);
        if is_trend {
            let meta = TrendMetadata::from_stored(row.meta_data.as_ref());
            Evidence::Trend {
                popularity_index: row.popularity_score,
                growth_percentage: meta.trend_growth_percent,
                trend_direction: meta.trend_direction,
                insight: meta.trend_description,
            }
        } else {
            Evidence::Engagement {
                views: row.views,
                likes: row.likes,
                comments: row.comments,
                engagement_score: row.popularity_score,
            }
        }
    }
}

impl From<WorkflowRow> for WorkflowItem {
    fn from(row: WorkflowRow) -> Self {
        let evidence = Evidence::from_row(&row);
        Self {
            workflow: row.name,
            platform: row.platform,
            country: row.country,
            evidence,
            link: row.url,
        }
    }
}

pub(super) async fn list_workflows(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<WorkflowsQuery>, QueryRejection>,
) -> Result<Json<WorkflowsResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected workflows query");
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "limit must be an integer",
        )
    })?;

    let platform = query
        .platform
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let rows = flowpulse_db::list_workflows(&state.pool, platform, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let results: Vec<WorkflowItem> = rows.into_iter().map(WorkflowItem::from).collect();
    Ok(Json(WorkflowsResponse {
        count: results.len(),
        results,
    }))
}

//! One ingestion pass across the selected sources.
//!
//! Sources run strictly one after another. Each source is fetched,
//! normalized, and persisted before the next one starts; a failure in one
//! source is logged and never affects its siblings.

use flowpulse_core::{normalize_candidates, AppConfig, Platform, WorkflowCandidate};
use flowpulse_sources::{
    ForumClient, ForumConfig, SourceError, TrendsClient, TrendsConfig, YoutubeClient,
    YoutubeConfig,
};

/// What happened to one source during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceOutcome {
    pub platform: Platform,
    pub fetched: usize,
    /// Rows written; `None` for dry runs and failed persists.
    pub saved: Option<u64>,
    pub error: Option<String>,
}

/// Run every source in `platforms` in order and persist each batch.
///
/// Fetch errors yield an empty batch; persist errors roll back that source's
/// batch only. With `dry_run` nothing is written.
pub(crate) async fn run_ingestion(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    platforms: &[Platform],
    dry_run: bool,
) -> Vec<SourceOutcome> {
    let mut outcomes = Vec::with_capacity(platforms.len());

    for &platform in platforms {
        let mut fetch_error = None;
        let candidates = match fetch_source(config, platform).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(source = %platform, error = %e, "source fetch failed");
                fetch_error = Some(e.to_string());
                Vec::new()
            }
        };

        let rows = normalize_candidates(platform, &candidates);
        let mut outcome = SourceOutcome {
            platform,
            fetched: rows.len(),
            saved: None,
            error: fetch_error,
        };

        if dry_run {
            tracing::info!(source = %platform, count = rows.len(), "dry-run: skipping persist");
        } else if rows.is_empty() {
            tracing::info!(source = %platform, "no data to save");
            outcome.saved = Some(0);
        } else {
            match flowpulse_db::upsert_workflows(pool, &rows).await {
                Ok(saved) => {
                    tracing::info!(source = %platform, saved, "saved workflows");
                    outcome.saved = Some(saved);
                }
                Err(e) => {
                    tracing::error!(source = %platform, error = %e, "persist failed; batch rolled back");
                    outcome.error = Some(e.to_string());
                }
            }
        }

        outcomes.push(outcome);
    }

    outcomes
}

async fn fetch_source(
    config: &AppConfig,
    platform: Platform,
) -> Result<Vec<WorkflowCandidate>, SourceError> {
    match platform {
        Platform::YouTube => {
            let Some(youtube) = YoutubeConfig::from_app_config(config) else {
                tracing::warn!(source = %platform, "YOUTUBE_API_KEY not set; skipping");
                return Ok(Vec::new());
            };
            YoutubeClient::new(youtube)?.fetch_workflows().await
        }
        Platform::Forum => {
            let client =
                ForumClient::with_base_url(ForumConfig::from_app_config(config), &config.forum_base_url)?;
            Ok(client.fetch_workflows().await)
        }
        Platform::GoogleTrends => {
            let client = TrendsClient::new(TrendsConfig::from_app_config(config))?;
            Ok(client.fetch_workflows().await)
        }
    }
}

pub(crate) fn print_summary(outcomes: &[SourceOutcome], dry_run: bool) {
    for outcome in outcomes {
        let label = outcome.platform.label();
        match (&outcome.error, outcome.saved) {
            (Some(error), _) if outcome.fetched == 0 => {
                println!("[{label}] fetch failed: {error}");
            }
            (Some(error), None) => {
                println!("[{label}] fetched {} records; save failed: {error}", outcome.fetched);
            }
            (_, Some(saved)) => {
                println!("[{label}] fetched {} records; saved {saved}", outcome.fetched);
            }
            (_, None) => {
                let note = if dry_run { " (dry run)" } else { "" };
                println!("[{label}] fetched {} records{note}", outcome.fetched);
            }
        }
    }
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;

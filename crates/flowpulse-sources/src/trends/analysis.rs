//! Growth-window analysis over a 0–100 interest series.

use flowpulse_core::{TrendDirection, TrendSignal};

/// Series longer than this are daily; anything shorter is weekly.
const DAILY_THRESHOLD: usize = 80;
const DAILY_WINDOW: usize = 30;
const WEEKLY_WINDOW: usize = 4;

/// Result of comparing the recent window against the one before it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendAnalysis {
    pub growth_percent: f64,
    /// Last point of the series.
    pub current: f64,
    /// `current + growth_percent * 2`.
    pub popularity_score: f64,
    pub direction: TrendDirection,
    pub description: String,
}

impl TrendAnalysis {
    #[must_use]
    pub fn signal(&self) -> TrendSignal {
        TrendSignal {
            growth_percent: self.growth_percent,
            direction: self.direction,
            description: self.description.clone(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f64;
    values.iter().sum::<f64>() / len
}

/// Percentage change from `prior` to `recent`.
///
/// A zero prior mean yields `100.0` when the recent mean is positive and
/// `0.0` otherwise.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn growth_percent(recent_mean: f64, prior_mean: f64) -> f64 {
    if prior_mean == 0.0 {
        if recent_mean > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (recent_mean - prior_mean) / prior_mean * 100.0
    }
}

/// Analyze an interest series. Returns `None` for an empty series.
///
/// The recent window is the last 30 points for daily data (more than 80
/// points) and the last 4 for weekly data; the prior window is the same
/// number of points immediately before it, clamped at the series start.
#[must_use]
pub fn analyze_series(series: &[f64]) -> Option<TrendAnalysis> {
    let current = *series.last()?;

    let daily = series.len() > DAILY_THRESHOLD;
    let window = if daily { DAILY_WINDOW } else { WEEKLY_WINDOW };

    let recent_start = series.len().saturating_sub(window);
    let prior_start = recent_start.saturating_sub(window);
    let recent = &series[recent_start..];
    let prior = &series[prior_start..recent_start];

    let growth = growth_percent(mean(recent), mean(prior));
    let direction = TrendDirection::from_growth(growth);
    let span = if daily { "30 days" } else { "4 weeks" };

    Some(TrendAnalysis {
        growth_percent: growth,
        current,
        popularity_score: current + growth * 2.0,
        direction,
        description: format!("{direction} {growth:.1}% in last {span}"),
    })
}

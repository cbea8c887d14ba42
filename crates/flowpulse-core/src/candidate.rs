use std::fmt;

use crate::platform::Platform;

/// Country value used when a source carries no locale signal.
pub const GLOBAL_COUNTRY: &str = "Global";

/// Direction of a keyword's interest trend. Zero growth counts as `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    #[must_use]
    pub fn from_growth(growth_percent: f64) -> Self {
        if growth_percent > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Up => "UP",
            TrendDirection::Down => "DOWN",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend-only signal carried alongside a candidate until normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSignal {
    pub growth_percent: f64,
    pub direction: TrendDirection,
    /// Human-readable summary, e.g. `UP 50.0% in last 30 days`.
    pub description: String,
}

/// One adapter output record, before it is mapped onto the storage schema.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowCandidate {
    pub name: String,
    pub url: String,
    pub platform: Platform,
    pub country: String,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub popularity_score: f64,
    pub trend: Option<TrendSignal>,
}

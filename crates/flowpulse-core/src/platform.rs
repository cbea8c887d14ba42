//! Source platform tags stored in `workflows.platform`.
//!
//! The `views`, `likes` and `comments` columns carry different meanings per
//! platform:
//!
//! | Platform        | `views`    | `likes`          | `comments`     | `meta_data`          |
//! |-----------------|------------|------------------|----------------|----------------------|
//! | `YouTube`       | view count | like count       | comment count  | `NULL`               |
//! | `n8n Forum`     | always 0   | liked proxy, 0/1 | reply count    | `NULL`               |
//! | `Google Trends` | always 0   | always 0         | always 0       | [`TrendMetadata`]    |
//!
//! [`TrendMetadata`]: crate::TrendMetadata

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
    Forum,
    GoogleTrends,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::YouTube, Platform::Forum, Platform::GoogleTrends];

    /// The label persisted in the `platform` column and accepted by the API filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Forum => "n8n Forum",
            Platform::GoogleTrends => "Google Trends",
        }
    }

    /// Resolve a stored label. Unknown labels return `None`; callers treat
    /// those rows as generic engagement records.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    /// Whether this platform packs its signal into `meta_data` instead of the counters.
    #[must_use]
    pub const fn uses_trend_metadata(self) -> bool {
        matches!(self, Platform::GoogleTrends)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

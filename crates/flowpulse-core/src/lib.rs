//! Shared domain types and configuration for flowpulse.
//!
//! Adapters produce [`WorkflowCandidate`]s, [`normalize_candidates`] maps them
//! onto the `workflows` storage shape, and every binary builds one
//! [`AppConfig`] at startup via [`load_app_config`].

pub mod app_config;
pub mod candidate;
pub mod config;
pub mod normalize;
pub mod platform;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use candidate::{TrendDirection, TrendSignal, WorkflowCandidate, GLOBAL_COUNTRY};
pub use config::{load_app_config, load_app_config_from_env};
pub use normalize::{normalize_candidates, NormalizedWorkflow, TrendMetadata};
pub use platform::Platform;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

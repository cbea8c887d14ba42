use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_TRENDS_KEYWORDS: &str =
    "n8n workflow,n8n automation,n8n tutorial,n8n vs zapier,n8n integration";

/// Read `.env` (if any), then build [`AppConfig`] from the process environment.
///
/// # Errors
///
/// Returns [`ConfigError`] when `DATABASE_URL` is unset or a variable does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// Returns [`ConfigError`] when `DATABASE_URL` is unset or a variable does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Typed accessors over an env-style lookup.
struct EnvSource<F> {
    lookup: F,
}

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    fn required(&self, var: &str) -> Result<String, ConfigError> {
        (self.lookup)(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    }

    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).ok().filter(|v| !v.trim().is_empty())
    }

    fn string(&self, var: &str, default: &str) -> String {
        (self.lookup)(var).unwrap_or_else(|_| default.to_string())
    }

    fn parsed<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.string(var, default)
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(var, e))
    }

    fn list(&self, var: &str, default: &str) -> Result<Vec<String>, ConfigError> {
        let items = split_list(&self.string(var, default));
        if items.is_empty() {
            return Err(invalid(var, "list must contain at least one entry"));
        }
        Ok(items)
    }
}

fn invalid(var: &str, reason: impl Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

/// Assemble [`AppConfig`] from `lookup`, which tests drive with a plain map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = EnvSource { lookup };

    let trends_pause_min_ms: u64 = env.parsed("FLOWPULSE_TRENDS_PAUSE_MIN_MS", "2000")?;
    let trends_pause_max_ms: u64 = env.parsed("FLOWPULSE_TRENDS_PAUSE_MAX_MS", "5000")?;
    if trends_pause_max_ms < trends_pause_min_ms {
        return Err(invalid(
            "FLOWPULSE_TRENDS_PAUSE_MAX_MS",
            format!("must be >= FLOWPULSE_TRENDS_PAUSE_MIN_MS ({trends_pause_min_ms})"),
        ));
    }

    Ok(AppConfig {
        database_url: env.required("DATABASE_URL")?,
        env: parse_environment(&env.string("FLOWPULSE_ENV", "development")),
        bind_addr: env.parsed("FLOWPULSE_BIND_ADDR", "0.0.0.0:5000")?,
        log_level: env.string("FLOWPULSE_LOG_LEVEL", "info"),

        db_max_connections: env.parsed("FLOWPULSE_DB_MAX_CONNECTIONS", "10")?,
        db_min_connections: env.parsed("FLOWPULSE_DB_MIN_CONNECTIONS", "1")?,
        db_acquire_timeout_secs: env.parsed("FLOWPULSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?,

        http_timeout_secs: env.parsed("FLOWPULSE_HTTP_TIMEOUT_SECS", "10")?,
        user_agent: env.string("FLOWPULSE_USER_AGENT", "n8n-popularity-bot/1.0"),

        youtube_api_key: env.optional("YOUTUBE_API_KEY"),
        youtube_query: env.string("FLOWPULSE_YOUTUBE_QUERY", "n8n popular workflows"),
        youtube_max_results: env.parsed("FLOWPULSE_YOUTUBE_MAX_RESULTS", "50")?,
        youtube_region: env.string("FLOWPULSE_YOUTUBE_REGION", "US"),

        forum_base_url: env.string("FLOWPULSE_FORUM_BASE_URL", "https://community.n8n.io"),
        forum_query: env.string("FLOWPULSE_FORUM_QUERY", "workflow"),
        forum_max_pages: env.parsed("FLOWPULSE_FORUM_MAX_PAGES", "4")?,
        forum_page_delay_ms: env.parsed("FLOWPULSE_FORUM_PAGE_DELAY_MS", "1200")?,

        trends_keywords: env.list("FLOWPULSE_TRENDS_KEYWORDS", DEFAULT_TRENDS_KEYWORDS)?,
        trends_geos: env.list("FLOWPULSE_TRENDS_GEOS", "US,IN")?,
        trends_pause_min_ms,
        trends_pause_max_ms,
    })
}

/// `production` and `test` are recognised; anything else is development.
fn parse_environment(s: &str) -> Environment {
    match s.trim().to_ascii_lowercase().as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Split a comma-separated env value, trimming entries and dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, built once at startup and passed down explicitly.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub youtube_api_key: Option<String>,
    pub youtube_query: String,
    pub youtube_max_results: u32,
    pub youtube_region: String,
    pub forum_base_url: String,
    pub forum_query: String,
    pub forum_max_pages: u32,
    pub forum_page_delay_ms: u64,
    pub trends_keywords: Vec<String>,
    pub trends_geos: Vec<String>,
    pub trends_pause_min_ms: u64,
    pub trends_pause_max_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("youtube_query", &self.youtube_query)
            .field("youtube_max_results", &self.youtube_max_results)
            .field("youtube_region", &self.youtube_region)
            .field("forum_base_url", &self.forum_base_url)
            .field("forum_query", &self.forum_query)
            .field("forum_max_pages", &self.forum_max_pages)
            .field("forum_page_delay_ms", &self.forum_page_delay_ms)
            .field("trends_keywords", &self.trends_keywords)
            .field("trends_geos", &self.trends_geos)
            .field("trends_pause_min_ms", &self.trends_pause_min_ms)
            .field("trends_pause_max_ms", &self.trends_pause_max_ms)
            .finish()
    }
}

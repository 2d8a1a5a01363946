use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key sent to the news API (default: empty)
    pub news_api_key: String,
    /// News API search endpoint (default: "https://newsapi.org/v2/everything")
    pub news_api_url: String,
    /// Path to SQLite database file (default: "headlines.db")
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Maximum number of cached article records (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Per-call budget for cache and store calls in milliseconds (default: 2,000)
    pub tier_timeout_ms: u64,
    /// Per-request budget for news API calls in milliseconds (default: 10,000)
    pub upstream_timeout_ms: u64,
    /// Capacity of the view counter queue (default: 1,024)
    pub view_queue_capacity: usize,
    /// View increments applied at the same time (default: 8)
    pub view_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `NEWS_API_KEY` - News API key (default: "")
    /// - `NEWS_API_URL` - News API endpoint (default: "https://newsapi.org/v2/everything")
    /// - `SQLITE_PATH` - SQLite database path (default: "headlines.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_MAX_ENTRIES` - Maximum cached records (default: 10,000)
    /// - `TIER_TIMEOUT_MS` - Cache/store call timeout (default: 2,000)
    /// - `UPSTREAM_TIMEOUT_MS` - News API request timeout (default: 10,000)
    /// - `VIEW_QUEUE_CAPACITY` - Pending view increments (default: 1,024)
    /// - `VIEW_CONCURRENCY` - View increments applied at once (default: 8)
    pub fn from_env() -> Self {
        Self {
            news_api_key: env::var("NEWS_API_KEY").unwrap_or_default(),
            news_api_url: env::var("NEWS_API_URL")
                .unwrap_or_else(|_| "https://newsapi.org/v2/everything".to_string()),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "headlines.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(10_000),
            tier_timeout_ms: parse_var("TIER_TIMEOUT_MS").unwrap_or(2_000),
            upstream_timeout_ms: parse_var("UPSTREAM_TIMEOUT_MS").unwrap_or(10_000),
            view_queue_capacity: parse_var("VIEW_QUEUE_CAPACITY").unwrap_or(1_024),
            view_concurrency: parse_var("VIEW_CONCURRENCY").unwrap_or(8),
        }
    }

    /// Get the cache/store call timeout as a Duration.
    pub fn tier_timeout(&self) -> Duration {
        Duration::from_millis(self.tier_timeout_ms)
    }

    /// Get the news API request timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

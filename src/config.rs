//! Runtime configuration read from the process environment.
//!
//! The only credential is the optional news API key; everything else has a
//! working default so the dashboard runs with an empty environment.

use std::env;
use std::time::Duration;

pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const POLYMARKET_GRAPHQL_URL: &str = "https://polybetamarket-production.up.railway.app/graphql";
pub const GNEWS_API_BASE: &str = "https://gnews.io/api/v4";
pub const REDDIT_API_BASE: &str = "https://www.reddit.com";

pub const USER_AGENT: &str = "SignalDashboard/0.1";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Freshness window per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub prices: Duration,
    pub markets: Duration,
    pub news: Duration,
    pub social: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            prices: Duration::from_secs(60),
            markets: Duration::from_secs(120),
            news: Duration::from_secs(300),
            social: Duration::from_secs(300),
        }
    }
}

impl CacheTtls {
    /// Every fetch goes upstream.
    pub fn disabled() -> Self {
        Self {
            prices: Duration::ZERO,
            markets: Duration::ZERO,
            news: Duration::ZERO,
            social: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gnews_api_key: Option<String>,
    pub coingecko_api_base: String,
    pub polymarket_graphql_url: String,
    pub gnews_api_base: String,
    pub reddit_api_base: String,
    pub http_timeout: Duration,
    pub refresh_interval: Duration,
    pub cache_ttls: CacheTtls,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gnews_api_key: None,
            coingecko_api_base: COINGECKO_API_BASE.to_string(),
            polymarket_graphql_url: POLYMARKET_GRAPHQL_URL.to_string(),
            gnews_api_base: GNEWS_API_BASE.to_string(),
            reddit_api_base: REDDIT_API_BASE.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            cache_ttls: CacheTtls::default(),
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and then reads the environment.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so tests need not touch the real environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gnews_api_key = non_empty("GNEWS_API_KEY");
        if gnews_api_key.is_none() {
            tracing::warn!("GNEWS_API_KEY not set, news feed will serve fallback articles");
        }

        Self {
            gnews_api_key,
            coingecko_api_base: non_empty("COINGECKO_API_BASE").unwrap_or(defaults.coingecko_api_base),
            polymarket_graphql_url: non_empty("POLYMARKET_GRAPHQL_URL")
                .unwrap_or(defaults.polymarket_graphql_url),
            gnews_api_base: non_empty("GNEWS_API_BASE").unwrap_or(defaults.gnews_api_base),
            reddit_api_base: non_empty("REDDIT_API_BASE").unwrap_or(defaults.reddit_api_base),
            http_timeout: secs_or(non_empty("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", defaults.http_timeout),
            refresh_interval: secs_or(
                non_empty("REFRESH_INTERVAL_SECS"),
                "REFRESH_INTERVAL_SECS",
                defaults.refresh_interval,
            ),
            cache_ttls: defaults.cache_ttls,
        }
    }
}

fn secs_or(raw: Option<String>, key: &str, default: Duration) -> Duration {
    match raw {
        None => default,
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                tracing::warn!(key, value = %value, "Invalid duration, using default");
                default
            }
        },
    }
}

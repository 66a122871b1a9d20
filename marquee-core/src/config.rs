//! Centralized configuration for Marquee.
//!
//! All tunable parameters are defined here to avoid hard-coded values
//! scattered throughout the workspace.

use std::time::Duration;

use url::Url;

use crate::{MarqueeError, Result};

/// Central configuration for all Marquee components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub aggregator: AggregatorConfig,
    pub tmdb: TmdbConfig,
}

/// Limits applied by the movie aggregator to derived lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Upper bound on similar movies returned per movie
    pub maximum_similar_movies: usize,
    /// Upper bound on reviews returned per movie
    pub maximum_reviews: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            maximum_similar_movies: 3,
            maximum_reviews: 1,
        }
    }
}

/// Connection settings for The Movie Database API.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API root, must end with a slash so relative endpoints join below it
    pub base_url: String,
    /// v3 API key sent as `api_key` query parameter
    pub api_key: Option<String>,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
    /// Prefix for poster image paths
    pub poster_cdn_url: String,
    /// Prefix for reviewer avatar paths
    pub avatar_cdn_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3/".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            user_agent: "marquee/0.1.0",
            poster_cdn_url: "https://image.tmdb.org/t/p/w185".to_string(),
            avatar_cdn_url: "https://image.tmdb.org/t/p/w45".to_string(),
        }
    }
}

impl TmdbConfig {
    /// Parses the base URL, appending the trailing slash when missing.
    ///
    /// # Errors
    ///
    /// - `MarqueeError::Configuration` - If the base URL is not an absolute http(s) URL
    pub fn parsed_base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }

        let url = Url::parse(&raw).map_err(|e| MarqueeError::Configuration {
            reason: format!("invalid TMDB base URL '{}': {e}", self.base_url),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(MarqueeError::Configuration {
                reason: format!("unsupported TMDB base URL scheme '{scheme}'"),
            }),
        }
    }

    /// Returns the configured API key when it is present and non-blank.
    ///
    /// # Errors
    ///
    /// - `MarqueeError::Configuration` - If no usable API key is configured
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(MarqueeError::Configuration {
                reason: "TMDB API key is missing, set MARQUEE_TMDB_API_KEY".to_string(),
            }),
        }
    }

    /// Full poster URL for a poster path.
    pub fn poster_url(&self, path: &str) -> String {
        format!("{}{path}", self.poster_cdn_url)
    }

    /// Full avatar URL for an avatar path.
    pub fn avatar_url(&self, path: &str) -> String {
        format!("{}{path}", self.avatar_cdn_url)
    }
}

impl MarqueeConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(count) = std::env::var("MARQUEE_MAX_SIMILAR_MOVIES")
            && let Ok(count) = count.parse::<usize>()
        {
            config.aggregator.maximum_similar_movies = count;
        }

        if let Ok(count) = std::env::var("MARQUEE_MAX_REVIEWS")
            && let Ok(count) = count.parse::<usize>()
        {
            config.aggregator.maximum_reviews = count;
        }

        if let Ok(api_key) = std::env::var("MARQUEE_TMDB_API_KEY")
            && !api_key.trim().is_empty()
        {
            config.tmdb.api_key = Some(api_key);
        }

        if let Ok(base_url) = std::env::var("MARQUEE_TMDB_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.tmdb.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("MARQUEE_TMDB_TIMEOUT")
            && let Ok(seconds) = timeout.parse::<u64>()
        {
            config.tmdb.request_timeout = Duration::from_secs(seconds);
        }

        config
    }

    /// Creates a configuration pointing the API client at a local test server.
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            tmdb: TmdbConfig {
                base_url: base_url.to_string(),
                api_key: Some("test-api-key".to_string()),
                request_timeout: Duration::from_secs(2),
                ..TmdbConfig::default()
            },
            ..Default::default()
        }
    }
}

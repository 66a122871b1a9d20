//! Marquee Core - Movie aggregation and pagination
//!
//! This crate holds the browsing state machine behind Marquee: domain
//! records, the [`MovieSource`] contract for remote movie data, the
//! [`MovieAggregator`] that decides which page to fetch next, the
//! [`BrowsingController`] that maps UI events onto it, plus configuration
//! and tracing setup shared by the workspace.

pub mod aggregator;
pub mod config;
pub mod controller;
pub mod models;
pub mod sanitize;
pub mod source;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use aggregator::MovieAggregator;
pub use config::{AggregatorConfig, MarqueeConfig, TmdbConfig};
pub use controller::{BrowseOutcome, BrowsingController};
pub use models::{
    GenreTable, MoviePreview, MovieSummary, Review, Video, VideoProvider, VideoType,
};
pub use sanitize::sanitize_html;
pub use source::MovieSource;

/// Errors that can bubble up while setting up a Marquee session.
///
/// Browsing itself never fails; these cover configuration and startup.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("API client error: {reason}")]
    ApiClient { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarqueeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            MarqueeError::ApiClient { .. } => "Could not set up the movie API client".to_string(),
            MarqueeError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input or configuration.
    pub fn is_user_error(&self) -> bool {
        matches!(self, MarqueeError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let error = MarqueeError::Configuration {
            reason: "missing key".to_string(),
        };
        assert_eq!(error.user_message(), "Invalid configuration: missing key");
        assert!(error.is_user_error());

        let error = MarqueeError::ApiClient {
            reason: "tls".to_string(),
        };
        assert!(!error.is_user_error());
        assert_eq!(error.to_string(), "API client error: tls");
    }
}

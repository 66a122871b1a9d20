//! Error types for the movie API client.

use marquee_core::MarqueeError;
use thiserror::Error;

/// Errors that can occur while talking to the movie API.
///
/// These never leave the client through the `MovieSource` trait; they are
/// logged and turned into empty results there.
#[derive(Debug, Error)]
pub enum MovieApiError {
    /// The request could not be sent or the connection failed.
    #[error("Network error for '{endpoint}': {reason}")]
    NetworkError {
        /// Endpoint path relative to the API root
        endpoint: String,
        /// The reason for the network error
        reason: String,
    },

    /// The API answered with a non-success status code.
    #[error("HTTP error {status} for '{endpoint}'")]
    HttpStatus {
        /// Endpoint path relative to the API root
        endpoint: String,
        /// Returned status code
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("Parse error for '{endpoint}': {reason}")]
    ParseError {
        /// Endpoint path relative to the API root
        endpoint: String,
        /// The reason for the parse error
        reason: String,
    },

    /// The client configuration is unusable.
    #[error("Invalid client configuration: {reason}")]
    Configuration {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl From<MovieApiError> for MarqueeError {
    fn from(error: MovieApiError) -> Self {
        match error {
            MovieApiError::Configuration { reason } => MarqueeError::Configuration { reason },
            other => MarqueeError::ApiClient {
                reason: other.to_string(),
            },
        }
    }
}

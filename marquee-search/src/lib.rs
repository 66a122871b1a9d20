//! Marquee Search - Remote movie data
//!
//! Provides the TMDB API client that feeds the movie aggregator, the
//! normalization of TMDB records into Marquee's domain records, and an
//! offline demo source.

#![warn(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]

pub mod errors;
pub mod providers;
mod types;

// Re-export main types
pub use errors::MovieApiError;
pub use providers::{DemoSource, TmdbClient};

/// Convenience type alias for Results with MovieApiError.
pub type Result<T> = std::result::Result<T, MovieApiError>;

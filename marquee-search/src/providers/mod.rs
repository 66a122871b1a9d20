//! Movie source implementations.
//!
//! Sources implement [`marquee_core::MovieSource`]: the TMDB HTTP client for
//! real data and a demo source with a fixed catalog for offline development.

pub mod demo;
pub mod tmdb;

pub use demo::DemoSource;
pub use tmdb::TmdbClient;

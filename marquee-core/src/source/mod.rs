//! Contract between the aggregator and remote movie data.

use async_trait::async_trait;

use crate::models::{GenreTable, MoviePreview, MovieSummary, Review, Video};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{ScriptedSource, SourceCall, movie};

/// Source of normalized movie records.
///
/// Implementations are fail-safe: transport or decoding failures are handled
/// inside the implementation and surface as an empty result. Callers can
/// therefore not tell "nothing there" apart from "request failed".
#[async_trait]
pub trait MovieSource: Send + Sync + std::fmt::Debug {
    /// One page of the "now playing" feed. Pages start at 1.
    async fn now_playing(&self, page: u32) -> Vec<MovieSummary>;

    /// One page of free-text search results. Pages start at 1.
    async fn search_movies(&self, query: &str, page: u32) -> Vec<MovieSummary>;

    /// Complete genre lookup table.
    async fn genres(&self) -> GenreTable;

    /// All videos attached to a movie, in upstream order.
    async fn videos(&self, movie_id: &str) -> Vec<Video>;

    /// Movies similar to the given one, in upstream order.
    async fn similar(&self, movie_id: &str) -> Vec<MoviePreview>;

    /// Reviews of a movie, in upstream order, content not yet sanitized.
    async fn reviews(&self, movie_id: &str) -> Vec<Review>;
}

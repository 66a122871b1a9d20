//! Scripted in-memory movie source for tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::MovieSource;
use crate::models::{GenreTable, MoviePreview, MovieSummary, Review, Video};

/// Request observed by a [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    NowPlaying(u32),
    Search(String, u32),
    Genres,
    Videos(String),
    Similar(String),
    Reviews(String),
}

/// Movie source answering from pre-registered pages.
///
/// Pages are 1-based; any page or movie that was not registered yields an
/// empty result, mirroring how a real source reports exhaustion or failure.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    now_playing: Vec<Vec<MovieSummary>>,
    searches: HashMap<String, Vec<Vec<MovieSummary>>>,
    genres: GenreTable,
    videos: HashMap<String, Vec<Video>>,
    similar: HashMap<String, Vec<MoviePreview>>,
    reviews: HashMap<String, Vec<Review>>,
    latency: Option<Duration>,
    calls: Mutex<Vec<SourceCall>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the now-playing pages, page 1 first.
    pub fn with_now_playing(mut self, pages: Vec<Vec<MovieSummary>>) -> Self {
        self.now_playing = pages;
        self
    }

    /// Registers search result pages for an exact query.
    pub fn with_search(mut self, query: &str, pages: Vec<Vec<MovieSummary>>) -> Self {
        self.searches.insert(query.to_string(), pages);
        self
    }

    pub fn with_genres(mut self, genres: GenreTable) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_videos(mut self, movie_id: &str, videos: Vec<Video>) -> Self {
        self.videos.insert(movie_id.to_string(), videos);
        self
    }

    pub fn with_similar(mut self, movie_id: &str, similar: Vec<MoviePreview>) -> Self {
        self.similar.insert(movie_id.to_string(), similar);
        self
    }

    pub fn with_reviews(mut self, movie_id: &str, reviews: Vec<Review>) -> Self {
        self.reviews.insert(movie_id.to_string(), reviews);
        self
    }

    /// Delays every answer, so that concurrent callers overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Requests received so far, in arrival order.
    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn record(&self, call: SourceCall) {
        self.calls.lock().push(call);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn page(pages: &[Vec<MovieSummary>], page: u32) -> Vec<MovieSummary> {
        page.checked_sub(1)
            .and_then(|index| pages.get(index as usize))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl MovieSource for ScriptedSource {
    async fn now_playing(&self, page: u32) -> Vec<MovieSummary> {
        self.record(SourceCall::NowPlaying(page)).await;
        Self::page(&self.now_playing, page)
    }

    async fn search_movies(&self, query: &str, page: u32) -> Vec<MovieSummary> {
        self.record(SourceCall::Search(query.to_string(), page)).await;
        self.searches
            .get(query)
            .map(|pages| Self::page(pages, page))
            .unwrap_or_default()
    }

    async fn genres(&self) -> GenreTable {
        self.record(SourceCall::Genres).await;
        self.genres.clone()
    }

    async fn videos(&self, movie_id: &str) -> Vec<Video> {
        self.record(SourceCall::Videos(movie_id.to_string())).await;
        self.videos.get(movie_id).cloned().unwrap_or_default()
    }

    async fn similar(&self, movie_id: &str) -> Vec<MoviePreview> {
        self.record(SourceCall::Similar(movie_id.to_string())).await;
        self.similar.get(movie_id).cloned().unwrap_or_default()
    }

    async fn reviews(&self, movie_id: &str) -> Vec<Review> {
        self.record(SourceCall::Reviews(movie_id.to_string())).await;
        self.reviews.get(movie_id).cloned().unwrap_or_default()
    }
}

/// Builds a movie with the given id and title and neutral defaults elsewhere.
pub fn movie(id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        id: id.to_string(),
        poster_path: None,
        title: title.to_string(),
        release_date: "2024-01-01".to_string(),
        genre_ids: Vec::new(),
        vote_average: 0.0,
        overview: String::new(),
    }
}

//! Movie aggregation and pagination state.
//!
//! [`MovieAggregator`] is the single source of truth for which movies are
//! currently listed and which page comes next. It knows two mutually
//! exclusive browsing modes:
//!
//! - **now playing**: the paginated "currently in theaters" feed
//! - **search**: paginated results for one free-text query
//!
//! Each mode has its own page cursor. Switching modes resets both cursors to
//! 1 and discards the accumulated listing, so results of different modes or
//! different queries are never mixed.
//!
//! Page advances are serialized by an internal async guard that is held for
//! the whole call including the network round trip. Concurrent callers queue
//! up in arrival order instead of interleaving cursor updates and appends.
//!
//! The source reports failures as empty results, so an empty page means
//! either "no more pages" or "request failed". The aggregator cannot and does
//! not distinguish the two.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::AggregatorConfig;
use crate::models::{
    GenreTable, MoviePreview, MovieSummary, Review, Video, VideoProvider, VideoType,
};
use crate::sanitize::sanitize_html;
use crate::source::MovieSource;

/// Mutable browsing state guarded by the aggregator.
#[derive(Debug)]
struct BrowseState {
    movies: Vec<MovieSummary>,
    seen_ids: HashSet<String>,
    now_playing_cursor: u32,
    search_cursor: u32,
    active_query: Option<String>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            seen_ids: HashSet::new(),
            now_playing_cursor: 1,
            search_cursor: 1,
            active_query: None,
        }
    }
}

impl BrowseState {
    /// Starts a fresh browsing session in whichever mode the caller sets next.
    fn reset(&mut self) {
        self.movies.clear();
        self.seen_ids.clear();
        self.now_playing_cursor = 1;
        self.search_cursor = 1;
        self.active_query = None;
    }

    /// Appends movies in upstream order, dropping ids already listed.
    fn merge(&mut self, incoming: Vec<MovieSummary>) {
        let mut duplicates = 0usize;
        for movie in incoming {
            if self.seen_ids.insert(movie.id.clone()) {
                self.movies.push(movie);
            } else {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            debug!(duplicates, "Dropped movies already present in listing");
        }
    }
}

/// Aggregates paginated movie data from a [`MovieSource`].
///
/// One instance lives per browsing session. Share it through an `Arc`.
#[derive(Debug)]
pub struct MovieAggregator {
    source: Arc<dyn MovieSource>,
    config: AggregatorConfig,
    state: RwLock<BrowseState>,
    genres: RwLock<GenreTable>,
    advance_guard: Mutex<()>,
}

impl MovieAggregator {
    /// Creates an aggregator in now-playing mode with both cursors at page 1.
    pub fn new(source: Arc<dyn MovieSource>, config: AggregatorConfig) -> Self {
        Self {
            source,
            config,
            state: RwLock::new(BrowseState::default()),
            genres: RwLock::new(GenreTable::new()),
            advance_guard: Mutex::new(()),
        }
    }

    /// Loads the next now-playing page.
    ///
    /// When a search is active this returns to now-playing browsing: the
    /// query is cleared, both cursors restart at 1 and the fetched page
    /// replaces the listing. Otherwise the page at the now-playing cursor is
    /// appended and the cursor advances.
    ///
    /// Returns the number of movies received, 0 when the page was empty.
    pub async fn advance_now_playing(&self) -> usize {
        let _guard = self.advance_guard.lock().await;

        let page = {
            let mut state = self.state.write();
            if let Some(previous_query) = state.active_query.take() {
                info!(%previous_query, "Returning to now-playing browsing");
                state.reset();
            }
            state.now_playing_cursor
        };

        debug!(page, "Fetching now-playing page");
        let movies = self.source.now_playing(page).await;
        let received = movies.len();
        if received == 0 {
            debug!(page, "Now-playing page was empty");
            return 0;
        }

        let mut state = self.state.write();
        state.merge(movies);
        state.now_playing_cursor += 1;
        debug!(
            page,
            received,
            total = state.movies.len(),
            "Merged now-playing page"
        );

        received
    }

    /// Loads the next page of search results for `query`.
    ///
    /// The query is trimmed; an empty query is ignored without touching any
    /// state or the network. A query different from the active one starts a
    /// new search: both cursors restart at 1 and the fetched page replaces
    /// the listing. Repeating the active query appends the page at the search
    /// cursor and advances it.
    ///
    /// Returns the number of movies received, 0 when the page was empty.
    pub async fn advance_search(&self, query: &str) -> usize {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty search query");
            return 0;
        }

        let _guard = self.advance_guard.lock().await;

        let page = {
            let mut state = self.state.write();
            if state.active_query.as_deref() != Some(query) {
                info!(query, previous_query = ?state.active_query, "Starting new search");
                state.reset();
                state.active_query = Some(query.to_string());
            }
            state.search_cursor
        };

        debug!(query, page, "Fetching search page");
        let movies = self.source.search_movies(query, page).await;
        let received = movies.len();
        if received == 0 {
            debug!(query, page, "Search page was empty");
            return 0;
        }

        let mut state = self.state.write();
        state.merge(movies);
        state.search_cursor += 1;
        debug!(
            query,
            page,
            received,
            total = state.movies.len(),
            "Merged search page"
        );

        received
    }

    /// Fetches the genre table and replaces the stored one with it.
    ///
    /// A failed fetch yields (and stores) an empty table.
    pub async fn fetch_genre_table(&self) -> GenreTable {
        let table = self.source.genres().await;
        debug!(genres = table.len(), "Fetched genre table");
        *self.genres.write() = table.clone();
        table
    }

    /// Fetches the genre table unless one is already stored.
    pub async fn ensure_genre_table(&self) -> GenreTable {
        {
            let genres = self.genres.read();
            if !genres.is_empty() {
                return genres.clone();
            }
        }
        self.fetch_genre_table().await
    }

    /// Picks the video to show for a movie.
    ///
    /// Only Youtube-hosted videos are considered. The first trailer in
    /// upstream order wins, otherwise the first Youtube video. This is a
    /// best-effort heuristic, not a quality ranking.
    pub async fn best_video_for(&self, movie_id: &str) -> Option<Video> {
        let movie_id = movie_id.trim();
        if movie_id.is_empty() {
            return None;
        }

        let youtube: Vec<Video> = self
            .source
            .videos(movie_id)
            .await
            .into_iter()
            .filter(|video| video.video_provider == VideoProvider::Youtube)
            .collect();

        youtube
            .iter()
            .find(|video| video.video_type == VideoType::Trailer)
            .or_else(|| youtube.first())
            .cloned()
    }

    /// Similar movies, at most `maximum_similar_movies` in upstream order.
    pub async fn similar_movies_for(&self, movie_id: &str) -> Vec<MoviePreview> {
        let movie_id = movie_id.trim();
        if movie_id.is_empty() {
            return Vec::new();
        }

        let mut similar = self.source.similar(movie_id).await;
        similar.truncate(self.config.maximum_similar_movies);
        similar
    }

    /// Reviews, at most `maximum_reviews` in upstream order, with sanitized content.
    pub async fn reviews_for(&self, movie_id: &str) -> Vec<Review> {
        let movie_id = movie_id.trim();
        if movie_id.is_empty() {
            return Vec::new();
        }

        self.source
            .reviews(movie_id)
            .await
            .into_iter()
            .take(self.config.maximum_reviews)
            .map(|review| Review {
                content: sanitize_html(&review.content),
                ..review
            })
            .collect()
    }

    /// Snapshot of the current listing.
    pub fn movies(&self) -> Vec<MovieSummary> {
        self.state.read().movies.clone()
    }

    pub fn movie_count(&self) -> usize {
        self.state.read().movies.len()
    }

    /// Snapshot of the stored genre table.
    pub fn genre_table(&self) -> GenreTable {
        self.genres.read().clone()
    }

    /// Genre names of a movie, resolved against the stored table.
    pub fn genre_names(&self, movie: &MovieSummary) -> Vec<String> {
        self.genres
            .read()
            .resolve(&movie.genre_ids)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Query of the active search, `None` in now-playing mode.
    pub fn active_query(&self) -> Option<String> {
        self.state.read().active_query.clone()
    }

    /// Next now-playing page to request.
    pub fn now_playing_cursor(&self) -> u32 {
        self.state.read().now_playing_cursor
    }

    /// Next search page to request.
    pub fn search_cursor(&self) -> u32 {
        self.state.read().search_cursor
    }

    pub fn config(&self) -> AggregatorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::source::{ScriptedSource, SourceCall, movie};

    fn aggregator(source: &Arc<ScriptedSource>) -> MovieAggregator {
        aggregator_with(source, AggregatorConfig::default())
    }

    fn aggregator_with(source: &Arc<ScriptedSource>, config: AggregatorConfig) -> MovieAggregator {
        let source: Arc<dyn MovieSource> = source.clone();
        MovieAggregator::new(source, config)
    }

    fn ids(movies: &[MovieSummary]) -> Vec<&str> {
        movies.iter().map(|m| m.id.as_str()).collect()
    }

    fn video(id: &str, video_type: VideoType, video_provider: VideoProvider) -> Video {
        Video {
            id: id.to_string(),
            key: format!("key-{id}"),
            name: format!("Video {id}"),
            video_type,
            video_provider,
        }
    }

    fn review(id: &str, content: &str) -> Review {
        Review {
            id: id.to_string(),
            author_name: "Author".to_string(),
            author_username: "author".to_string(),
            rating_text: "7".to_string(),
            content: content.to_string(),
            avatar_path: None,
        }
    }

    fn preview(id: &str) -> MoviePreview {
        MoviePreview {
            id: id.to_string(),
            poster_path: None,
            title: format!("Movie {id}"),
        }
    }

    #[tokio::test]
    async fn test_now_playing_pages_until_exhausted() {
        let source = Arc::new(ScriptedSource::new().with_now_playing(vec![
            vec![movie("A", "Krav Maga Panda"), movie("B", "Four Mornings")],
            vec![movie("C", "Carebears 5"), movie("D", "Father in Law")],
        ]));
        let aggregator = aggregator(&source);

        assert_eq!(aggregator.advance_now_playing().await, 2);
        assert_eq!(aggregator.advance_now_playing().await, 2);
        assert_eq!(aggregator.advance_now_playing().await, 0);

        assert_eq!(ids(&aggregator.movies()), vec!["A", "B", "C", "D"]);
        assert_eq!(aggregator.now_playing_cursor(), 3);
        assert_eq!(
            source.calls(),
            vec![
                SourceCall::NowPlaying(1),
                SourceCall::NowPlaying(2),
                SourceCall::NowPlaying(3)
            ]
        );
    }

    #[tokio::test]
    async fn test_new_search_discards_now_playing_results() {
        let source = Arc::new(
            ScriptedSource::new()
                .with_now_playing(vec![
                    vec![movie("A", "A")],
                    vec![movie("B", "B")],
                    vec![movie("C", "C")],
                ])
                .with_search("panda", vec![vec![movie("P1", "Panda"), movie("P2", "Panda 2")]]),
        );
        let aggregator = aggregator(&source);

        for _ in 0..3 {
            aggregator.advance_now_playing().await;
        }
        assert_eq!(aggregator.now_playing_cursor(), 4);

        assert_eq!(aggregator.advance_search("panda").await, 2);

        assert_eq!(ids(&aggregator.movies()), vec!["P1", "P2"]);
        assert_eq!(aggregator.active_query().as_deref(), Some("panda"));
        assert_eq!(aggregator.search_cursor(), 2);
        assert_eq!(aggregator.now_playing_cursor(), 1);
        assert_eq!(
            source.calls().last(),
            Some(&SourceCall::Search("panda".to_string(), 1))
        );
    }

    #[tokio::test]
    async fn test_same_query_appends_next_page() {
        let source = Arc::new(ScriptedSource::new().with_search(
            "panda",
            vec![vec![movie("P1", "Panda")], vec![movie("P2", "Panda 2")]],
        ));
        let aggregator = aggregator(&source);

        aggregator.advance_search("panda").await;
        aggregator.advance_search("  panda ").await;

        assert_eq!(ids(&aggregator.movies()), vec!["P1", "P2"]);
        assert_eq!(aggregator.search_cursor(), 3);
        assert_eq!(aggregator.advance_search("panda").await, 0);
        assert_eq!(aggregator.search_cursor(), 3);
        assert_eq!(aggregator.movie_count(), 2);
    }

    #[tokio::test]
    async fn test_different_query_replaces_results() {
        let source = Arc::new(
            ScriptedSource::new()
                .with_search("panda", vec![vec![movie("P1", "Panda")], vec![movie("P2", "P")]])
                .with_search("bear", vec![vec![movie("B1", "Bear")]]),
        );
        let aggregator = aggregator(&source);

        aggregator.advance_search("panda").await;
        aggregator.advance_search("panda").await;
        assert_eq!(aggregator.search_cursor(), 3);

        assert_eq!(aggregator.advance_search("bear").await, 1);
        assert_eq!(ids(&aggregator.movies()), vec!["B1"]);
        assert_eq!(aggregator.search_cursor(), 2);
    }

    #[tokio::test]
    async fn test_returning_to_now_playing_replaces_search_results() {
        let source = Arc::new(
            ScriptedSource::new()
                .with_now_playing(vec![vec![movie("A", "A")], vec![movie("B", "B")]])
                .with_search("panda", vec![vec![movie("P1", "Panda")]]),
        );
        let aggregator = aggregator(&source);

        aggregator.advance_now_playing().await;
        aggregator.advance_now_playing().await;
        aggregator.advance_search("panda").await;

        assert_eq!(aggregator.advance_now_playing().await, 1);

        assert_eq!(ids(&aggregator.movies()), vec!["A"]);
        assert_eq!(aggregator.active_query(), None);
        assert_eq!(aggregator.now_playing_cursor(), 2);
        assert_eq!(aggregator.search_cursor(), 1);
        assert_eq!(source.calls().last(), Some(&SourceCall::NowPlaying(1)));
    }

    #[tokio::test]
    async fn test_empty_search_is_noop() {
        let source = Arc::new(ScriptedSource::new().with_now_playing(vec![vec![movie("A", "A")]]));
        let aggregator = aggregator(&source);
        aggregator.advance_now_playing().await;
        let calls_before = source.call_count();

        assert_eq!(aggregator.advance_search("").await, 0);
        assert_eq!(aggregator.advance_search("   ").await, 0);

        assert_eq!(ids(&aggregator.movies()), vec!["A"]);
        assert_eq!(aggregator.now_playing_cursor(), 2);
        assert_eq!(aggregator.active_query(), None);
        assert_eq!(source.call_count(), calls_before);
    }

    #[tokio::test]
    async fn test_new_search_with_no_results_still_switches_mode() {
        let source = Arc::new(ScriptedSource::new().with_now_playing(vec![vec![movie("A", "A")]]));
        let aggregator = aggregator(&source);
        aggregator.advance_now_playing().await;

        assert_eq!(aggregator.advance_search("nothing matches").await, 0);

        assert!(aggregator.movies().is_empty());
        assert_eq!(aggregator.active_query().as_deref(), Some("nothing matches"));
        assert_eq!(aggregator.search_cursor(), 1);
        assert_eq!(aggregator.now_playing_cursor(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_not_listed_twice() {
        let source = Arc::new(ScriptedSource::new().with_now_playing(vec![
            vec![movie("A", "A"), movie("B", "B")],
            vec![movie("B", "B"), movie("C", "C")],
        ]));
        let aggregator = aggregator(&source);

        aggregator.advance_now_playing().await;
        assert_eq!(aggregator.advance_now_playing().await, 2);

        assert_eq!(ids(&aggregator.movies()), vec!["A", "B", "C"]);
        assert_eq!(aggregator.now_playing_cursor(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_advances_are_serialized() {
        let source = Arc::new(
            ScriptedSource::new()
                .with_now_playing(vec![
                    vec![movie("A", "A"), movie("B", "B")],
                    vec![movie("C", "C"), movie("D", "D")],
                ])
                .with_latency(Duration::from_millis(20)),
        );
        let aggregator = aggregator(&source);

        let (first, second) = tokio::join!(
            aggregator.advance_now_playing(),
            aggregator.advance_now_playing()
        );

        assert_eq!((first, second), (2, 2));
        assert_eq!(ids(&aggregator.movies()), vec!["A", "B", "C", "D"]);
        assert_eq!(aggregator.now_playing_cursor(), 3);
        assert_eq!(
            source.calls(),
            vec![SourceCall::NowPlaying(1), SourceCall::NowPlaying(2)]
        );
    }

    #[tokio::test]
    async fn test_best_video_prefers_first_youtube_trailer() {
        let source = Arc::new(ScriptedSource::new().with_videos(
            "42",
            vec![
                video("1", VideoType::Trailer, VideoProvider::Other),
                video("2", VideoType::BehindTheScenes, VideoProvider::Youtube),
                video("3", VideoType::Trailer, VideoProvider::Youtube),
                video("4", VideoType::Trailer, VideoProvider::Youtube),
            ],
        ));
        let aggregator = aggregator(&source);

        let best = aggregator.best_video_for("42").await.unwrap();
        assert_eq!(best.id, "3");
    }

    #[tokio::test]
    async fn test_best_video_falls_back_to_first_youtube() {
        let source = Arc::new(ScriptedSource::new().with_videos(
            "42",
            vec![
                video("1", VideoType::Clip, VideoProvider::Other),
                video("2", VideoType::Teaser, VideoProvider::Youtube),
                video("3", VideoType::Featurette, VideoProvider::Youtube),
            ],
        ));
        let aggregator = aggregator(&source);

        let best = aggregator.best_video_for("42").await.unwrap();
        assert_eq!(best.id, "2");
    }

    #[tokio::test]
    async fn test_best_video_without_youtube_is_none() {
        let source = Arc::new(ScriptedSource::new().with_videos(
            "42",
            vec![video("1", VideoType::Trailer, VideoProvider::Other)],
        ));
        let aggregator = aggregator(&source);

        assert_eq!(aggregator.best_video_for("42").await, None);
        assert_eq!(aggregator.best_video_for("missing").await, None);
    }

    #[tokio::test]
    async fn test_empty_movie_id_skips_the_source() {
        let source = Arc::new(ScriptedSource::new());
        let aggregator = aggregator(&source);

        assert_eq!(aggregator.best_video_for("").await, None);
        assert!(aggregator.similar_movies_for(" ").await.is_empty());
        assert!(aggregator.reviews_for("").await.is_empty());
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_similar_movies_are_truncated_in_order() {
        let source = Arc::new(ScriptedSource::new().with_similar(
            "42",
            ["1", "2", "3", "4", "5"].into_iter().map(preview).collect(),
        ));
        let aggregator = aggregator(&source);

        let similar = aggregator.similar_movies_for("42").await;
        let similar_ids: Vec<_> = similar.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(similar_ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_reviews_are_truncated_and_sanitized() {
        let raw = [
            "Loved it<script>alert(1)</script>",
            "<b>Meh</b>",
            "Third review",
        ];
        let source = Arc::new(ScriptedSource::new().with_reviews(
            "42",
            vec![review("r1", raw[0]), review("r2", raw[1]), review("r3", raw[2])],
        ));
        let config = AggregatorConfig {
            maximum_reviews: 2,
            ..AggregatorConfig::default()
        };
        let aggregator = aggregator_with(&source, config);

        let reviews = aggregator.reviews_for("42").await;

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id, "r1");
        assert_eq!(reviews[0].content, sanitize_html(raw[0]));
        assert_eq!(reviews[0].content, "Loved it");
        assert_eq!(reviews[1].content, sanitize_html(raw[1]));
    }

    #[tokio::test]
    async fn test_default_review_limit_is_one() {
        let source = Arc::new(ScriptedSource::new().with_reviews(
            "42",
            vec![review("r1", "a"), review("r2", "b")],
        ));
        let aggregator = aggregator(&source);

        assert_eq!(aggregator.reviews_for("42").await.len(), 1);
    }

    #[tokio::test]
    async fn test_genre_table_resolution() {
        let genres: GenreTable = [(1, "Horror".to_string()), (2, "Spoopy".to_string())]
            .into_iter()
            .collect();
        let mut listed = movie("A", "A");
        listed.genre_ids = vec![2, 1, 3];
        let source = Arc::new(
            ScriptedSource::new()
                .with_now_playing(vec![vec![listed]])
                .with_genres(genres),
        );
        let aggregator = aggregator(&source);

        aggregator.advance_now_playing().await;
        let first = aggregator.movies().remove(0);
        assert!(aggregator.genre_names(&first).is_empty());

        let table = aggregator.fetch_genre_table().await;
        assert_eq!(table.len(), 2);
        assert_eq!(aggregator.genre_names(&first), vec!["Spoopy", "Horror"]);

        aggregator.ensure_genre_table().await;
        assert_eq!(
            source
                .calls()
                .iter()
                .filter(|call| **call == SourceCall::Genres)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_failed_genre_fetch_yields_empty_table() {
        let source = Arc::new(ScriptedSource::new());
        let aggregator = aggregator(&source);

        assert!(aggregator.fetch_genre_table().await.is_empty());
        assert!(aggregator.genre_table().is_empty());
    }
}

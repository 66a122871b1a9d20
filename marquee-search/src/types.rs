//! TMDB response shapes and their normalization into Marquee records.
//!
//! Every field that TMDB may omit or send as `null` is optional here, and
//! records are decoded one by one so a single malformed entry is skipped
//! instead of failing its whole page.

use marquee_core::models::format_rating;
use marquee_core::{GenreTable, MoviePreview, MovieSummary, Review, Video, VideoProvider, VideoType};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Envelope of every list endpoint (`results` array).
#[derive(Debug, Deserialize)]
pub struct ResultsResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Movie entry of now-playing, search and similar listings.
#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub poster_path: Option<String>,
    pub title: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
}

/// Video entry of `movie/{id}/videos`.
#[derive(Debug, Deserialize)]
pub struct TmdbVideo {
    pub id: String,
    pub key: Option<String>,
    pub name: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "type")]
    pub video_type: Option<String>,
}

/// Review entry of `movie/{id}/reviews`.
#[derive(Debug, Deserialize)]
pub struct TmdbReview {
    pub id: String,
    pub author: Option<String>,
    pub author_details: Option<TmdbAuthorDetails>,
    pub content: Option<String>,
}

/// Nested author block of a review.
#[derive(Debug, Default, Deserialize)]
pub struct TmdbAuthorDetails {
    pub name: Option<String>,
    pub username: Option<String>,
    pub avatar_path: Option<String>,
    pub rating: Option<f64>,
}

/// Body of `genre/movie/list`.
#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<serde_json::Value>,
}

/// Single genre entry.
#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: i32,
    pub name: Option<String>,
}

/// Decodes records individually, skipping the ones that do not fit `T`.
pub fn decode_records<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> Vec<T> {
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!(
            skipped = total - records.len(),
            total, "Dropped malformed records from response"
        );
    }
    records
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        MovieSummary {
            id: movie.id.to_string(),
            poster_path: movie.poster_path,
            title: movie.title.unwrap_or_default(),
            release_date: movie.release_date.unwrap_or_default(),
            genre_ids: movie.genre_ids,
            vote_average: movie.vote_average.unwrap_or_default(),
            overview: movie.overview.unwrap_or_default(),
        }
    }
}

impl From<TmdbMovie> for MoviePreview {
    fn from(movie: TmdbMovie) -> Self {
        MoviePreview {
            id: movie.id.to_string(),
            poster_path: movie.poster_path,
            title: movie.title.unwrap_or_default(),
        }
    }
}

impl From<TmdbVideo> for Video {
    fn from(video: TmdbVideo) -> Self {
        Video {
            id: video.id,
            key: video.key.unwrap_or_default(),
            name: video.name.unwrap_or_default(),
            video_type: VideoType::from_label(video.video_type.as_deref().unwrap_or_default()),
            video_provider: VideoProvider::from_site(video.site.as_deref().unwrap_or_default()),
        }
    }
}

impl From<TmdbReview> for Review {
    fn from(review: TmdbReview) -> Self {
        let details = review.author_details.unwrap_or_default();
        let author_name = details
            .name
            .filter(|name| !name.is_empty())
            .or(review.author)
            .unwrap_or_default();

        Review {
            id: review.id,
            author_name,
            author_username: details.username.unwrap_or_default(),
            rating_text: format_rating(details.rating),
            content: review.content.unwrap_or_default(),
            avatar_path: details.avatar_path,
        }
    }
}

/// Builds the genre table, skipping entries without a name.
pub fn genre_table(genres: Vec<TmdbGenre>) -> GenreTable {
    genres
        .into_iter()
        .filter_map(|genre| genre.name.map(|name| (genre.id, name)))
        .collect()
}

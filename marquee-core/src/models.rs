//! Domain records shared by the aggregator, the movie sources and the renderer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Base URL for embedding Youtube videos by key.
pub const YOUTUBE_EMBED_URL: &str = "https://www.youtube.com/embed/";

/// Movie entry shown in the now-playing and search listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Upstream identifier rendered as a string
    pub id: String,
    /// Poster image path relative to the poster CDN
    pub poster_path: Option<String>,
    /// Display title
    pub title: String,
    /// Release date as reported upstream (usually `YYYY-MM-DD`)
    pub release_date: String,
    /// Genre ids in upstream order, resolved through a [`GenreTable`] at render time
    pub genre_ids: Vec<i32>,
    /// Average user vote (0.0-10.0)
    pub vote_average: f64,
    /// Plot overview
    pub overview: String,
}

/// Reduced movie record used for "similar movies" strips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePreview {
    /// Upstream identifier rendered as a string
    pub id: String,
    /// Poster image path relative to the poster CDN
    pub poster_path: Option<String>,
    /// Display title
    pub title: String,
}

/// Kind of video attached to a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoType {
    Clip,
    Featurette,
    Teaser,
    BehindTheScenes,
    Trailer,
    Other,
}

impl VideoType {
    /// Maps an upstream type label, falling back to [`VideoType::Other`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clip" => VideoType::Clip,
            "Featurette" => VideoType::Featurette,
            "Teaser" => VideoType::Teaser,
            "Behind the Scenes" => VideoType::BehindTheScenes,
            "Trailer" => VideoType::Trailer,
            _ => VideoType::Other,
        }
    }
}

/// Hosting site of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoProvider {
    Youtube,
    Other,
}

impl VideoProvider {
    /// Maps an upstream site name. Only the exact string `YouTube` is recognized.
    pub fn from_site(site: &str) -> Self {
        if site == "YouTube" {
            VideoProvider::Youtube
        } else {
            VideoProvider::Other
        }
    }
}

/// Video (trailer, clip, ...) attached to a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Upstream video identifier
    pub id: String,
    /// Provider-specific resource key
    pub key: String,
    /// Display name
    pub name: String,
    pub video_type: VideoType,
    pub video_provider: VideoProvider,
}

impl Video {
    /// Embeddable player URL, when the provider supports embedding.
    pub fn embed_url(&self) -> Option<String> {
        match self.video_provider {
            VideoProvider::Youtube => Some(format!("{YOUTUBE_EMBED_URL}{}", self.key)),
            VideoProvider::Other => None,
        }
    }
}

/// User review of a movie.
///
/// `content` is only ever populated with sanitized text once the review
/// has passed through the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author_name: String,
    pub author_username: String,
    /// Rating out of 10 formatted for display, `-` when the author gave none
    pub rating_text: String,
    pub content: String,
    /// Avatar image path relative to the avatar CDN
    pub avatar_path: Option<String>,
}

impl Review {
    /// Name shown next to the review: the username, or the author name when empty.
    pub fn display_name(&self) -> &str {
        if self.author_username.is_empty() {
            &self.author_name
        } else {
            &self.author_username
        }
    }
}

/// Formats an optional upstream rating for [`Review::rating_text`].
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(value) if value.is_finite() => {
            let text = format!("{value:.1}");
            text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
        }
        _ => "-".to_string(),
    }
}

/// Lookup from genre id to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreTable {
    genres: HashMap<i32, String>,
}

impl GenreTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the display name for a genre id.
    pub fn name(&self, id: i32) -> Option<&str> {
        self.genres.get(&id).map(String::as_str)
    }

    /// Resolves genre ids in order, skipping ids unknown to the table.
    pub fn resolve(&self, ids: &[i32]) -> Vec<&str> {
        ids.iter().filter_map(|id| self.name(*id)).collect()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Iterates entries sorted by genre id.
    pub fn sorted(&self) -> Vec<(i32, &str)> {
        let mut entries: Vec<_> = self
            .genres
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

impl From<HashMap<i32, String>> for GenreTable {
    fn from(genres: HashMap<i32, String>) -> Self {
        Self { genres }
    }
}

impl FromIterator<(i32, String)> for GenreTable {
    fn from_iter<I: IntoIterator<Item = (i32, String)>>(iter: I) -> Self {
        Self {
            genres: iter.into_iter().collect(),
        }
    }
}

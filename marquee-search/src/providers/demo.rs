//! Demo movie source for development without an API key.

use async_trait::async_trait;
use marquee_core::{
    GenreTable, MoviePreview, MovieSource, MovieSummary, Review, Video, VideoProvider, VideoType,
};

/// Movies per demo page.
const DEMO_PAGE_SIZE: usize = 4;

/// (id, title, release date, genre ids, vote average, poster path)
const CATALOG: &[(&str, &str, &str, &[i32], f64, Option<&str>)] = &[
    ("101", "Krav Maga Panda", "2024-03-01", &[28, 35], 7.4, Some("/panda.jpg")),
    ("102", "Four Mornings at Freddy's", "2024-02-14", &[27, 53], 6.1, Some("/freddy.jpg")),
    ("103", "Carebears 5: The New Order", "2024-01-19", &[16, 878], 5.8, None),
    ("104", "Chucky's Father in Law", "2023-12-22", &[27, 35], 6.6, Some("/chucky.jpg")),
    ("105", "Mortal Kombat 23", "2024-02-25", &[28, 12], 9.9, Some("/kombat.jpg")),
    ("106", "The Long Intermission", "2023-11-30", &[18], 7.9, None),
    ("107", "Popcorn Heist", "2024-03-08", &[80, 35], 6.9, Some("/popcorn.jpg")),
    ("108", "Midnight Matinee", "2024-03-15", &[27, 18], 7.1, Some("/matinee.jpg")),
];

const GENRES: &[(i32, &str)] = &[
    (12, "Adventure"),
    (16, "Animation"),
    (18, "Drama"),
    (27, "Horror"),
    (28, "Action"),
    (35, "Comedy"),
    (53, "Thriller"),
    (80, "Crime"),
    (878, "Science Fiction"),
];

/// Offline movie source returning a fixed catalog.
///
/// Now playing lists the whole catalog in pages of four. Search matches
/// titles case-insensitively. Every movie has the same set of videos and
/// reviews, one of which carries markup to exercise sanitizing.
#[derive(Debug, Default)]
pub struct DemoSource;

impl DemoSource {
    /// Creates the demo source.
    pub fn new() -> Self {
        Self
    }

    fn catalog() -> impl Iterator<Item = MovieSummary> {
        CATALOG.iter().map(
            |(id, title, release_date, genre_ids, vote_average, poster_path)| MovieSummary {
                id: id.to_string(),
                poster_path: poster_path.map(str::to_string),
                title: title.to_string(),
                release_date: release_date.to_string(),
                genre_ids: genre_ids.to_vec(),
                vote_average: *vote_average,
                overview: format!("Demo overview for {title}."),
            },
        )
    }

    fn page(movies: Vec<MovieSummary>, page: u32) -> Vec<MovieSummary> {
        let Some(index) = (page as usize).checked_sub(1) else {
            return Vec::new();
        };
        movies
            .into_iter()
            .skip(index * DEMO_PAGE_SIZE)
            .take(DEMO_PAGE_SIZE)
            .collect()
    }

    fn is_known(movie_id: &str) -> bool {
        CATALOG.iter().any(|(id, ..)| *id == movie_id)
    }
}

#[async_trait]
impl MovieSource for DemoSource {
    async fn now_playing(&self, page: u32) -> Vec<MovieSummary> {
        Self::page(Self::catalog().collect(), page)
    }

    async fn search_movies(&self, query: &str, page: u32) -> Vec<MovieSummary> {
        let needle = query.to_lowercase();
        let matches = Self::catalog()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .collect();
        Self::page(matches, page)
    }

    async fn genres(&self) -> GenreTable {
        GENRES
            .iter()
            .map(|(id, name)| (*id, name.to_string()))
            .collect()
    }

    async fn videos(&self, movie_id: &str) -> Vec<Video> {
        if !Self::is_known(movie_id) {
            return Vec::new();
        }

        vec![
            Video {
                id: format!("{movie_id}-teaser"),
                key: "aqz-KE-bpKQ".to_string(),
                name: "Teaser".to_string(),
                video_type: VideoType::Teaser,
                video_provider: VideoProvider::Youtube,
            },
            Video {
                id: format!("{movie_id}-vimeo"),
                key: "76979871".to_string(),
                name: "Official Trailer (Vimeo)".to_string(),
                video_type: VideoType::Trailer,
                video_provider: VideoProvider::Other,
            },
            Video {
                id: format!("{movie_id}-trailer"),
                key: "YE7VzlLtp-4".to_string(),
                name: "Official Trailer".to_string(),
                video_type: VideoType::Trailer,
                video_provider: VideoProvider::Youtube,
            },
        ]
    }

    async fn similar(&self, movie_id: &str) -> Vec<MoviePreview> {
        if !Self::is_known(movie_id) {
            return Vec::new();
        }

        Self::catalog()
            .filter(|movie| movie.id != movie_id)
            .map(|movie| MoviePreview {
                id: movie.id,
                poster_path: movie.poster_path,
                title: movie.title,
            })
            .collect()
    }

    async fn reviews(&self, movie_id: &str) -> Vec<Review> {
        if !Self::is_known(movie_id) {
            return Vec::new();
        }

        vec![
            Review {
                id: format!("{movie_id}-r1"),
                author_name: "Pat Critic".to_string(),
                author_username: "patcritic".to_string(),
                rating_text: "8".to_string(),
                content: "<p>Tight pacing and a <em>great</em> final act.</p>\
                          <script>document.location='https://example.com'</script>"
                    .to_string(),
                avatar_path: Some("/patcritic.png".to_string()),
            },
            Review {
                id: format!("{movie_id}-r2"),
                author_name: "Sam Viewer".to_string(),
                author_username: String::new(),
                rating_text: "-".to_string(),
                content: "Fun enough for a rainy afternoon.".to_string(),
                avatar_path: None,
            },
        ]
    }
}

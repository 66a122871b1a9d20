//! TMDB movie source for production use.

use async_trait::async_trait;
use marquee_core::{
    GenreTable, MoviePreview, MovieSource, MovieSummary, Review, TmdbConfig, Video,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::errors::MovieApiError;
use crate::types::{
    GenreListResponse, ResultsResponse, TmdbGenre, TmdbMovie, TmdbReview, TmdbVideo,
    decode_records, genre_table,
};

/// HTTP client for The Movie Database v3 API.
///
/// The `fetch_*` methods report failures as [`MovieApiError`]. The
/// [`MovieSource`] implementation logs those and answers with empty results.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl TmdbClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// - `MovieApiError::Configuration` - Missing API key, invalid base URL, or HTTP client setup failure
    pub fn new(config: &TmdbConfig) -> Result<Self, MovieApiError> {
        let base_url = config
            .parsed_base_url()
            .map_err(|e| MovieApiError::Configuration {
                reason: e.to_string(),
            })?;
        let api_key = config
            .require_api_key()
            .map_err(|e| MovieApiError::Configuration {
                reason: e.to_string(),
            })?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| MovieApiError::Configuration {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Fetches one page of movies currently in theaters.
    ///
    /// # Errors
    ///
    /// - `MovieApiError::NetworkError` - Request could not be completed
    /// - `MovieApiError::HttpStatus` - Non-success status code
    /// - `MovieApiError::ParseError` - Undecodable response body
    pub async fn fetch_now_playing(&self, page: u32) -> Result<Vec<MovieSummary>, MovieApiError> {
        let response: ResultsResponse = self
            .get_json("movie/now_playing", &[("page", page.to_string())])
            .await?;
        Ok(Self::movies(response))
    }

    /// Fetches one page of search results.
    ///
    /// # Errors
    ///
    /// - `MovieApiError::NetworkError` - Request could not be completed
    /// - `MovieApiError::HttpStatus` - Non-success status code
    /// - `MovieApiError::ParseError` - Undecodable response body
    pub async fn fetch_search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MovieSummary>, MovieApiError> {
        let response: ResultsResponse = self
            .get_json(
                "search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(Self::movies(response))
    }

    /// Fetches the movie genre list.
    ///
    /// # Errors
    ///
    /// - `MovieApiError::NetworkError` - Request could not be completed
    /// - `MovieApiError::HttpStatus` - Non-success status code
    /// - `MovieApiError::ParseError` - Undecodable response body
    pub async fn fetch_genres(&self) -> Result<GenreTable, MovieApiError> {
        let response: GenreListResponse = self.get_json("genre/movie/list", &[]).await?;
        let genres: Vec<TmdbGenre> = decode_records(response.genres);
        Ok(genre_table(genres))
    }

    /// Fetches all videos of a movie.
    ///
    /// # Errors
    ///
    /// - `MovieApiError::NetworkError` - Request could not be completed
    /// - `MovieApiError::HttpStatus` - Non-success status code
    /// - `MovieApiError::ParseError` - Undecodable response body
    pub async fn fetch_videos(&self, movie_id: &str) -> Result<Vec<Video>, MovieApiError> {
        let response: ResultsResponse = self
            .get_json(&Self::movie_endpoint(movie_id, "videos"), &[])
            .await?;
        let videos: Vec<TmdbVideo> = decode_records(response.results);
        Ok(videos.into_iter().map(Video::from).collect())
    }

    /// Fetches movies similar to the given one.
    ///
    /// # Errors
    ///
    /// - `MovieApiError::NetworkError` - Request could not be completed
    /// - `MovieApiError::HttpStatus` - Non-success status code
    /// - `MovieApiError::ParseError` - Undecodable response body
    pub async fn fetch_similar(&self, movie_id: &str) -> Result<Vec<MoviePreview>, MovieApiError> {
        let response: ResultsResponse = self
            .get_json(&Self::movie_endpoint(movie_id, "similar"), &[])
            .await?;
        let movies: Vec<TmdbMovie> = decode_records(response.results);
        Ok(movies.into_iter().map(MoviePreview::from).collect())
    }

    /// Fetches the reviews of a movie, content as published.
    ///
    /// # Errors
    ///
    /// - `MovieApiError::NetworkError` - Request could not be completed
    /// - `MovieApiError::HttpStatus` - Non-success status code
    /// - `MovieApiError::ParseError` - Undecodable response body
    pub async fn fetch_reviews(&self, movie_id: &str) -> Result<Vec<Review>, MovieApiError> {
        let response: ResultsResponse = self
            .get_json(&Self::movie_endpoint(movie_id, "reviews"), &[])
            .await?;
        let reviews: Vec<TmdbReview> = decode_records(response.results);
        Ok(reviews.into_iter().map(Review::from).collect())
    }

    fn movies(response: ResultsResponse) -> Vec<MovieSummary> {
        let movies: Vec<TmdbMovie> = decode_records(response.results);
        movies.into_iter().map(MovieSummary::from).collect()
    }

    fn movie_endpoint(movie_id: &str, resource: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(movie_id.as_bytes()).collect();
        format!("movie/{encoded}/{resource}")
    }

    /// Performs a GET below the API root and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, MovieApiError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| MovieApiError::Configuration {
                reason: format!("invalid endpoint '{endpoint}': {e}"),
            })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }

        debug!(endpoint, ?params, "Requesting TMDB");
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| MovieApiError::NetworkError {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MovieApiError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MovieApiError::ParseError {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Logs a failed request and substitutes the empty value.
fn or_empty<T: Default>(result: Result<T, MovieApiError>, operation: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(operation, error = %e, "Movie API request failed, using empty result");
        T::default()
    })
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn now_playing(&self, page: u32) -> Vec<MovieSummary> {
        or_empty(self.fetch_now_playing(page).await, "now_playing")
    }

    async fn search_movies(&self, query: &str, page: u32) -> Vec<MovieSummary> {
        or_empty(self.fetch_search(query, page).await, "search_movies")
    }

    async fn genres(&self) -> GenreTable {
        or_empty(self.fetch_genres().await, "genres")
    }

    async fn videos(&self, movie_id: &str) -> Vec<Video> {
        or_empty(self.fetch_videos(movie_id).await, "videos")
    }

    async fn similar(&self, movie_id: &str) -> Vec<MoviePreview> {
        or_empty(self.fetch_similar(movie_id).await, "similar")
    }

    async fn reviews(&self, movie_id: &str) -> Vec<Review> {
        or_empty(self.fetch_reviews(movie_id).await, "reviews")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = TmdbConfig::default();
        assert!(matches!(
            TmdbClient::new(&config),
            Err(MovieApiError::Configuration { .. })
        ));
    }

    #[test]
    fn test_client_rejects_invalid_base_url() {
        let config = TmdbConfig {
            base_url: "::nope".to_string(),
            api_key: Some("key".to_string()),
            ..TmdbConfig::default()
        };
        assert!(TmdbClient::new(&config).is_err());
    }

    #[test]
    fn test_movie_endpoint_encodes_id() {
        assert_eq!(TmdbClient::movie_endpoint("550", "videos"), "movie/550/videos");
        assert_eq!(
            TmdbClient::movie_endpoint("a/b", "reviews"),
            "movie/a%2Fb/reviews"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_empty_results() {
        let config = TmdbConfig {
            base_url: "http://127.0.0.1:9/3/".to_string(),
            api_key: Some("key".to_string()),
            request_timeout: std::time::Duration::from_millis(500),
            ..TmdbConfig::default()
        };
        let client = TmdbClient::new(&config).unwrap();

        assert!(client.fetch_now_playing(1).await.is_err());
        assert!(client.now_playing(1).await.is_empty());
        assert!(client.genres().await.is_empty());
    }
}

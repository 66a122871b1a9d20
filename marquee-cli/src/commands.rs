//! CLI command implementations

use std::io::Write;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Subcommand;
use marquee_core::{
    BrowseOutcome, BrowsingController, MarqueeConfig, MarqueeError, MovieAggregator, MovieSource,
    TmdbConfig,
};
use marquee_search::{DemoSource, TmdbClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::render;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List movies currently in theaters
    NowPlaying {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Search movies by title
    Search {
        /// Free-text query
        query: String,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show trailer, similar movies and reviews for a movie
    Details {
        /// Movie identifier as shown in listings
        movie_id: String,
    },
    /// List movie genres
    Genres,
    /// Browse interactively: Enter loads more, /text searches, / clears, q quits
    Browse,
}

/// Everything one browsing session needs.
struct Session {
    aggregator: Arc<MovieAggregator>,
    tmdb: TmdbConfig,
}

impl Session {
    fn new(config: &MarqueeConfig, demo: bool) -> Result<Self> {
        let source: Arc<dyn MovieSource> = if demo {
            info!("Using offline demo catalog");
            Arc::new(DemoSource::new())
        } else {
            let client = TmdbClient::new(&config.tmdb).map_err(MarqueeError::from)?;
            Arc::new(client)
        };

        Ok(Self {
            aggregator: Arc::new(MovieAggregator::new(source, config.aggregator)),
            tmdb: config.tmdb.clone(),
        })
    }

    fn print_listing(&self, offset: usize) -> Result<()> {
        let movies = self.aggregator.movies();
        let genres = self.aggregator.genre_table();
        let mut out = std::io::stdout().lock();
        render::render_listing(&mut out, &movies, offset, &genres, &self.tmdb)?;
        out.flush()?;
        Ok(())
    }
}

/// Handle the CLI command
///
/// # Errors
/// - `MarqueeError::Configuration` - Missing API key or invalid API settings
/// - `std::io::Error` - Writing to the terminal or reading input failed
pub async fn handle_command(command: Commands, config: &MarqueeConfig, demo: bool) -> Result<()> {
    let session = Session::new(config, demo)?;

    match command {
        Commands::NowPlaying { pages } => now_playing(&session, pages).await,
        Commands::Search { query, pages } => search(&session, &query, pages).await,
        Commands::Details { movie_id } => details(&session, &movie_id).await,
        Commands::Genres => genres(&session).await,
        Commands::Browse => browse(&session).await,
    }
}

async fn now_playing(session: &Session, pages: u32) -> Result<()> {
    session.aggregator.ensure_genre_table().await;

    for _ in 0..pages {
        if session.aggregator.advance_now_playing().await == 0 {
            break;
        }
    }

    if session.aggregator.movie_count() == 0 {
        println!("No movies found");
        return Ok(());
    }
    session.print_listing(0)
}

async fn search(session: &Session, query: &str, pages: u32) -> Result<()> {
    if query.trim().is_empty() {
        bail!("search query must not be empty");
    }
    session.aggregator.ensure_genre_table().await;

    for _ in 0..pages {
        if session.aggregator.advance_search(query).await == 0 {
            break;
        }
    }

    if session.aggregator.movie_count() == 0 {
        println!("No movies match '{}'", query.trim());
        return Ok(());
    }
    session.print_listing(0)
}

async fn details(session: &Session, movie_id: &str) -> Result<()> {
    if movie_id.trim().is_empty() {
        bail!("movie id must not be empty");
    }

    let aggregator = &session.aggregator;
    let (video, similar, reviews) = futures::join!(
        aggregator.best_video_for(movie_id),
        aggregator.similar_movies_for(movie_id),
        aggregator.reviews_for(movie_id)
    );

    let mut out = std::io::stdout().lock();
    render::render_details(&mut out, video.as_ref(), &similar, &reviews, &session.tmdb)?;
    out.flush()?;
    Ok(())
}

async fn genres(session: &Session) -> Result<()> {
    let genres = session.aggregator.fetch_genre_table().await;
    let mut out = std::io::stdout().lock();
    render::render_genres(&mut out, &genres)?;
    out.flush()?;
    Ok(())
}

/// Line-based stand-in for scroll and search events.
#[derive(Debug, PartialEq, Eq)]
enum BrowseInput {
    More,
    Search(String),
    ClearSearch,
    Details(String),
    Quit,
}

fn parse_browse_input(line: &str) -> BrowseInput {
    let line = line.trim();
    if line.is_empty() {
        return BrowseInput::More;
    }
    if line == "q" {
        return BrowseInput::Quit;
    }
    if let Some(query) = line.strip_prefix('/') {
        let query = query.trim();
        return if query.is_empty() {
            BrowseInput::ClearSearch
        } else {
            BrowseInput::Search(query.to_string())
        };
    }
    if let Some(movie_id) = line.strip_prefix("i ") {
        return BrowseInput::Details(movie_id.trim().to_string());
    }
    BrowseInput::More
}

async fn browse(session: &Session) -> Result<()> {
    let mut controller = BrowsingController::new(Arc::clone(&session.aggregator));
    session.aggregator.ensure_genre_table().await;

    println!("Enter: more | /text: search | /: back to now playing | i ID: details | q: quit");

    let outcome = controller.on_initial_load().await;
    let mut rendered = show_outcome(session, outcome, 0)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_browse_input(&line) {
            BrowseInput::Quit => break,
            BrowseInput::More => {
                let outcome = controller.on_scroll_near_bottom().await;
                rendered = show_outcome(session, outcome, rendered)?;
            }
            BrowseInput::Search(query) => {
                let outcome = controller.on_search_submitted(&query).await;
                rendered = show_outcome(session, outcome, 0)?;
            }
            BrowseInput::ClearSearch => {
                let outcome = controller.on_search_cleared().await;
                rendered = show_outcome(session, outcome, 0)?;
            }
            BrowseInput::Details(movie_id) => details(session, &movie_id).await?,
        }
    }

    Ok(())
}

/// Prints rows added since `rendered` and returns the new rendered count.
fn show_outcome(session: &Session, outcome: BrowseOutcome, rendered: usize) -> Result<usize> {
    let total = session.aggregator.movie_count();
    if rendered == 0 && total == 0 {
        println!("No movies found");
    }
    if total > rendered {
        session.print_listing(rendered)?;
    }
    if !outcome.can_fetch_more {
        println!("-- end of list --");
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browse_input() {
        assert_eq!(parse_browse_input(""), BrowseInput::More);
        assert_eq!(parse_browse_input("q"), BrowseInput::Quit);
        assert_eq!(
            parse_browse_input("/ panda "),
            BrowseInput::Search("panda".to_string())
        );
        assert_eq!(parse_browse_input("/"), BrowseInput::ClearSearch);
        assert_eq!(
            parse_browse_input("i 101"),
            BrowseInput::Details("101".to_string())
        );
    }

    #[tokio::test]
    async fn test_demo_session_lists_now_playing() {
        let session = Session::new(&MarqueeConfig::default(), true).unwrap();

        now_playing(&session, 5).await.unwrap();

        assert_eq!(session.aggregator.movie_count(), 8);
        assert_eq!(session.aggregator.now_playing_cursor(), 3);
        assert!(!session.aggregator.genre_table().is_empty());
    }

    #[test]
    fn test_missing_api_key_is_reported() {
        let error = Session::new(&MarqueeConfig::default(), false)
            .err()
            .unwrap();
        let error = error.downcast::<MarqueeError>().unwrap();
        assert!(error.is_user_error());
    }

    #[tokio::test]
    async fn test_empty_search_query_is_rejected() {
        let session = Session::new(&MarqueeConfig::default(), true).unwrap();
        assert!(search(&session, "  ", 1).await.is_err());
    }
}

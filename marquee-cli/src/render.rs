//! Terminal rendering of aggregator output.

use std::io::{self, Write};

use marquee_core::{GenreTable, MoviePreview, MovieSummary, Review, TmdbConfig, Video};

const NO_IMAGE: &str = "No image";

/// Prints listing entries starting at `offset`, numbered from `offset + 1`.
pub fn render_listing(
    out: &mut impl Write,
    movies: &[MovieSummary],
    offset: usize,
    genres: &GenreTable,
    tmdb: &TmdbConfig,
) -> io::Result<()> {
    for (index, movie) in movies.iter().enumerate().skip(offset) {
        render_movie(out, index + 1, movie, genres, tmdb)?;
    }
    Ok(())
}

fn render_movie(
    out: &mut impl Write,
    position: usize,
    movie: &MovieSummary,
    genres: &GenreTable,
    tmdb: &TmdbConfig,
) -> io::Result<()> {
    writeln!(
        out,
        "{position:>3}. {} ({}) [{}]  rating {:.1}",
        movie.title, movie.release_date, movie.id, movie.vote_average
    )?;

    let genre_names = genres.resolve(&movie.genre_ids);
    if !genre_names.is_empty() {
        writeln!(out, "     {}", genre_names.join(", "))?;
    }

    writeln!(out, "     poster: {}", poster(movie.poster_path.as_deref(), tmdb))?;
    if !movie.overview.is_empty() {
        writeln!(out, "     {}", movie.overview)?;
    }
    Ok(())
}

/// Prints the best video, similar movies and reviews of one movie.
pub fn render_details(
    out: &mut impl Write,
    video: Option<&Video>,
    similar: &[MoviePreview],
    reviews: &[Review],
    tmdb: &TmdbConfig,
) -> io::Result<()> {
    match video.and_then(|video| video.embed_url().map(|url| (video, url))) {
        Some((video, url)) => writeln!(out, "Video: {} ({:?}) {url}", video.name, video.video_type)?,
        None => writeln!(out, "Video: none available")?,
    }

    writeln!(out, "Similar movies:")?;
    if similar.is_empty() {
        writeln!(out, "  none")?;
    }
    for preview in similar {
        writeln!(
            out,
            "  - [{}] {} ({})",
            preview.id,
            preview.title,
            poster(preview.poster_path.as_deref(), tmdb)
        )?;
    }

    writeln!(out, "Reviews:")?;
    if reviews.is_empty() {
        writeln!(out, "  none")?;
    }
    for review in reviews {
        let avatar = review
            .avatar_path
            .as_deref()
            .map(|path| format!("  avatar: {}", tmdb.avatar_url(path)))
            .unwrap_or_default();
        writeln!(
            out,
            "  {}  Rated: {}/10{avatar}",
            review.display_name(),
            review.rating_text
        )?;
        writeln!(out, "    {}", review.content)?;
    }
    Ok(())
}

/// Prints the genre table sorted by id.
pub fn render_genres(out: &mut impl Write, genres: &GenreTable) -> io::Result<()> {
    if genres.is_empty() {
        return writeln!(out, "No genres available");
    }
    for (id, name) in genres.sorted() {
        writeln!(out, "{id:>6}  {name}")?;
    }
    Ok(())
}

fn poster(path: Option<&str>, tmdb: &TmdbConfig) -> String {
    path.map(|path| tmdb.poster_url(path))
        .unwrap_or_else(|| NO_IMAGE.to_string())
}

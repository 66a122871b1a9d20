//! End-to-end browsing over the offline demo catalog.

use std::sync::Arc;

use marquee_core::{AggregatorConfig, BrowsingController, MovieAggregator, MovieSource};
use marquee_search::DemoSource;

fn controller() -> BrowsingController {
    let source: Arc<dyn MovieSource> = Arc::new(DemoSource::new());
    let aggregator = Arc::new(MovieAggregator::new(source, AggregatorConfig::default()));
    BrowsingController::new(aggregator)
}

#[tokio::test]
async fn test_scroll_until_catalog_is_exhausted() {
    let mut controller = controller();

    let first = controller.on_initial_load().await;
    assert_eq!(first.received, 4);
    assert!(first.can_fetch_more);

    let second = controller.on_scroll_near_bottom().await;
    assert_eq!(second.received, 4);

    let third = controller.on_scroll_near_bottom().await;
    assert_eq!(third.received, 0);
    assert!(!third.can_fetch_more);

    let aggregator = controller.aggregator();
    assert_eq!(aggregator.movie_count(), 8);
    assert_eq!(aggregator.now_playing_cursor(), 3);

    // Exhausted listings ignore further scrolling without asking the source.
    let ignored = controller.on_scroll_near_bottom().await;
    assert_eq!(ignored.received, 0);
    assert_eq!(controller.aggregator().now_playing_cursor(), 3);
}

#[tokio::test]
async fn test_search_then_clear_returns_to_first_page() {
    let mut controller = controller();
    controller.on_initial_load().await;
    controller.on_scroll_near_bottom().await;

    let outcome = controller.on_search_submitted("  panda ").await;
    assert_eq!(outcome.received, 1);
    assert_eq!(controller.search_query(), Some("panda"));

    let aggregator = Arc::clone(controller.aggregator());
    let ids: Vec<_> = aggregator.movies().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["101"]);
    assert_eq!(aggregator.active_query().as_deref(), Some("panda"));
    assert_eq!(aggregator.now_playing_cursor(), 1);
    assert_eq!(aggregator.search_cursor(), 2);

    let outcome = controller.on_search_cleared().await;
    assert_eq!(outcome.received, 4);
    assert!(outcome.can_fetch_more);
    assert_eq!(controller.search_query(), None);
    assert_eq!(aggregator.active_query(), None);
    assert_eq!(aggregator.movie_count(), 4);
    assert_eq!(aggregator.now_playing_cursor(), 2);
    assert_eq!(aggregator.search_cursor(), 1);
}

#[tokio::test]
async fn test_search_without_matches_empties_listing() {
    let mut controller = controller();
    controller.on_initial_load().await;

    let outcome = controller.on_search_submitted("no such film").await;

    assert_eq!(outcome.received, 0);
    assert!(!outcome.can_fetch_more);
    assert_eq!(controller.aggregator().movie_count(), 0);
}

#[tokio::test]
async fn test_details_over_demo_catalog() {
    let controller = controller();
    let aggregator = controller.aggregator();

    let video = aggregator.best_video_for("101").await.unwrap();
    assert_eq!(video.name, "Official Trailer");
    assert_eq!(
        video.embed_url().as_deref(),
        Some("https://www.youtube.com/embed/YE7VzlLtp-4")
    );

    let similar = aggregator.similar_movies_for("101").await;
    assert_eq!(similar.len(), 3);
    assert!(similar.iter().all(|preview| preview.id != "101"));

    let reviews = aggregator.reviews_for("101").await;
    assert_eq!(reviews.len(), 1);
    assert!(!reviews[0].content.contains("script"));
    assert!(!reviews[0].content.contains('<'));
    assert!(reviews[0].content.contains("great"));

    let genres = aggregator.ensure_genre_table().await;
    assert_eq!(genres.name(28), Some("Action"));
}

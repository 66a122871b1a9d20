//! Property tests for aggregator pagination.
//!
//! Drive a `MovieAggregator` over scripted sources of arbitrary shape and
//! check the listing and cursor invariants after every step.

use std::collections::HashSet;
use std::sync::Arc;

use marquee_core::source::{ScriptedSource, movie};
use marquee_core::{AggregatorConfig, MovieAggregator, MovieSource, MovieSummary};
use proptest::prelude::*;

fn pages(prefix: &str, page_count: usize, page_size: usize) -> Vec<Vec<MovieSummary>> {
    (0..page_count)
        .map(|page| {
            (0..page_size)
                .map(|slot| {
                    let id = format!("{prefix}-{page}-{slot}");
                    movie(&id, &id)
                })
                .collect()
        })
        .collect()
}

fn aggregator(source: ScriptedSource) -> MovieAggregator {
    let source: Arc<dyn MovieSource> = Arc::new(source);
    MovieAggregator::new(source, AggregatorConfig::default())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

fn assert_unique_ids(movies: &[MovieSummary]) {
    let unique: HashSet<_> = movies.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(unique.len(), movies.len());
}

proptest! {
    #[test]
    fn prop_now_playing_grows_by_page_size(page_count in 0usize..6, page_size in 1usize..8) {
        let aggregator = aggregator(
            ScriptedSource::new().with_now_playing(pages("np", page_count, page_size)),
        );

        runtime().block_on(async {
            for call in 1..=page_count {
                let before = aggregator.movie_count();
                let received = aggregator.advance_now_playing().await;

                assert_eq!(received, page_size);
                assert_eq!(aggregator.movie_count(), before + page_size);
                assert_eq!(aggregator.now_playing_cursor() as usize, call + 1);
                assert_unique_ids(&aggregator.movies());
            }

            let cursor = aggregator.now_playing_cursor();
            assert_eq!(aggregator.advance_now_playing().await, 0);
            assert_eq!(aggregator.now_playing_cursor(), cursor);
            assert_eq!(aggregator.movie_count(), page_count * page_size);
        });
    }

    #[test]
    fn prop_search_never_mixes_with_now_playing(
        now_playing_pages in 1usize..5,
        search_pages in 1usize..5,
        page_size in 1usize..5,
    ) {
        let aggregator = aggregator(
            ScriptedSource::new()
                .with_now_playing(pages("np", now_playing_pages, page_size))
                .with_search("query", pages("sr", search_pages, page_size)),
        );

        runtime().block_on(async {
            for _ in 0..now_playing_pages {
                aggregator.advance_now_playing().await;
            }
            for _ in 0..search_pages {
                aggregator.advance_search("query").await;
            }

            let movies = aggregator.movies();
            assert!(movies.iter().all(|m| m.id.starts_with("sr-")));
            assert_eq!(movies.len(), search_pages * page_size);
            assert_eq!(aggregator.search_cursor() as usize, search_pages + 1);
            assert_eq!(aggregator.now_playing_cursor(), 1);

            aggregator.advance_now_playing().await;
            let movies = aggregator.movies();
            assert!(movies.iter().all(|m| m.id.starts_with("np-0-")));
            assert_eq!(movies.len(), page_size);
            assert_eq!(aggregator.search_cursor(), 1);
            assert_eq!(aggregator.now_playing_cursor(), 2);
        });
    }
}

#[tokio::test]
async fn test_concrete_three_page_scenario() {
    let aggregator = aggregator(ScriptedSource::new().with_now_playing(vec![
        vec![movie("A", "A"), movie("B", "B")],
        vec![movie("C", "C"), movie("D", "D")],
        vec![],
    ]));

    aggregator.advance_now_playing().await;
    aggregator.advance_now_playing().await;
    let third = aggregator.advance_now_playing().await;

    let ids: Vec<_> = aggregator.movies().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
    assert_eq!(aggregator.now_playing_cursor(), 3);
    assert_eq!(third, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_advances_from_tasks() {
    let source = ScriptedSource::new()
        .with_now_playing(pages("np", 8, 3))
        .with_latency(std::time::Duration::from_millis(5));
    let aggregator = Arc::new(aggregator(source));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.advance_now_playing().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 3);
    }

    let movies = aggregator.movies();
    assert_eq!(movies.len(), 24);
    assert_unique_ids(&movies);
    assert_eq!(aggregator.now_playing_cursor(), 9);

    let pages_in_order: Vec<_> = movies
        .chunks(3)
        .map(|chunk| chunk[0].id.split('-').nth(1).map(str::to_string))
        .collect();
    let expected: Vec<_> = (0..8).map(|page| Some(page.to_string())).collect();
    assert_eq!(pages_in_order, expected);
}

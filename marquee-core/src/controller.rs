//! UI-facing browsing controller.
//!
//! Translates user intents (initial load, scroll near the bottom, search
//! submitted or cleared) into aggregator page advances and keeps track of
//! whether the current mode can still produce more pages.

use std::sync::Arc;

use tracing::debug;

use crate::aggregator::MovieAggregator;

/// Result of handling one browsing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseOutcome {
    /// Movies received by the triggered page advance, 0 if none was triggered
    pub received: usize,
    /// Whether further scroll events will fetch more pages
    pub can_fetch_more: bool,
}

/// Drives a [`MovieAggregator`] from UI events.
///
/// Handlers take `&mut self`, so one controller issues at most one page
/// advance at a time.
#[derive(Debug)]
pub struct BrowsingController {
    aggregator: Arc<MovieAggregator>,
    search_query: Option<String>,
    can_fetch_more: bool,
}

impl BrowsingController {
    pub fn new(aggregator: Arc<MovieAggregator>) -> Self {
        Self {
            aggregator,
            search_query: None,
            can_fetch_more: true,
        }
    }

    /// First page of the now-playing feed.
    pub async fn on_initial_load(&mut self) -> BrowseOutcome {
        self.search_query = None;
        self.can_fetch_more = true;
        self.advance().await
    }

    /// Next page of the current mode, unless the mode is exhausted.
    pub async fn on_scroll_near_bottom(&mut self) -> BrowseOutcome {
        if !self.can_fetch_more {
            debug!(query = ?self.search_query, "Listing exhausted, ignoring scroll");
            return self.outcome(0);
        }
        self.advance().await
    }

    /// Starts or continues a search. A blank query clears the search.
    pub async fn on_search_submitted(&mut self, query: &str) -> BrowseOutcome {
        let query = query.trim();
        if query.is_empty() {
            return self.on_search_cleared().await;
        }

        if self.search_query.as_deref() != Some(query) {
            self.search_query = Some(query.to_string());
            self.can_fetch_more = true;
        }
        self.advance().await
    }

    /// Leaves search mode and reloads the now-playing feed from page 1.
    pub async fn on_search_cleared(&mut self) -> BrowseOutcome {
        self.search_query = None;
        self.can_fetch_more = true;
        self.advance().await
    }

    /// Query of the active search intent.
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn can_fetch_more(&self) -> bool {
        self.can_fetch_more
    }

    pub fn aggregator(&self) -> &Arc<MovieAggregator> {
        &self.aggregator
    }

    async fn advance(&mut self) -> BrowseOutcome {
        let received = match &self.search_query {
            Some(query) => self.aggregator.advance_search(query).await,
            None => self.aggregator.advance_now_playing().await,
        };

        if received == 0 {
            debug!(query = ?self.search_query, "No more pages for current mode");
            self.can_fetch_more = false;
        }
        self.outcome(received)
    }

    fn outcome(&self, received: usize) -> BrowseOutcome {
        BrowseOutcome {
            received,
            can_fetch_more: self.can_fetch_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AggregatorConfig;
    use crate::source::{MovieSource, ScriptedSource, SourceCall, movie};

    fn controller(source: &Arc<ScriptedSource>) -> BrowsingController {
        let source: Arc<dyn MovieSource> = source.clone();
        let aggregator = Arc::new(MovieAggregator::new(source, AggregatorConfig::default()));
        BrowsingController::new(aggregator)
    }

    fn scripted() -> Arc<ScriptedSource> {
        Arc::new(
            ScriptedSource::new()
                .with_now_playing(vec![vec![movie("A", "A")], vec![movie("B", "B")]])
                .with_search("panda", vec![vec![movie("P1", "Panda")]]),
        )
    }

    #[tokio::test]
    async fn test_scrolling_stops_after_empty_page() {
        let source = scripted();
        let mut controller = controller(&source);

        assert_eq!(controller.on_initial_load().await.received, 1);
        assert_eq!(controller.on_scroll_near_bottom().await.received, 1);

        let exhausted = controller.on_scroll_near_bottom().await;
        assert_eq!(
            exhausted,
            BrowseOutcome {
                received: 0,
                can_fetch_more: false
            }
        );

        let calls = source.call_count();
        controller.on_scroll_near_bottom().await;
        assert_eq!(source.call_count(), calls);
    }

    #[tokio::test]
    async fn test_search_resets_exhaustion() {
        let source = scripted();
        let mut controller = controller(&source);

        controller.on_initial_load().await;
        controller.on_scroll_near_bottom().await;
        controller.on_scroll_near_bottom().await;
        assert!(!controller.can_fetch_more());

        let outcome = controller.on_search_submitted(" panda ").await;
        assert_eq!(outcome.received, 1);
        assert!(outcome.can_fetch_more);
        assert_eq!(controller.search_query(), Some("panda"));
        assert_eq!(
            source.calls().last(),
            Some(&SourceCall::Search("panda".to_string(), 1))
        );

        controller.on_scroll_near_bottom().await;
        assert_eq!(
            source.calls().last(),
            Some(&SourceCall::Search("panda".to_string(), 2))
        );
        assert!(!controller.can_fetch_more());
    }

    #[tokio::test]
    async fn test_clearing_search_reloads_now_playing() {
        let source = scripted();
        let mut controller = controller(&source);

        controller.on_initial_load().await;
        controller.on_search_submitted("panda").await;

        let outcome = controller.on_search_submitted("   ").await;

        assert_eq!(outcome.received, 1);
        assert_eq!(controller.search_query(), None);
        assert_eq!(source.calls().last(), Some(&SourceCall::NowPlaying(1)));
        let ids: Vec<_> = controller
            .aggregator()
            .movies()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["A"]);
    }

    #[tokio::test]
    async fn test_resubmitting_same_query_fetches_next_page() {
        let source = scripted();
        let mut controller = controller(&source);

        controller.on_search_submitted("panda").await;
        controller.on_search_submitted("panda").await;

        assert_eq!(
            source.calls(),
            vec![
                SourceCall::Search("panda".to_string(), 1),
                SourceCall::Search("panda".to_string(), 2)
            ]
        );
    }
}

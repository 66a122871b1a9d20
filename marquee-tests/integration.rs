//! Integration tests for Marquee
//!
//! These tests drive the aggregator and the browsing controller through
//! their public APIs over scripted and demo movie sources.

#[path = "integration/pagination_properties.rs"]
mod pagination_properties;

#[path = "integration/browsing_session.rs"]
mod browsing_session;

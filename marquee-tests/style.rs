//! Style Enforcement Tests
//!
//! Scans the production sources of every workspace crate for patterns that
//! clippy does not reject on its own.

#[path = "style/production_sources.rs"]
mod production_sources;

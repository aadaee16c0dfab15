//! Common Test Utilities
//!
//! Shared fixtures used across test modules:
//! - Content trees served from memory (`fixtures`)
//! - Prebuilt catalogs and summaries

pub mod fixtures;

pub use fixtures::*;

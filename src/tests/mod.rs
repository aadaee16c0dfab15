//! In-crate test tree: shared fixtures, loader tests and property-based tests.

pub mod common;
mod property;

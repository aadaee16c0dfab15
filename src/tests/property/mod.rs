//! Property-based tests for the content catalog
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `scoring_props`: relevance scoring and resolution
//!   - Scores are finite and non-negative
//!   - Exact matches outrank every partial match
//!   - Accumulated partial scores never reach the prefix score
//!   - Unrelated input never resolves
//!   - Resolution ignores case
//!
//! - `slug_props`: identity derivation
//!   - Slugs contain only lowercase alphanumerics and single dashes
//!   - Slugging is idempotent
//!   - Ruleset derivation ignores case
//!
//! ## Configuration
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable.

mod scoring_props;
mod slug_props;

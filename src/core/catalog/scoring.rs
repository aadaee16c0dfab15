//! Relevance scoring shared by fuzzy resolution and free-text search.
//!
//! Exact name, exact slug and name-prefix matches short-circuit with fixed
//! high scores. Everything else accumulates partial components, capped below
//! the prefix score so an accumulated partial match never outranks an exact
//! or prefix match.

use super::types::{slugify, CatalogSummary};

// ============================================================================
// Constants
// ============================================================================

pub const EXACT_NAME_SCORE: f64 = 100.0;
pub const EXACT_SLUG_SCORE: f64 = 95.0;
pub const PREFIX_SCORE: f64 = 90.0;

/// Tie-break added to short-circuit scores for homebrew candidates.
pub const HOMEBREW_EXACT_BONUS: f64 = 1.0;

const CONTAINS_SCORE: f64 = 40.0;
const ALIAS_EXACT_SCORE: f64 = 35.0;
const ALIAS_CONTAINS_SCORE: f64 = 15.0;
const TOKEN_SCORE: f64 = 8.0;
const MIN_TOKEN_LEN: usize = 3;

/// Edit-distance bonus is `EDIT_BASE - EDIT_STEP * distance`, floored at 0.
const EDIT_BASE: f64 = 30.0;
const EDIT_STEP: f64 = 6.0;
/// Longer queries skip the edit-distance component.
const MAX_EDIT_QUERY_CHARS: usize = 40;

/// Too small to beat a better textual match.
const HOMEBREW_PARTIAL_BONUS: f64 = 0.5;

/// Ceiling for accumulated partial scores, kept below [`PREFIX_SCORE`].
const MAX_PARTIAL_SCORE: f64 = 85.0;

/// Minimum score for the fuzzy fallback to return anything.
pub const MIN_FUZZY_SCORE: f64 = 15.0;

// ============================================================================
// Scoring
// ============================================================================

/// Score how well `query` matches `candidate`. Higher is better; 0 means no
/// meaningful relation.
pub fn score(query: &str, candidate: &CatalogSummary) -> f64 {
    let query = normalize(query);
    if query.is_empty() {
        return 0.0;
    }

    let homebrew = candidate.is_homebrew();
    let name = normalize(&candidate.name);

    if name == query {
        return EXACT_NAME_SCORE + exact_bonus(homebrew);
    }
    if slugify(&query) == candidate.slug {
        return EXACT_SLUG_SCORE + exact_bonus(homebrew);
    }
    if name.starts_with(&query) {
        return PREFIX_SCORE + exact_bonus(homebrew);
    }

    let aliases: Vec<String> = candidate.aliases.iter().map(|a| normalize(a)).collect();
    let mut total = 0.0;

    if name.contains(&query) {
        total += CONTAINS_SCORE;
    }

    for alias in &aliases {
        if *alias == query {
            total += ALIAS_EXACT_SCORE;
        } else if alias.contains(&query) {
            total += ALIAS_CONTAINS_SCORE;
        }
    }

    for token in tokens(&query) {
        if name.contains(token) || aliases.iter().any(|a| a.contains(token)) {
            total += TOKEN_SCORE;
        }
    }

    if query.chars().count() <= MAX_EDIT_QUERY_CHARS {
        let distance = strsim::levenshtein(&query, &name) as f64;
        total += (EDIT_BASE - EDIT_STEP * distance).max(0.0);
    }

    let total = total.min(MAX_PARTIAL_SCORE);
    if homebrew && total > 0.0 {
        total + HOMEBREW_PARTIAL_BONUS
    } else {
        total
    }
}

fn exact_bonus(homebrew: bool) -> f64 {
    if homebrew {
        HOMEBREW_EXACT_BONUS
    } else {
        0.0
    }
}

/// Lowercase, trim and collapse internal whitespace.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Query tokens split on whitespace and punctuation, at least
/// [`MIN_TOKEN_LEN`] characters long.
fn tokens(query: &str) -> impl Iterator<Item = &str> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
}

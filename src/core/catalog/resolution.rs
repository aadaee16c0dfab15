//! Resolution Engine: best-effort lookup and free-text search.
//!
//! # Resolution Order
//!
//! ```text
//! 1. Exact case-insensitive name match (restricted to `source` if given)
//! 2. Without a source, ties between exact matches break by preference:
//!    homebrew > preferred ruleset > kind's default source
//!    > source abbreviation (alphabetical) > URI
//! 3. Scored fuzzy fallback, only above MIN_FUZZY_SCORE
//!    (restricted to `source` if given)
//! ```
//!
//! Resolution never fails: absence is the only miss signal.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ttrpg_catalog::core::catalog::{EntityKind, ResolveQuery, Ruleset};
//!
//! let query = ResolveQuery::new(EntityKind::Spell, "shield")
//!     .with_ruleset(Ruleset::Edition2024);
//!
//! if let Some(summary) = catalog.resolve(&query) {
//!     let entity = catalog.get_by_uri(summary.uri.as_str());
//! }
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::kinds::EntityKind;
use super::memory_catalog::Catalog;
use super::scoring::{self, MIN_FUZZY_SCORE};
use super::types::{CatalogSummary, Ruleset};

/// Default number of hits returned by [`Catalog::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

// ============================================================================
// Queries
// ============================================================================

/// Best-effort lookup request: (kind, name, optional source, optional
/// ruleset preference).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveQuery {
    pub kind: EntityKind,
    pub name: String,

    /// Restrict matches to this source abbreviation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Preferred edition among otherwise-equal exact matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<Ruleset>,
}

impl ResolveQuery {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            source: None,
            ruleset: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = Some(ruleset);
        self
    }
}

/// Free-text search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    #[serde(default)]
    pub kind: Option<EntityKind>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub ruleset: Option<Ruleset>,
    #[serde(default)]
    pub homebrew_only: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: None,
            source: None,
            ruleset: None,
            homebrew_only: false,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = Some(ruleset);
        self
    }

    pub fn homebrew_only(mut self) -> Self {
        self.homebrew_only = true;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn accepts(&self, summary: &CatalogSummary) -> bool {
        self.source
            .as_deref()
            .map_or(true, |s| summary.source.eq_ignore_ascii_case(s))
            && self.ruleset.map_or(true, |r| summary.ruleset == r)
            && (!self.homebrew_only || summary.is_homebrew())
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub summary: &'a CatalogSummary,
    pub score: f64,
}

// ============================================================================
// Resolution
// ============================================================================

impl Catalog {
    /// Resolve a human query to one summary, or `None`.
    pub fn resolve(&self, query: &ResolveQuery) -> Option<&CatalogSummary> {
        let needle = query.name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let in_scope = |summary: &&CatalogSummary| {
            query
                .source
                .as_deref()
                .map_or(true, |s| summary.source.eq_ignore_ascii_case(s))
        };

        let exact = self
            .summaries_of(query.kind)
            .filter(in_scope)
            .filter(|s| s.name.trim().to_lowercase() == needle)
            .min_by(|a, b| prefer(a, b, query.ruleset));
        if exact.is_some() {
            return exact;
        }

        self.summaries_of(query.kind)
            .filter(in_scope)
            .map(|s| (s, scoring::score(&query.name, s)))
            .filter(|(_, score)| *score >= MIN_FUZZY_SCORE)
            .min_by(|(a, sa), (b, sb)| sb.total_cmp(sa).then_with(|| prefer(a, b, query.ruleset)))
            .map(|(s, _)| s)
    }

    /// Relevance of `candidate` for `query`, as used by resolution.
    pub fn score(&self, query: &str, candidate: &CatalogSummary) -> f64 {
        scoring::score(query, candidate)
    }

    /// Rank summaries against free text. Zero scores are dropped.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit<'_>> {
        let kinds: Vec<EntityKind> = match query.kind {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };

        let mut hits: Vec<SearchHit<'_>> = kinds
            .into_iter()
            .flat_map(|kind| self.summaries_of(kind))
            .filter(|s| query.accepts(s))
            .map(|summary| SearchHit {
                summary,
                score: scoring::score(&query.text, summary),
            })
            .filter(|hit| hit.score > 0.0)
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| prefer(a.summary, b.summary, query.ruleset))
        });
        hits.truncate(query.limit);
        hits
    }
}

/// Total preference order between two candidates; `Less` means `a` wins.
fn prefer(a: &CatalogSummary, b: &CatalogSummary, ruleset: Option<Ruleset>) -> Ordering {
    let in_ruleset = |s: &CatalogSummary| ruleset.is_some_and(|r| s.ruleset == r);
    let is_default = |s: &CatalogSummary| s.kind.default_source() == Some(s.source.as_str());

    b.is_homebrew()
        .cmp(&a.is_homebrew())
        .then_with(|| in_ruleset(b).cmp(&in_ruleset(a)))
        .then_with(|| is_default(b).cmp(&is_default(a)))
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.uri.as_str().cmp(b.uri.as_str()))
}

//! Core data models for the content catalog.
//!
//! - [`Ruleset`]: rules edition, derived purely from a source abbreviation
//! - [`EntityUri`]: stable, durable identifier for a catalog entity
//! - [`CatalogSummary`]: lightweight searchable projection of an entity
//! - [`StoredEntity`]: full record used for detail retrieval
//!
//! A summary and its stored entity share the same URI and are always inserted
//! and replaced together by the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{CatalogError, Result};
use super::facets::Facets;
use super::kinds::EntityKind;

/// Source used when neither the record nor its file declares one.
pub const UNKNOWN_SOURCE: &str = "UNKNOWN";

/// Abbreviation prefixes that mark the newer rules edition.
const NEWER_EDITION_PREFIXES: &[&str] = &["XPHB", "XDMG", "XMM", "XSCREEN"];

const URI_SCHEME: &str = "catalog://";

// ============================================================================
// Ruleset
// ============================================================================

/// Rules edition a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ruleset {
    #[serde(rename = "2014")]
    Edition2014,
    #[serde(rename = "2024")]
    Edition2024,
}

impl Ruleset {
    /// Derive the ruleset from a source abbreviation.
    ///
    /// Pure function of the text: a recognized prefix marks the 2024 edition,
    /// everything else (homebrew included) is 2014.
    pub fn for_source(source: &str) -> Self {
        let upper = source.trim().to_ascii_uppercase();
        if NEWER_EDITION_PREFIXES.iter().any(|p| upper.starts_with(p)) {
            Self::Edition2024
        } else {
            Self::Edition2014
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edition2014 => "2014",
            Self::Edition2024 => "2024",
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Ruleset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "2014" => Ok(Self::Edition2014),
            "2024" => Ok(Self::Edition2024),
            other => Err(format!("unknown ruleset: {other}")),
        }
    }
}

// ============================================================================
// Slugs
// ============================================================================

/// Lowercase the name and collapse every run of non-alphanumeric characters
/// into a single `-`, trimming dashes at both ends.
///
/// `"Tasha's Hideous Laughter"` → `"tasha-s-hideous-laughter"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

// ============================================================================
// EntityUri
// ============================================================================

/// Stable identifier of a catalog entity.
///
/// Entities: `catalog://entity/{kind}/{source}/{slug}`.
/// Roll-tables: `catalog://table/{source}/{slug}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityUri(String);

impl EntityUri {
    /// Build the URI for an entity. Tables get the table scheme.
    pub fn new(kind: EntityKind, source: &str, slug: &str) -> Self {
        match kind {
            EntityKind::Table => Self(format!("{URI_SCHEME}table/{source}/{slug}")),
            _ => Self(format!("{URI_SCHEME}entity/{kind}/{source}/{slug}")),
        }
    }

    /// Parse a URI string, returning its `(kind, source, slug)` parts.
    pub fn parse(uri: &str) -> Result<(EntityKind, String, String)> {
        let invalid = || CatalogError::InvalidUri(uri.to_string());
        let rest = uri.strip_prefix(URI_SCHEME).ok_or_else(invalid)?;

        let (kind, rest) = if let Some(rest) = rest.strip_prefix("table/") {
            (EntityKind::Table, rest)
        } else if let Some(rest) = rest.strip_prefix("entity/") {
            let (kind, rest) = rest.split_once('/').ok_or_else(invalid)?;
            let kind: EntityKind = kind.parse().map_err(|_| invalid())?;
            if kind == EntityKind::Table {
                return Err(invalid());
            }
            (kind, rest)
        } else {
            return Err(invalid());
        };

        let (source, slug) = rest.rsplit_once('/').ok_or_else(invalid)?;
        if source.is_empty() || slug.is_empty() {
            return Err(invalid());
        }
        Ok((kind, source.to_string(), slug.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for EntityUri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// CatalogSummary
// ============================================================================

/// Searchable projection of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub uri: EntityUri,
    pub name: String,
    pub slug: String,
    pub source: String,
    pub ruleset: Ruleset,
    pub kind: EntityKind,
    pub facets: Facets,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// `Some(true)` for overlay content, absent for official content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homebrew: Option<bool>,
}

impl CatalogSummary {
    #[inline]
    pub fn is_homebrew(&self) -> bool {
        self.homebrew.unwrap_or(false)
    }
}

// ============================================================================
// StoredEntity
// ============================================================================

/// Keys overwritten by injected values when a record is stored.
const INJECTED_KEYS: &[&str] = &["uri", "source", "ruleset", "kind", "homebrew"];

/// Full original record plus injected identity fields.
///
/// Serializes as a single flat object: the record's own keys together with
/// `uri`, `source`, `ruleset`, `kind` (and `homebrew` for overlay content).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEntity {
    pub uri: EntityUri,
    pub source: String,
    pub ruleset: Ruleset,
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub homebrew: bool,
    #[serde(flatten)]
    record: Map<String, Value>,
}

impl StoredEntity {
    /// Wrap a raw record, dropping any keys that collide with injected fields.
    pub fn new(
        uri: EntityUri,
        kind: EntityKind,
        source: impl Into<String>,
        mut record: Map<String, Value>,
        homebrew: bool,
    ) -> Self {
        for key in INJECTED_KEYS {
            record.remove(*key);
        }
        let source = source.into();
        Self {
            ruleset: Ruleset::for_source(&source),
            uri,
            source,
            kind,
            homebrew,
            record,
        }
    }

    /// Raw record fields (without injected keys).
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Look up a raw record field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(Value::as_str)
    }

    /// Merge deferred body content into the record. Injected keys are
    /// protected and cannot be overwritten this way.
    pub fn merge_body(&mut self, key: &str, body: Value) {
        if INJECTED_KEYS.contains(&key) {
            return;
        }
        self.record.insert(key.to_string(), body);
    }

    /// Whole entity as a JSON value (record plus injected fields).
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

//! Registry of content sources seen during ingestion.
//!
//! Every distinct source abbreviation gets one [`SourceEntry`]. Registration
//! is an idempotent upsert that can be called redundantly and in any order:
//! the first non-empty display name sticks, and contributed kinds only ever
//! accumulate.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::kinds::EntityKind;
use super::types::Ruleset;

/// Metadata for one source abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub abbreviation: String,
    pub display_name: Option<String>,
    pub kinds: BTreeSet<EntityKind>,
}

impl SourceEntry {
    fn new(abbreviation: &str) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            display_name: None,
            kinds: BTreeSet::new(),
        }
    }

    /// Ruleset derived from the abbreviation on every call, so it cannot
    /// drift from the text.
    pub fn ruleset(&self) -> Ruleset {
        Ruleset::for_source(&self.abbreviation)
    }
}

/// Serializes with the derived `ruleset` alongside the stored fields.
impl Serialize for SourceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 3 + usize::from(self.display_name.is_some());
        let mut state = serializer.serialize_struct("SourceEntry", len)?;
        state.serialize_field("abbreviation", &self.abbreviation)?;
        match &self.display_name {
            Some(name) => state.serialize_field("display_name", name)?,
            None => state.skip_field("display_name")?,
        }
        state.serialize_field("kinds", &self.kinds)?;
        state.serialize_field("ruleset", &self.ruleset())?;
        state.end()
    }
}

impl SourceEntry {
    /// JSON representation, including the derived `ruleset` field.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// All sources known to a catalog, ordered by abbreviation.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, SourceEntry>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a source. Blank abbreviations are ignored.
    pub fn register(&mut self, abbreviation: &str, display_name: Option<&str>, kind: Option<EntityKind>) {
        let abbreviation = abbreviation.trim();
        if abbreviation.is_empty() {
            return;
        }

        let entry = self
            .sources
            .entry(abbreviation.to_string())
            .or_insert_with(|| SourceEntry::new(abbreviation));

        if entry.display_name.is_none() {
            if let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) {
                entry.display_name = Some(name.to_string());
            }
        }

        if let Some(kind) = kind {
            entry.kinds.insert(kind);
        }
    }

    pub fn get(&self, abbreviation: &str) -> Option<&SourceEntry> {
        self.sources.get(abbreviation)
    }

    /// Sources matching both optional filters, ordered by abbreviation.
    pub fn list(&self, ruleset: Option<Ruleset>, kind: Option<EntityKind>) -> Vec<SourceEntry> {
        self.sources
            .values()
            .filter(|e| ruleset.map_or(true, |r| e.ruleset() == r))
            .filter(|e| kind.map_or(true, |k| e.kinds.contains(&k)))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

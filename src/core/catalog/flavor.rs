//! Flavor-text side table.
//!
//! Narrative text ("fluff") is keyed by (kind, source, slug) and consulted
//! only by detail retrieval. It never participates in resolution.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::kinds::EntityKind;

/// Flavor records keyed by (kind, source, slug).
#[derive(Debug, Clone, Default)]
pub struct FlavorTable {
    entries: HashMap<(EntityKind, String, String), Map<String, Value>>,
}

impl FlavorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the flavor record for an entity.
    pub fn insert(&mut self, kind: EntityKind, source: &str, slug: &str, record: Map<String, Value>) {
        self.entries
            .insert((kind, source.to_string(), slug.to_string()), record);
    }

    pub fn get(&self, kind: EntityKind, source: &str, slug: &str) -> Option<&Map<String, Value>> {
        self.entries
            .get(&(kind, source.to_string(), slug.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

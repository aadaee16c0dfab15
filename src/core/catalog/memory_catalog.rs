//! In-memory catalog state.
//!
//! A [`Catalog`] is explicitly owned state: created by a builder, then handed
//! out (typically behind an `Arc`) to readers. Once ingestion finishes it is
//! never mutated again, so concurrent readers need no synchronization.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ttrpg_catalog::core::catalog::{CatalogLoader, EntityKind, ResolveQuery};
//!
//! let catalog = Arc::new(loader.load().await);
//! let goblin = catalog.resolve(&ResolveQuery::new(EntityKind::Monster, "goblin"));
//! ```

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::flavor::FlavorTable;
use super::kinds::EntityKind;
use super::source_registry::{SourceEntry, SourceRegistry};
use super::types::{CatalogSummary, EntityUri, Ruleset, StoredEntity};

/// Counts describing a built catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub entities: usize,
    pub homebrew: usize,
    pub sources: usize,
    pub flavor: usize,
    pub by_kind: BTreeMap<EntityKind, usize>,
}

/// The assembled catalog: summaries, stored entities, sources, flavor.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Per-kind summaries keyed by URI, in first-insertion order.
    summaries: HashMap<EntityKind, IndexMap<EntityUri, CatalogSummary>>,

    /// Full records keyed by URI.
    entities: HashMap<EntityUri, StoredEntity>,

    sources: SourceRegistry,

    flavor: FlavorTable,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Mutation (builder only)
    // ========================================================================

    /// Insert a summary and its stored entity together. An existing pair at
    /// the same URI is replaced (last write wins).
    pub(crate) fn insert(&mut self, summary: CatalogSummary, entity: StoredEntity) {
        debug_assert_eq!(summary.uri, entity.uri);
        self.entities.insert(entity.uri.clone(), entity);
        self.summaries
            .entry(summary.kind)
            .or_default()
            .insert(summary.uri.clone(), summary);
    }

    pub(crate) fn entity_mut(&mut self, uri: &str) -> Option<&mut StoredEntity> {
        self.entities.get_mut(uri)
    }

    pub(crate) fn sources_mut(&mut self) -> &mut SourceRegistry {
        &mut self.sources
    }

    pub(crate) fn flavor_mut(&mut self) -> &mut FlavorTable {
        &mut self.flavor
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Direct lookup by URI. No fuzziness; `None` is a normal outcome.
    pub fn get_by_uri(&self, uri: &str) -> Option<&StoredEntity> {
        self.entities.get(uri)
    }

    /// Summary for a URI.
    pub fn summary(&self, uri: &str) -> Option<&CatalogSummary> {
        let (kind, _, _) = EntityUri::parse(uri).ok()?;
        self.summaries.get(&kind)?.get(uri)
    }

    /// All summaries of a kind. Order is not significant.
    pub fn list_by_kind(&self, kind: EntityKind) -> Vec<&CatalogSummary> {
        self.summaries_of(kind).collect()
    }

    pub(crate) fn summaries_of(&self, kind: EntityKind) -> impl Iterator<Item = &CatalogSummary> {
        self.summaries.get(&kind).into_iter().flat_map(|list| list.values())
    }

    /// Sources matching the optional ruleset and kind filters.
    pub fn list_sources(&self, ruleset: Option<Ruleset>, kind: Option<EntityKind>) -> Vec<SourceEntry> {
        self.sources.list(ruleset, kind)
    }

    pub fn source(&self, abbreviation: &str) -> Option<&SourceEntry> {
        self.sources.get(abbreviation)
    }

    /// Flavor record for the entity at `uri`, if any.
    pub fn flavor_for(&self, uri: &str) -> Option<&Map<String, Value>> {
        let (kind, source, slug) = EntityUri::parse(uri).ok()?;
        self.flavor.get(kind, &source, &slug)
    }

    /// Flavor record by (kind, source, display name).
    pub fn flavor(&self, kind: EntityKind, source: &str, name: &str) -> Option<&Map<String, Value>> {
        self.flavor.get(kind, source, &super::types::slugify(name))
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Total number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let by_kind = self
            .summaries
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(kind, list)| (*kind, list.len()))
            .collect();

        CatalogStats {
            entities: self.entities.len(),
            homebrew: self.entities.values().filter(|e| e.homebrew).count(),
            sources: self.sources.len(),
            flavor: self.flavor.len(),
            by_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::facets::Facets;
    use crate::core::catalog::types::slugify;

    fn pair(kind: EntityKind, source: &str, name: &str, homebrew: bool) -> (CatalogSummary, StoredEntity) {
        let slug = slugify(name);
        let uri = EntityUri::new(kind, source, &slug);
        let mut record = Map::new();
        record.insert("name".into(), Value::String(name.into()));
        let summary = CatalogSummary {
            uri: uri.clone(),
            name: name.to_string(),
            slug,
            source: source.to_string(),
            ruleset: Ruleset::for_source(source),
            kind,
            facets: Facets::None,
            aliases: Vec::new(),
            homebrew: homebrew.then_some(true),
        };
        (summary, StoredEntity::new(uri, kind, source, record, homebrew))
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.list_by_kind(EntityKind::Monster).is_empty());
        assert!(catalog.get_by_uri("catalog://entity/monster/MM/goblin").is_none());
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = Catalog::new();
        let (summary, entity) = pair(EntityKind::Monster, "MM", "Goblin", false);
        catalog.insert(summary, entity);

        let stored = catalog.get_by_uri("catalog://entity/monster/MM/goblin").unwrap();
        assert_eq!(stored.kind, EntityKind::Monster);
        assert_eq!(stored.source, "MM");
        assert_eq!(catalog.list_by_kind(EntityKind::Monster).len(), 1);
        assert_eq!(
            catalog.summary("catalog://entity/monster/MM/goblin").unwrap().name,
            "Goblin"
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut catalog = Catalog::new();
        let (summary, entity) = pair(EntityKind::Spell, "PHB", "Shield", false);
        catalog.insert(summary, entity);
        let (summary, entity) = pair(EntityKind::Spell, "PHB", "SHIELD", true);
        catalog.insert(summary, entity);

        let spells = catalog.list_by_kind(EntityKind::Spell);
        assert_eq!(spells.len(), 1);
        assert_eq!(spells[0].name, "SHIELD");
        assert!(catalog.get_by_uri(spells[0].uri.as_str()).unwrap().homebrew);
    }

    #[test]
    fn test_stats() {
        let mut catalog = Catalog::new();
        for (kind, source, name, hb) in [
            (EntityKind::Monster, "MM", "Goblin", false),
            (EntityKind::Monster, "MM", "Orc", false),
            (EntityKind::Spell, "HB", "Zap", true),
        ] {
            let (summary, entity) = pair(kind, source, name, hb);
            catalog.sources_mut().register(source, None, Some(kind));
            catalog.insert(summary, entity);
        }

        let stats = catalog.stats();
        assert_eq!(stats.entities, 3);
        assert_eq!(stats.homebrew, 1);
        assert_eq!(stats.sources, 2);
        assert_eq!(stats.by_kind[&EntityKind::Monster], 2);
        assert_eq!(stats.by_kind[&EntityKind::Spell], 1);
    }
}

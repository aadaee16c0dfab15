//! Test Fixtures
//!
//! Provides small, realistic content trees and prebuilt catalogs.

use std::path::Path;

use serde_json::{json, Value};

use crate::core::catalog::{
    slugify, Catalog, CatalogBuilder, CatalogSummary, EntityKind, EntityUri, Facets,
    MemoryContentProvider, Ruleset,
};

// =============================================================================
// Summary Fixtures
// =============================================================================

/// A bare summary with no facets.
pub fn summary(kind: EntityKind, source: &str, name: &str, aliases: &[&str], homebrew: bool) -> CatalogSummary {
    let slug = slugify(name);
    CatalogSummary {
        uri: EntityUri::new(kind, source, &slug),
        name: name.to_string(),
        slug,
        source: source.to_string(),
        ruleset: Ruleset::for_source(source),
        kind,
        facets: Facets::None,
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        homebrew: homebrew.then_some(true),
    }
}

// =============================================================================
// Content Fixtures
// =============================================================================

pub fn bestiary_mm() -> Value {
    json!({
        "_meta": {"sources": [{"json": "MM", "full": "Monster Manual"}]},
        "monster": [
            {"name": "Goblin", "source": "MM", "cr": "1/4", "type": "humanoid", "size": ["S"]},
            {"name": "Dragon Turtle", "source": "MM", "cr": 17, "type": "dragon", "size": ["G"]},
            {"name": "Owlbear", "source": "MM", "cr": 3, "type": "monstrosity", "size": ["L"]},
            {"name": "Kobold", "source": "MM", "cr": "1/8", "type": "humanoid", "size": ["S"]}
        ]
    })
}

pub fn bestiary_xmm() -> Value {
    json!({
        "monster": [
            {"name": "Goblin Warrior", "source": "XMM", "cr": "1/4", "type": {"type": "fey", "tags": ["goblinoid"]}},
            {"name": "Owlbear", "source": "XMM", "cr": 3, "type": "monstrosity"}
        ]
    })
}

pub fn spells_phb() -> Value {
    json!({
        "spell": [
            {"name": "Shield", "source": "PHB", "level": 1, "school": "A"},
            {"name": "Fireball", "source": "PHB", "level": 3, "school": "V"},
            {"name": "Tasha's Hideous Laughter", "source": "PHB", "level": 1, "school": "E",
             "alias": ["Hideous Laughter"]}
        ]
    })
}

pub fn spells_xphb() -> Value {
    json!({
        "spell": [
            {"name": "Fireball", "source": "XPHB", "level": 3, "school": "V"}
        ]
    })
}

/// Official content tree covering the three ingestion shapes.
pub fn sample_provider() -> MemoryContentProvider {
    MemoryContentProvider::new()
        .with_json("bestiary/bestiary-mm.json", &bestiary_mm())
        .with_json("bestiary/bestiary-xmm.json", &bestiary_xmm())
        .with_json(
            "bestiary/fluff-bestiary-mm.json",
            &json!({"monsterFluff": [{"name": "Goblin", "source": "MM", "entries": ["Goblins are small."]}]}),
        )
        .with_json("spells/spells-phb.json", &spells_phb())
        .with_json("spells/spells-xphb.json", &spells_xphb())
        .with_json(
            "items.json",
            &json!({"item": [{"name": "Bag of Holding", "source": "DMG", "rarity": "uncommon", "type": "W"}]}),
        )
        .with_json(
            "books.json",
            &json!({"book": [{"name": "Player's Handbook", "id": "PHB", "group": "core"}]}),
        )
        .with_json("book/book-phb.json", &json!({"data": [{"type": "section", "name": "Races"}]}))
}

/// Homebrew document that shadows an official spell by name.
pub fn homebrew_shield() -> Value {
    json!({
        "_meta": {"sources": [{"json": "HB", "full": "House Rules"}]},
        "spell": [{"name": "Shield", "level": 1, "school": "A"}]
    })
}

// =============================================================================
// Catalog Fixtures
// =============================================================================

/// Catalog built synchronously from the sample documents.
pub fn sample_catalog() -> Catalog {
    let mut builder = CatalogBuilder::new();
    let monsters = [EntityKind::Monster];
    let spells = [EntityKind::Spell];

    for (path, doc, kinds) in [
        ("bestiary/bestiary-mm.json", bestiary_mm(), &monsters[..]),
        ("bestiary/bestiary-xmm.json", bestiary_xmm(), &monsters[..]),
        ("spells/spells-phb.json", spells_phb(), &spells[..]),
        ("spells/spells-xphb.json", spells_xphb(), &spells[..]),
    ] {
        builder
            .ingest_directory_file(Path::new(path), &doc, kinds)
            .expect("fixture documents are objects");
    }

    builder.finish()
}

/// [`sample_catalog`] plus the homebrew Shield overlay.
pub fn sample_catalog_with_homebrew() -> Catalog {
    let mut builder = CatalogBuilder::from_catalog(sample_catalog());
    builder
        .ingest_homebrew(Path::new("homebrew.json"), &homebrew_shield())
        .expect("fixture overlay is an object");
    builder.finish()
}

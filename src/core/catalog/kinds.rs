//! Entity kinds and their static lookup tables.
//!
//! The kind → storage key and kind → default source mappings are plain
//! constant data. Storage keys are the top-level array names used by the
//! content files (`"monster"`, `"variantrule"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// EntityKind
// ============================================================================

/// Closed set of content categories. Every entity belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Monster,
    Spell,
    Item,
    Feat,
    Background,
    Race,
    Class,
    Subclass,
    Condition,
    Disease,
    Rule,
    OptionalFeature,
    Deity,
    Language,
    Object,
    Trap,
    Hazard,
    Vehicle,
    Reward,
    Psionic,
    Action,
    Table,
    Adventure,
    Book,
}

/// Kind → (storage key, default source). `None` means the kind has no
/// canonical core source.
const KIND_TABLE: &[(EntityKind, &str, Option<&str>)] = &[
    (EntityKind::Monster, "monster", Some("MM")),
    (EntityKind::Spell, "spell", Some("PHB")),
    (EntityKind::Item, "item", Some("DMG")),
    (EntityKind::Feat, "feat", Some("PHB")),
    (EntityKind::Background, "background", Some("PHB")),
    (EntityKind::Race, "race", Some("PHB")),
    (EntityKind::Class, "class", Some("PHB")),
    (EntityKind::Subclass, "subclass", Some("PHB")),
    (EntityKind::Condition, "condition", Some("PHB")),
    (EntityKind::Disease, "disease", Some("DMG")),
    (EntityKind::Rule, "variantrule", Some("DMG")),
    (EntityKind::OptionalFeature, "optionalfeature", Some("PHB")),
    (EntityKind::Deity, "deity", Some("PHB")),
    (EntityKind::Language, "language", Some("PHB")),
    (EntityKind::Object, "object", Some("DMG")),
    (EntityKind::Trap, "trap", Some("DMG")),
    (EntityKind::Hazard, "hazard", Some("DMG")),
    (EntityKind::Vehicle, "vehicle", Some("GoS")),
    (EntityKind::Reward, "reward", Some("DMG")),
    (EntityKind::Psionic, "psionic", Some("UATheMysticClass")),
    (EntityKind::Action, "action", Some("PHB")),
    (EntityKind::Table, "table", Some("DMG")),
    (EntityKind::Adventure, "adventure", None),
    (EntityKind::Book, "book", None),
];

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 24] = [
        EntityKind::Monster,
        EntityKind::Spell,
        EntityKind::Item,
        EntityKind::Feat,
        EntityKind::Background,
        EntityKind::Race,
        EntityKind::Class,
        EntityKind::Subclass,
        EntityKind::Condition,
        EntityKind::Disease,
        EntityKind::Rule,
        EntityKind::OptionalFeature,
        EntityKind::Deity,
        EntityKind::Language,
        EntityKind::Object,
        EntityKind::Trap,
        EntityKind::Hazard,
        EntityKind::Vehicle,
        EntityKind::Reward,
        EntityKind::Psionic,
        EntityKind::Action,
        EntityKind::Table,
        EntityKind::Adventure,
        EntityKind::Book,
    ];

    fn row(self) -> &'static (EntityKind, &'static str, Option<&'static str>) {
        // KIND_TABLE lists every variant in declaration order.
        &KIND_TABLE[self as usize]
    }

    /// Name used in URIs and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monster => "monster",
            Self::Spell => "spell",
            Self::Item => "item",
            Self::Feat => "feat",
            Self::Background => "background",
            Self::Race => "race",
            Self::Class => "class",
            Self::Subclass => "subclass",
            Self::Condition => "condition",
            Self::Disease => "disease",
            Self::Rule => "rule",
            Self::OptionalFeature => "optional_feature",
            Self::Deity => "deity",
            Self::Language => "language",
            Self::Object => "object",
            Self::Trap => "trap",
            Self::Hazard => "hazard",
            Self::Vehicle => "vehicle",
            Self::Reward => "reward",
            Self::Psionic => "psionic",
            Self::Action => "action",
            Self::Table => "table",
            Self::Adventure => "adventure",
            Self::Book => "book",
        }
    }

    /// Top-level array key holding this kind in content files.
    pub fn storage_key(self) -> &'static str {
        self.row().1
    }

    /// Key of the flavor-text array for this kind (`"monsterFluff"`, ...).
    pub fn fluff_key(self) -> String {
        format!("{}Fluff", self.storage_key())
    }

    /// Canonical core source for this kind, if any.
    pub fn default_source(self) -> Option<&'static str> {
        self.row().2
    }

    /// Look up the kind stored under a top-level content key.
    pub fn from_storage_key(key: &str) -> Option<Self> {
        KIND_TABLE
            .iter()
            .find(|(_, storage, _)| *storage == key)
            .map(|(kind, _, _)| *kind)
    }

    /// Look up the kind whose flavor-text array uses this key.
    pub fn from_fluff_key(key: &str) -> Option<Self> {
        key.strip_suffix("Fluff").and_then(Self::from_storage_key)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts the URI name (`optional_feature`) or the storage key
    /// (`optionalfeature`), case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == lower || k.storage_key() == lower)
            .ok_or_else(|| format!("unknown entity kind: {s}"))
    }
}

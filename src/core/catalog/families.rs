//! Ingestion plan for the official content tree.
//!
//! Each [`FamilyLayout`] describes one input family and where it lives,
//! relative to the content root. This is plain constant data: the loader
//! walks it, the builder interprets the parsed documents.

use super::kinds::EntityKind;

/// Shape of one input family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyLayout {
    /// Many files in one folder, each with zero or more kinds' arrays.
    Directory {
        dir: &'static str,
        kinds: &'static [EntityKind],
    },
    /// One file holding a primary kind's array plus extra arrays folded into
    /// the primary kind or a related one.
    SingleFile {
        file: &'static str,
        primary: EntityKind,
        extras: &'static [(&'static str, EntityKind)],
        fluff: Option<&'static str>,
    },
    /// Root index of lightweight metadata plus one body file per entity at
    /// `{body_dir}/{body_prefix}{id}.json`.
    Indexed {
        index_file: &'static str,
        kind: EntityKind,
        body_dir: &'static str,
        body_prefix: &'static str,
    },
}

impl FamilyLayout {
    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Directory { dir, .. } => dir,
            Self::SingleFile { file, .. } => file,
            Self::Indexed { index_file, .. } => index_file,
        }
    }
}

const fn single(file: &'static str, primary: EntityKind) -> FamilyLayout {
    FamilyLayout::SingleFile {
        file,
        primary,
        extras: &[],
        fluff: None,
    }
}

/// Every family of the official content tree.
pub const OFFICIAL_FAMILIES: &[FamilyLayout] = &[
    // Directory families
    FamilyLayout::Directory {
        dir: "bestiary",
        kinds: &[EntityKind::Monster],
    },
    FamilyLayout::Directory {
        dir: "spells",
        kinds: &[EntityKind::Spell],
    },
    FamilyLayout::Directory {
        dir: "class",
        kinds: &[EntityKind::Class, EntityKind::Subclass],
    },
    // Single-file families
    FamilyLayout::SingleFile {
        file: "items.json",
        primary: EntityKind::Item,
        extras: &[("itemGroup", EntityKind::Item)],
        fluff: Some("fluff-items.json"),
    },
    FamilyLayout::SingleFile {
        file: "items-base.json",
        primary: EntityKind::Item,
        extras: &[("baseitem", EntityKind::Item)],
        fluff: None,
    },
    FamilyLayout::SingleFile {
        file: "feats.json",
        primary: EntityKind::Feat,
        extras: &[],
        fluff: Some("fluff-feats.json"),
    },
    FamilyLayout::SingleFile {
        file: "backgrounds.json",
        primary: EntityKind::Background,
        extras: &[],
        fluff: Some("fluff-backgrounds.json"),
    },
    FamilyLayout::SingleFile {
        file: "races.json",
        primary: EntityKind::Race,
        extras: &[],
        fluff: Some("fluff-races.json"),
    },
    FamilyLayout::SingleFile {
        file: "conditionsdiseases.json",
        primary: EntityKind::Condition,
        extras: &[("disease", EntityKind::Disease), ("status", EntityKind::Condition)],
        fluff: Some("fluff-conditionsdiseases.json"),
    },
    single("variantrules.json", EntityKind::Rule),
    single("optionalfeatures.json", EntityKind::OptionalFeature),
    single("deities.json", EntityKind::Deity),
    single("languages.json", EntityKind::Language),
    FamilyLayout::SingleFile {
        file: "objects.json",
        primary: EntityKind::Object,
        extras: &[],
        fluff: Some("fluff-objects.json"),
    },
    FamilyLayout::SingleFile {
        file: "trapshazards.json",
        primary: EntityKind::Trap,
        extras: &[("hazard", EntityKind::Hazard)],
        fluff: None,
    },
    FamilyLayout::SingleFile {
        file: "vehicles.json",
        primary: EntityKind::Vehicle,
        extras: &[],
        fluff: Some("fluff-vehicles.json"),
    },
    single("rewards.json", EntityKind::Reward),
    single("psionics.json", EntityKind::Psionic),
    single("actions.json", EntityKind::Action),
    single("tables.json", EntityKind::Table),
    // Indexed families
    FamilyLayout::Indexed {
        index_file: "books.json",
        kind: EntityKind::Book,
        body_dir: "book",
        body_prefix: "book-",
    },
    FamilyLayout::Indexed {
        index_file: "adventures.json",
        kind: EntityKind::Adventure,
        body_dir: "adventure",
        body_prefix: "adventure-",
    },
];

/// Files in a directory family that are not content arrays.
pub fn is_skipped_directory_file(name: &str) -> bool {
    !name.ends_with(".json") || name == "index.json" || name.starts_with("foundry")
}

/// Flavor-text files inside directory families.
pub fn is_fluff_file(name: &str) -> bool {
    name.starts_with("fluff-") && name.ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_has_a_family() {
        let mut covered = HashSet::new();
        for family in OFFICIAL_FAMILIES {
            match family {
                FamilyLayout::Directory { kinds, .. } => covered.extend(kinds.iter().copied()),
                FamilyLayout::SingleFile { primary, extras, .. } => {
                    covered.insert(*primary);
                    covered.extend(extras.iter().map(|(_, k)| *k));
                }
                FamilyLayout::Indexed { kind, .. } => {
                    covered.insert(*kind);
                }
            }
        }
        for kind in EntityKind::ALL {
            assert!(covered.contains(&kind), "{kind} has no ingestion family");
        }
    }

    #[test]
    fn test_directory_file_filters() {
        assert!(is_skipped_directory_file("index.json"));
        assert!(is_skipped_directory_file("foundry-mm.json"));
        assert!(is_skipped_directory_file("README.md"));
        assert!(!is_skipped_directory_file("bestiary-mm.json"));

        assert!(is_fluff_file("fluff-bestiary-mm.json"));
        assert!(!is_fluff_file("bestiary-mm.json"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(OFFICIAL_FAMILIES[0].label(), "bestiary");
        assert!(OFFICIAL_FAMILIES.iter().any(|f| f.label() == "books.json"));
    }
}

//! Facet extraction: kind-specific filter attributes.
//!
//! [`Facets::extract`] is a total, pure mapping from (kind, raw record) to a
//! small attribute set. It runs over untrusted bulk data, so every lookup is
//! optional: a missing or oddly shaped source field yields an absent facet,
//! never a panic.

use serde::Serialize;
use serde_json::{Map, Value};

use super::kinds::EntityKind;

// ============================================================================
// Per-kind facet structs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonsterFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creature_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub size: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpellFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    pub ritual: bool,
    pub concentration: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    pub attunement: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub has_prerequisite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaceFacets {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub size: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_die: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubclassFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeityFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pantheon: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alignment: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PsionicFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psionic_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// Facets shared by books and adventures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublicationFacets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_end: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableFacets {
    pub columns: usize,
    pub rows: usize,
}

// ============================================================================
// Facets
// ============================================================================

/// Kind-specific attribute bag attached to every summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Facets {
    Monster(MonsterFacets),
    Spell(SpellFacets),
    Item(ItemFacets),
    Feat(FeatFacets),
    Race(RaceFacets),
    Class(ClassFacets),
    Subclass(SubclassFacets),
    Deity(DeityFacets),
    Psionic(PsionicFacets),
    Publication(PublicationFacets),
    Table(TableFacets),
    Rule {
        #[serde(skip_serializing_if = "Option::is_none")]
        rule_type: Option<String>,
    },
    Vehicle {
        #[serde(skip_serializing_if = "Option::is_none")]
        vehicle_type: Option<String>,
    },
    /// Traps and hazards.
    Trap {
        #[serde(skip_serializing_if = "Option::is_none")]
        trap_type: Option<String>,
    },
    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        object_type: Option<String>,
    },
    Reward {
        #[serde(skip_serializing_if = "Option::is_none")]
        reward_type: Option<String>,
    },
    Language {
        #[serde(skip_serializing_if = "Option::is_none")]
        language_type: Option<String>,
    },
    OptionalFeature {
        #[serde(skip_serializing_if = "Vec::is_empty")]
        feature_types: Vec<String>,
    },
    #[default]
    None,
}

impl Facets {
    /// Extract the facet set for a record of the given kind.
    pub fn extract(kind: EntityKind, record: &Map<String, Value>) -> Self {
        match kind {
            EntityKind::Monster => Self::Monster(MonsterFacets {
                cr: challenge_rating(record.get("cr")),
                creature_type: creature_type(record.get("type")),
                size: string_list(record.get("size")),
            }),
            EntityKind::Spell => Self::Spell(spell_facets(record)),
            EntityKind::Item => Self::Item(ItemFacets {
                rarity: str_field(record, "rarity"),
                item_type: str_field(record, "type")
                    .map(|t| t.split('|').next().unwrap_or_default().to_string()),
                attunement: match record.get("reqAttune") {
                    Some(Value::Bool(b)) => *b,
                    Some(Value::String(s)) => !s.trim().is_empty(),
                    _ => false,
                },
            }),
            EntityKind::Feat => Self::Feat(FeatFacets {
                category: str_field(record, "category"),
                has_prerequisite: record
                    .get("prerequisite")
                    .is_some_and(|p| !p.is_null()),
            }),
            EntityKind::Race => Self::Race(RaceFacets {
                size: string_list(record.get("size")),
                speed: match record.get("speed") {
                    Some(Value::Number(n)) => n.as_u64(),
                    Some(Value::Object(o)) => o.get("walk").and_then(Value::as_u64),
                    _ => None,
                },
            }),
            EntityKind::Class => Self::Class(ClassFacets {
                hit_die: record
                    .get("hd")
                    .and_then(|hd| hd.get("faces"))
                    .and_then(Value::as_u64),
            }),
            EntityKind::Subclass => Self::Subclass(SubclassFacets {
                class_name: str_field(record, "className"),
                class_source: str_field(record, "classSource"),
            }),
            EntityKind::Deity => Self::Deity(DeityFacets {
                pantheon: str_field(record, "pantheon"),
                alignment: string_list(record.get("alignment")),
            }),
            EntityKind::Psionic => Self::Psionic(PsionicFacets {
                psionic_type: str_field(record, "type"),
                order: str_field(record, "order"),
            }),
            EntityKind::Adventure | EntityKind::Book => Self::Publication(PublicationFacets {
                group: str_field(record, "group"),
                published: str_field(record, "published"),
                level_start: record
                    .get("level")
                    .and_then(|l| l.get("start"))
                    .and_then(Value::as_u64),
                level_end: record
                    .get("level")
                    .and_then(|l| l.get("end"))
                    .and_then(Value::as_u64),
            }),
            EntityKind::Table => Self::Table(TableFacets {
                columns: array_len(record.get("colLabels")),
                rows: array_len(record.get("rows")),
            }),
            EntityKind::OptionalFeature => Self::OptionalFeature {
                feature_types: string_list(record.get("featureType")),
            },
            EntityKind::Rule => Self::Rule {
                rule_type: str_field(record, "ruleType"),
            },
            EntityKind::Vehicle => Self::Vehicle {
                vehicle_type: str_field(record, "vehicleType"),
            },
            EntityKind::Trap | EntityKind::Hazard => Self::Trap {
                trap_type: str_field(record, "trapHazType"),
            },
            EntityKind::Object => Self::Object {
                object_type: str_field(record, "objectType"),
            },
            EntityKind::Reward => Self::Reward {
                reward_type: str_field(record, "type"),
            },
            EntityKind::Language => Self::Language {
                language_type: str_field(record, "type"),
            },
            EntityKind::Background
            | EntityKind::Condition
            | EntityKind::Disease
            | EntityKind::Action => Self::None,
        }
    }

    /// Facets flattened into a JSON object (absent facets are omitted).
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Whether the named facet equals `expected` (case-insensitive).
    ///
    /// List facets match when any element matches; numeric and boolean facets
    /// compare against their textual form.
    pub fn matches(&self, key: &str, expected: &str) -> bool {
        let expected = expected.trim();
        let matches_scalar = |v: &Value| match v {
            Value::String(s) => s.eq_ignore_ascii_case(expected),
            Value::Number(n) => n.to_string() == expected,
            Value::Bool(b) => b.to_string().eq_ignore_ascii_case(expected),
            _ => false,
        };

        match self.to_map().get(key) {
            Some(Value::Array(items)) => items.iter().any(matches_scalar),
            Some(value) => matches_scalar(value),
            None => false,
        }
    }
}

// ============================================================================
// Extraction helpers
// ============================================================================

fn spell_facets(record: &Map<String, Value>) -> SpellFacets {
    let level = record
        .get("level")
        .and_then(Value::as_u64)
        .filter(|l| *l <= 9)
        .map(|l| l as u8);

    let concentration = record
        .get("duration")
        .and_then(Value::as_array)
        .is_some_and(|durations| {
            durations
                .iter()
                .any(|d| d.get("concentration").and_then(Value::as_bool) == Some(true))
        });

    let ritual = record
        .get("meta")
        .and_then(|m| m.get("ritual"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let classes = record
        .get("classes")
        .and_then(|c| c.get("fromClassList"))
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|c| c.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    SpellFacets {
        level,
        school: str_field(record, "school").map(|s| school_name(&s)),
        ritual,
        concentration,
        classes,
    }
}

/// Expand a single-letter school code; anything else passes through.
fn school_name(code: &str) -> String {
    let name = match code.to_ascii_uppercase().as_str() {
        "A" => "abjuration",
        "C" => "conjuration",
        "D" => "divination",
        "E" => "enchantment",
        "V" => "evocation",
        "I" => "illusion",
        "N" => "necromancy",
        "T" => "transmutation",
        "P" => "psionic",
        _ => return code.to_lowercase(),
    };
    name.to_string()
}

/// `"1/4"`, `17`, or `{"cr": "1/2", "lair": "1"}`.
fn challenge_rating(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(o) => challenge_rating(o.get("cr")),
        _ => None,
    }
}

/// `"humanoid"`, `{"type": "humanoid", "tags": [...]}`, or
/// `{"type": {"choose": ["beast", "plant"]}}`.
fn creature_type(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_lowercase()),
        Value::Object(o) => match o.get("type") {
            Some(Value::Object(inner)) => {
                let choices = string_list(inner.get("choose"));
                (!choices.is_empty()).then(|| choices.join("/").to_lowercase())
            }
            other => creature_type(other),
        },
        _ => None,
    }
}

fn str_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A single string or an array of strings; non-string items are dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn array_len(value: Option<&Value>) -> usize {
    value.and_then(Value::as_array).map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[rstest]
    #[case(json!({"cr": "1/4"}), Some("1/4"))]
    #[case(json!({"cr": 17}), Some("17"))]
    #[case(json!({"cr": {"cr": "1/2", "lair": "1"}}), Some("1/2"))]
    #[case(json!({"cr": null}), None)]
    #[case(json!({}), None)]
    fn test_monster_cr(#[case] raw: Value, #[case] expected: Option<&str>) {
        let Facets::Monster(facets) = Facets::extract(EntityKind::Monster, &record(raw)) else {
            panic!("expected monster facets");
        };
        assert_eq!(facets.cr.as_deref(), expected);
    }

    #[rstest]
    #[case(json!({"type": "Humanoid"}), Some("humanoid"))]
    #[case(json!({"type": {"type": "fiend", "tags": ["devil"]}}), Some("fiend"))]
    #[case(json!({"type": {"type": {"choose": ["beast", "plant"]}}}), Some("beast/plant"))]
    #[case(json!({"type": 42}), None)]
    fn test_monster_type(#[case] raw: Value, #[case] expected: Option<&str>) {
        let Facets::Monster(facets) = Facets::extract(EntityKind::Monster, &record(raw)) else {
            panic!("expected monster facets");
        };
        assert_eq!(facets.creature_type.as_deref(), expected);
    }

    #[test]
    fn test_spell_facets() {
        let raw = record(json!({
            "name": "Shield",
            "level": 1,
            "school": "A",
            "duration": [{"type": "timed", "concentration": false}],
            "meta": {"ritual": false},
            "classes": {"fromClassList": [{"name": "Wizard", "source": "PHB"}, {"name": "Sorcerer"}]}
        }));
        let Facets::Spell(facets) = Facets::extract(EntityKind::Spell, &raw) else {
            panic!("expected spell facets");
        };
        assert_eq!(facets.level, Some(1));
        assert_eq!(facets.school.as_deref(), Some("abjuration"));
        assert!(!facets.ritual);
        assert!(!facets.concentration);
        assert_eq!(facets.classes, vec!["Wizard", "Sorcerer"]);
    }

    #[test]
    fn test_spell_concentration_and_bad_level() {
        let raw = record(json!({
            "level": 42,
            "duration": [{"concentration": true}],
            "meta": {"ritual": true}
        }));
        let Facets::Spell(facets) = Facets::extract(EntityKind::Spell, &raw) else {
            panic!("expected spell facets");
        };
        assert_eq!(facets.level, None);
        assert!(facets.concentration);
        assert!(facets.ritual);
    }

    #[test]
    fn test_item_facets() {
        let raw = record(json!({"rarity": "rare", "type": "M|XPHB", "reqAttune": "by a wizard"}));
        let Facets::Item(facets) = Facets::extract(EntityKind::Item, &raw) else {
            panic!("expected item facets");
        };
        assert_eq!(facets.rarity.as_deref(), Some("rare"));
        assert_eq!(facets.item_type.as_deref(), Some("M"));
        assert!(facets.attunement);
    }

    #[test]
    fn test_race_speed_shapes() {
        let flat = record(json!({"speed": 30, "size": ["M"]}));
        let nested = record(json!({"speed": {"walk": 25, "fly": 50}}));
        assert!(Facets::extract(EntityKind::Race, &flat).matches("speed", "30"));
        assert!(Facets::extract(EntityKind::Race, &nested).matches("speed", "25"));
    }

    #[test]
    fn test_publication_levels() {
        let raw = record(json!({"group": "supplement", "level": {"start": 1, "end": 5}}));
        let facets = Facets::extract(EntityKind::Adventure, &raw);
        let map = facets.to_map();
        assert_eq!(map["level_start"], 1);
        assert_eq!(map["level_end"], 5);
        assert_eq!(map["group"], "supplement");
    }

    #[rstest]
    #[case(EntityKind::Rule, json!({"ruleType": "O"}), "rule_type", "O")]
    #[case(EntityKind::Vehicle, json!({"vehicleType": "SHIP"}), "vehicle_type", "SHIP")]
    #[case(EntityKind::Trap, json!({"trapHazType": "MECH"}), "trap_type", "MECH")]
    #[case(EntityKind::Hazard, json!({"trapHazType": "WTH"}), "trap_type", "WTH")]
    #[case(EntityKind::Object, json!({"objectType": "SW"}), "object_type", "SW")]
    #[case(EntityKind::Reward, json!({"type": "Blessing"}), "reward_type", "Blessing")]
    #[case(EntityKind::Language, json!({"type": "standard"}), "language_type", "standard")]
    fn test_type_facet_names(
        #[case] kind: EntityKind,
        #[case] raw: Value,
        #[case] key: &str,
        #[case] expected: &str,
    ) {
        let facets = Facets::extract(kind, &record(raw));
        assert!(facets.matches(key, expected), "{kind:?} should expose {key}");
        assert!(!facets.matches("category", expected));
        assert_eq!(facets.to_map().len(), 1);
    }

    #[test]
    fn test_type_facet_absent() {
        assert_eq!(
            Facets::extract(EntityKind::Rule, &Map::new()),
            Facets::Rule { rule_type: None }
        );
        assert!(Facets::extract(EntityKind::Trap, &Map::new()).to_map().is_empty());
    }

    #[test]
    fn test_kinds_without_facets() {
        let raw = record(json!({"name": "Blinded"}));
        assert_eq!(Facets::extract(EntityKind::Condition, &raw), Facets::None);
        assert!(Facets::None.to_map().is_empty());
    }

    #[test]
    fn test_matches_list_facet() {
        let raw = record(json!({"featureType": ["EI", "MV:B"]}));
        let facets = Facets::extract(EntityKind::OptionalFeature, &raw);
        assert!(facets.matches("feature_types", "ei"));
        assert!(!facets.matches("feature_types", "FS:F"));
        assert!(!facets.matches("missing", "x"));
    }

    #[test]
    fn test_extraction_never_panics_on_hostile_shapes() {
        let hostile = record(json!({
            "cr": [1, 2],
            "type": {"type": {"choose": 7}},
            "size": {"oops": true},
            "level": "nine",
            "duration": "forever",
            "classes": "all",
            "hd": 12,
            "speed": "fast",
            "alignment": 3,
            "colLabels": "x",
            "rows": {"a": 1}
        }));
        for kind in EntityKind::ALL {
            let _ = Facets::extract(kind, &hostile);
        }
    }
}

//! Property-based tests for relevance scoring and resolution
//!
//! Tests invariants:
//! - Scores are finite and non-negative
//! - Exact name matches outrank any other candidate
//! - Partial scores stay below the prefix score
//! - Unrelated input never resolves
//! - Resolution is case-insensitive
//! - Homebrew wins exact ties regardless of ruleset preference

use proptest::prelude::*;

use crate::core::catalog::scoring::{EXACT_NAME_SCORE, PREFIX_SCORE};
use crate::core::catalog::{score, slugify, EntityKind, ResolveQuery, Ruleset};
use crate::tests::common::{sample_catalog, sample_catalog_with_homebrew, summary};

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}( [A-Za-z]{1,8}){0,2}"
}

fn arb_query() -> impl Strategy<Value = String> {
    "[a-z]{1,12}( [a-z]{1,8}){0,2}"
}

proptest! {
    /// Property: scores are finite and never negative
    #[test]
    fn prop_score_non_negative(
        query in "\\PC{0,50}",
        name in arb_name(),
        homebrew in any::<bool>()
    ) {
        let candidate = summary(EntityKind::Monster, "MM", &name, &[], homebrew);
        let s = score(&query, &candidate);
        prop_assert!(s.is_finite());
        prop_assert!(s >= 0.0);
    }

    /// Property: an exact name match outranks any other candidate
    #[test]
    fn prop_exact_beats_everything(
        name in arb_name(),
        other in arb_name(),
        other_homebrew in any::<bool>()
    ) {
        prop_assume!(other.to_lowercase() != name.to_lowercase());

        let exact = summary(EntityKind::Spell, "PHB", &name, &[], false);
        let rival = summary(EntityKind::Spell, "HB", &other, &[&name], other_homebrew);

        let query = name.to_uppercase();
        prop_assert!(score(&query, &exact) >= EXACT_NAME_SCORE);
        prop_assert!(score(&query, &exact) > score(&query, &rival) || rival.slug == exact.slug);
    }

    /// Property: accumulated partial scores never reach a prefix match
    #[test]
    fn prop_partial_below_prefix(
        query in arb_query(),
        name in arb_name(),
        aliases in proptest::collection::vec(arb_name(), 0..4),
        homebrew in any::<bool>()
    ) {
        let lowered = name.to_lowercase();
        prop_assume!(!lowered.starts_with(&query));
        prop_assume!(slugify(&query) != slugify(&name));

        let alias_refs: Vec<&str> = aliases.iter().map(String::as_str).collect();
        let candidate = summary(EntityKind::Item, "DMG", &name, &alias_refs, homebrew);

        prop_assert!(score(&query, &candidate) < PREFIX_SCORE);
    }

    /// Property: digit-only input shares nothing with the sample names
    #[test]
    fn prop_garbage_never_resolves(garbage in "[0-9]{12,24}") {
        let catalog = sample_catalog();
        for kind in [EntityKind::Monster, EntityKind::Spell] {
            prop_assert!(catalog.resolve(&ResolveQuery::new(kind, garbage.clone())).is_none());
        }
    }

    /// Property: resolution ignores the case of the query
    #[test]
    fn prop_resolve_case_insensitive(index in 0usize..6, upper in any::<bool>()) {
        let catalog = sample_catalog();
        let names = ["Goblin", "Dragon Turtle", "Owlbear", "Kobold", "Shield", "Fireball"];
        let name = names[index];
        let kind = if index < 4 { EntityKind::Monster } else { EntityKind::Spell };

        let cased = if upper { name.to_uppercase() } else { name.to_lowercase() };
        let a = catalog.resolve(&ResolveQuery::new(kind, name)).map(|s| s.uri.clone());
        let b = catalog.resolve(&ResolveQuery::new(kind, cased)).map(|s| s.uri.clone());

        prop_assert!(a.is_some());
        prop_assert_eq!(a, b);
    }
}

proptest! {
    /// Property: homebrew wins an exact tie whatever ruleset is preferred
    #[test]
    fn prop_homebrew_wins_any_ruleset(newer in any::<bool>(), upper in any::<bool>()) {
        let catalog = sample_catalog_with_homebrew();
        let ruleset = if newer { Ruleset::Edition2024 } else { Ruleset::Edition2014 };
        let name = if upper { "SHIELD" } else { "shield" };

        let hit = catalog.resolve(&ResolveQuery::new(EntityKind::Spell, name).with_ruleset(ruleset));
        prop_assert!(hit.is_some_and(|s| s.is_homebrew() && s.source == "HB"));
    }
}

//! Property-based tests for slugs and ruleset derivation
//!
//! Tests invariants:
//! - Slug output alphabet is lowercase alphanumerics and `-`
//! - No leading, trailing or doubled dashes
//! - `slugify` is idempotent
//! - `Ruleset::for_source` is a case-insensitive pure function

use proptest::prelude::*;

use crate::core::catalog::{slugify, EntityKind, EntityUri, Ruleset};

/// Display names with mixed case, digits and punctuation.
fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 '!,.()/-]{0,40}"
}

fn arb_source() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,11}"
}

proptest! {
    /// Property: slugs use a restricted alphabet with single separators
    #[test]
    fn prop_slug_alphabet(name in arb_name()) {
        let slug = slugify(&name);

        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"), "doubled dash in {}", slug);
    }

    /// Property: slugging a slug changes nothing
    #[test]
    fn prop_slug_idempotent(name in arb_name()) {
        let once = slugify(&name);
        prop_assert_eq!(slugify(&once), once);
    }

    /// Property: names differing only in case and punctuation share a URI
    #[test]
    fn prop_uri_ignores_case(name in arb_name(), source in arb_source()) {
        let lower = EntityUri::new(EntityKind::Spell, &source, &slugify(&name.to_lowercase()));
        let upper = EntityUri::new(EntityKind::Spell, &source, &slugify(&name.to_uppercase()));
        prop_assert_eq!(lower, upper);
    }

    /// Property: ruleset derivation ignores case
    #[test]
    fn prop_ruleset_case_insensitive(source in arb_source()) {
        prop_assert_eq!(
            Ruleset::for_source(&source.to_lowercase()),
            Ruleset::for_source(&source.to_uppercase())
        );
    }

    /// Property: only the 2024 core prefixes mark the newer edition
    #[test]
    fn prop_ruleset_prefix(suffix in "[A-Z0-9]{0,6}") {
        for prefix in ["XPHB", "XDMG", "XMM"] {
            let source = format!("{prefix}{suffix}");
            prop_assert_eq!(Ruleset::for_source(&source), Ruleset::Edition2024);
        }
        let older = format!("PHB{suffix}");
        prop_assert_eq!(Ruleset::for_source(&older), Ruleset::Edition2014);
    }
}

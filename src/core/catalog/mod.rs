//! In-memory TTRPG content catalog and resolution engine.
//!
//! The catalog ingests heterogeneous content files (creatures, spells, items,
//! rules text, books, ...) spanning two rules editions plus user-supplied
//! homebrew, and answers lookups over them for the lifetime of the process.
//!
//! # Overview
//!
//! This module provides:
//!
//! - **Data Model**: [`CatalogSummary`], [`StoredEntity`], [`EntityKind`], [`EntityUri`]
//! - **Source Registry**: per-abbreviation metadata with derived [`Ruleset`]
//! - **Catalog Builder**: record normalization for the three ingestion shapes
//! - **Facet Extractor**: kind-specific filter attributes ([`Facets`])
//! - **Resolution Engine**: exact, tie-broken and fuzzy lookup plus search
//! - **Homebrew Overlay**: a second pass tagging content for priority
//!
//! # Architecture
//!
//! ```text
//!   ContentProvider (files)
//!          |
//!          v  parallel reads, bounded
//!   +----------------+      +-----------------+
//!   | CatalogLoader  | ---> | CatalogBuilder  |  serial merge
//!   +----------------+      +-----------------+
//!                                   |
//!                                   v
//!                          +-----------------+
//!                          |     Catalog     |  immutable, shared via Arc
//!                          +-----------------+
//!                                   |
//!                 get_by_uri / resolve / search / list_sources
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ttrpg_catalog::core::catalog::{
//!     CatalogLoader, EntityKind, FsContentProvider, ResolveQuery,
//! };
//!
//! let loader = CatalogLoader::new(Arc::new(FsContentProvider::new("data")));
//! let catalog = Arc::new(loader.load(None).await);
//!
//! let goblin = catalog.resolve(&ResolveQuery::new(EntityKind::Monster, "goblin"));
//! ```
//!
//! # URI Format
//!
//! | Content | URI |
//! |---------|-----|
//! | Entities | `catalog://entity/{kind}/{source}/{slug}` |
//! | Roll tables | `catalog://table/{source}/{slug}` |

// ============================================================================
// Module Declarations
// ============================================================================

pub mod builder;
pub mod error;
pub mod facets;
pub mod families;
pub mod flavor;
pub mod homebrew;
pub mod kinds;
pub mod loader;
pub mod memory_catalog;
pub mod provider;
pub mod resolution;
pub mod scoring;
pub mod source_registry;
pub mod types;

// ============================================================================
// Re-exports: Error Types
// ============================================================================

pub use error::{CatalogError, Result};

// ============================================================================
// Re-exports: Core Types
// ============================================================================

pub use facets::Facets;
pub use kinds::EntityKind;
pub use source_registry::{SourceEntry, SourceRegistry};
pub use types::{slugify, CatalogSummary, EntityUri, Ruleset, StoredEntity, UNKNOWN_SOURCE};

// ============================================================================
// Re-exports: Building and Loading
// ============================================================================

pub use builder::{
    CatalogBuilder,
    FileContext,
    IndexedBody,
    IngestReport,

    // Table normalization seam
    PassthroughTableNormalizer,
    TableNormalizer,
};
pub use loader::{CatalogLoader, DEFAULT_READ_CONCURRENCY};
pub use provider::{ContentProvider, FsContentProvider, MemoryContentProvider};

// ============================================================================
// Re-exports: Catalog and Resolution
// ============================================================================

pub use flavor::FlavorTable;
pub use memory_catalog::{Catalog, CatalogStats};
pub use resolution::{ResolveQuery, SearchHit, SearchQuery, DEFAULT_SEARCH_LIMIT};
pub use scoring::{score, MIN_FUZZY_SCORE};

//! Homebrew overlay merge.
//!
//! Overlay documents use the same top-level keys as official content, all in
//! one object. Every entity produced here is stamped `homebrew = true`, which
//! is the only thing resolution consults to prioritize it.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::builder::{CatalogBuilder, IngestReport};
use super::error::{CatalogError, Result};
use super::kinds::EntityKind;

/// Overlay keys folded into a kind other than the one they name.
const OVERLAY_EXTRA_KEYS: &[(&str, EntityKind)] = &[
    ("baseitem", EntityKind::Item),
    ("itemGroup", EntityKind::Item),
    ("status", EntityKind::Condition),
];

fn overlay_kind(key: &str) -> Option<EntityKind> {
    EntityKind::from_storage_key(key).or_else(|| {
        OVERLAY_EXTRA_KEYS
            .iter()
            .find(|(extra, _)| *extra == key)
            .map(|(_, kind)| *kind)
    })
}

impl CatalogBuilder {
    /// Merge one overlay document into the catalog.
    ///
    /// Entities whose URI matches an existing entity replace it.
    pub fn ingest_homebrew(&mut self, path: &Path, doc: &Value) -> Result<IngestReport> {
        let document = doc.as_object().ok_or_else(|| CatalogError::UnexpectedShape {
            path: path.to_path_buf(),
            expected: "a JSON object",
        })?;
        let ctx = self.file_context(path, document, true);

        let mut report = IngestReport::default();
        for (key, value) in document {
            if key == "_meta" {
                continue;
            }
            if let Some(kind) = overlay_kind(key) {
                report += self.ingest_records(kind, value, &ctx);
            } else if let Some(kind) = EntityKind::from_fluff_key(key) {
                self.ingest_flavor_records(kind, value, &ctx);
            } else {
                debug!(path = %path.display(), key = %key, "Ignoring unknown overlay key");
            }
        }

        Ok(report)
    }
}

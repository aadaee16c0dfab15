//! Catalog Builder: normalizes parsed content documents into catalog entries.
//!
//! The builder works on already-parsed JSON documents and owns the catalog
//! while it is being assembled. All mutation of shared structures (summary
//! lists, the URI-keyed entity table, the source registry) happens here, on
//! one thread, after the loader's parallel reads have completed.
//!
//! # Record normalization
//!
//! For every raw record:
//!
//! 1. A missing or blank `name` skips the record (debug-logged, never fatal)
//! 2. `source` falls back to the file's first `_meta` source, then
//!    [`UNKNOWN_SOURCE`]
//! 3. The URI is computed from (kind, source, slug) and the pair
//!    summary/stored entity is inserted; an existing URI is overwritten
//! 4. The source registry records the source and the contributed kind

use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::error::{CatalogError, Result};
use super::facets::Facets;
use super::kinds::EntityKind;
use super::memory_catalog::Catalog;
use super::types::{slugify, CatalogSummary, EntityUri, Ruleset, StoredEntity, UNKNOWN_SOURCE};

// ============================================================================
// Table normalization seam
// ============================================================================

/// Turns one raw roll-table description into its stored, rollable form.
///
/// The builder stores the output under the table URI scheme without
/// interpreting it. Returning `None` skips the record.
pub trait TableNormalizer: Send + Sync {
    fn normalize(&self, raw: &Map<String, Value>) -> Option<Map<String, Value>>;
}

/// Keeps the table exactly as given, requiring only a `rows` array.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTableNormalizer;

impl TableNormalizer for PassthroughTableNormalizer {
    fn normalize(&self, raw: &Map<String, Value>) -> Option<Map<String, Value>> {
        raw.get("rows").and_then(Value::as_array)?;
        Some(raw.clone())
    }
}

// ============================================================================
// Ingestion context and report
// ============================================================================

/// Per-file context applied to every record in the file.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    /// Path of the file, for log lines.
    pub path: PathBuf,
    /// First source declared in the file's `_meta`, if any.
    pub default_source: Option<String>,
    /// Whether records from this file are overlay content.
    pub homebrew: bool,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>, homebrew: bool) -> Self {
        Self {
            path: path.into(),
            default_source: None,
            homebrew,
        }
    }

    /// Explicit record source, else the file default, else the sentinel.
    fn source_for(&self, record: &Map<String, Value>) -> String {
        non_blank(record.get("source"))
            .or(self.default_source.as_deref())
            .unwrap_or(UNKNOWN_SOURCE)
            .to_string()
    }
}

/// Outcome counts for one ingestion step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl AddAssign for IngestReport {
    fn add_assign(&mut self, rhs: Self) {
        self.inserted += rhs.inserted;
        self.skipped += rhs.skipped;
    }
}

/// Body file to fetch for an entity created from an index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBody {
    pub uri: EntityUri,
    /// Identifier used to name the body file.
    pub id: String,
}

// ============================================================================
// CatalogBuilder
// ============================================================================

/// Assembles a [`Catalog`] from parsed documents.
pub struct CatalogBuilder {
    catalog: Catalog,
    tables: Arc<dyn TableNormalizer>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    /// Start from an empty catalog.
    pub fn new() -> Self {
        Self::from_catalog(Catalog::new())
    }

    /// Continue building on an existing catalog (used by the overlay pass).
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            tables: Arc::new(PassthroughTableNormalizer),
        }
    }

    pub fn with_table_normalizer(mut self, tables: Arc<dyn TableNormalizer>) -> Self {
        self.tables = tables;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn finish(self) -> Catalog {
        self.catalog
    }

    // ========================================================================
    // Document-level entry points
    // ========================================================================

    /// Build the context for a document, registering its `_meta` sources.
    pub fn file_context(&mut self, path: &Path, doc: &Map<String, Value>, homebrew: bool) -> FileContext {
        let mut ctx = FileContext::new(path, homebrew);

        let declared = doc
            .get("_meta")
            .and_then(|m| m.get("sources"))
            .and_then(Value::as_array);

        for entry in declared.into_iter().flatten() {
            let Some(abbreviation) = non_blank(entry.get("json")) else {
                continue;
            };
            self.catalog
                .sources_mut()
                .register(abbreviation, non_blank(entry.get("full")), None);
            if ctx.default_source.is_none() {
                ctx.default_source = Some(abbreviation.to_string());
            }
        }

        ctx
    }

    /// One file of a directory family: every listed kind's array is ingested.
    pub fn ingest_directory_file(
        &mut self,
        path: &Path,
        doc: &Value,
        kinds: &[EntityKind],
    ) -> Result<IngestReport> {
        let doc = as_document(path, doc)?;
        let ctx = self.file_context(path, doc, false);

        let mut report = IngestReport::default();
        for kind in kinds {
            if let Some(records) = doc.get(kind.storage_key()) {
                report += self.ingest_records(*kind, records, &ctx);
            }
        }
        Ok(report)
    }

    /// A single-file family: the primary kind's array plus any extra arrays.
    pub fn ingest_single_file(
        &mut self,
        path: &Path,
        doc: &Value,
        primary: EntityKind,
        extras: &[(&str, EntityKind)],
    ) -> Result<IngestReport> {
        let doc = as_document(path, doc)?;
        let ctx = self.file_context(path, doc, false);

        let mut report = IngestReport::default();
        if let Some(records) = doc.get(primary.storage_key()) {
            report += self.ingest_records(primary, records, &ctx);
        }
        for (key, kind) in extras {
            if let Some(records) = doc.get(*key) {
                report += self.ingest_records(*kind, records, &ctx);
            }
        }
        Ok(report)
    }

    /// The root index of an indexed family.
    ///
    /// Each entry becomes a metadata-only entity whose source is `source`,
    /// else `id`. The entry's name is registered as the source display name.
    /// Returns the bodies the loader should fetch and merge afterwards.
    pub fn ingest_index(
        &mut self,
        path: &Path,
        doc: &Value,
        kind: EntityKind,
    ) -> Result<(IngestReport, Vec<IndexedBody>)> {
        let doc = as_document(path, doc)?;
        let ctx = self.file_context(path, doc, false);

        let entries = doc
            .get(kind.storage_key())
            .and_then(Value::as_array)
            .ok_or(CatalogError::UnexpectedShape {
                path: path.to_path_buf(),
                expected: "an index array",
            })?;

        let mut report = IngestReport::default();
        let mut bodies = Vec::new();

        for raw in entries {
            let Some(entry) = raw.as_object() else {
                report.skipped += 1;
                continue;
            };
            let id = non_blank(entry.get("id")).map(str::to_string);

            let mut entry = entry.clone();
            if non_blank(entry.get("source")).is_none() {
                if let Some(id) = &id {
                    entry.insert("source".to_string(), Value::String(id.clone()));
                }
            }

            match self.ingest_record(kind, &entry, &ctx) {
                Ok(uri) => {
                    report.inserted += 1;
                    let source = ctx.source_for(&entry);
                    self.catalog
                        .sources_mut()
                        .register(&source, non_blank(entry.get("name")), None);
                    bodies.push(IndexedBody {
                        uri,
                        id: id.unwrap_or(source),
                    });
                }
                Err(e) => {
                    report.skipped += 1;
                    debug!(path = %path.display(), kind = %kind, error = %e, "Skipping index entry");
                }
            }
        }

        Ok((report, bodies))
    }

    /// Merge a body document into the entity created from its index entry.
    ///
    /// The body's `data` array is attached to the stored record. Returns
    /// `false` when the entity or the body content is missing.
    pub fn merge_body(&mut self, uri: &EntityUri, body: &Value) -> bool {
        let Some(data) = body.get("data") else {
            return false;
        };
        match self.catalog.entity_mut(uri.as_str()) {
            Some(entity) => {
                entity.merge_body("data", data.clone());
                true
            }
            None => false,
        }
    }

    /// Flavor-text document: every `{storageKey}Fluff` array is stored in
    /// the side table. Returns the number of flavor records stored.
    pub fn ingest_flavor_file(&mut self, path: &Path, doc: &Value, homebrew: bool) -> Result<usize> {
        let doc = as_document(path, doc)?;
        let ctx = self.file_context(path, doc, homebrew);

        let mut stored = 0;
        for (key, records) in doc {
            if let Some(kind) = EntityKind::from_fluff_key(key) {
                stored += self.ingest_flavor_records(kind, records, &ctx);
            }
        }
        Ok(stored)
    }

    // ========================================================================
    // Record-level ingestion
    // ========================================================================

    /// Ingest an array of raw records of one kind. Non-array values count as
    /// nothing; malformed records are skipped individually.
    pub fn ingest_records(&mut self, kind: EntityKind, records: &Value, ctx: &FileContext) -> IngestReport {
        let mut report = IngestReport::default();

        let Some(records) = records.as_array() else {
            debug!(path = %ctx.path.display(), kind = %kind, "Ignoring non-array content key");
            return report;
        };

        for raw in records {
            let result = match raw.as_object() {
                Some(record) => self.ingest_record(kind, record, ctx),
                None => Err(CatalogError::InvalidRecord {
                    reason: "record is not an object".to_string(),
                }),
            };

            match result {
                Ok(uri) => {
                    trace!(uri = %uri, "Inserted entity");
                    report.inserted += 1;
                }
                Err(e) => {
                    debug!(path = %ctx.path.display(), kind = %kind, error = %e, "Skipping record");
                    report.skipped += 1;
                }
            }
        }

        report
    }

    pub(crate) fn ingest_flavor_records(&mut self, kind: EntityKind, records: &Value, ctx: &FileContext) -> usize {
        let mut stored = 0;
        for record in records.as_array().into_iter().flatten().filter_map(Value::as_object) {
            let Some(name) = non_blank(record.get("name")) else {
                continue;
            };
            let slug = slugify(name);
            if slug.is_empty() {
                continue;
            }
            let source = ctx.source_for(record);
            self.catalog
                .flavor_mut()
                .insert(kind, &source, &slug, record.clone());
            stored += 1;
        }
        stored
    }

    /// Normalize and insert one record.
    fn ingest_record(&mut self, kind: EntityKind, record: &Map<String, Value>, ctx: &FileContext) -> Result<EntityUri> {
        let (summary, entity) = self.normalize(kind, record, ctx)?;
        let uri = summary.uri.clone();

        self.catalog
            .sources_mut()
            .register(&summary.source, None, Some(kind));
        self.catalog.insert(summary, entity);

        Ok(uri)
    }

    /// Produce the summary/stored-entity pair for a raw record.
    pub fn normalize(
        &self,
        kind: EntityKind,
        record: &Map<String, Value>,
        ctx: &FileContext,
    ) -> Result<(CatalogSummary, StoredEntity)> {
        let name = non_blank(record.get("name")).ok_or(CatalogError::MissingName)?;
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(CatalogError::MissingName);
        }

        let source = ctx.source_for(record);
        let record = match kind {
            EntityKind::Table => self
                .tables
                .normalize(record)
                .ok_or_else(|| CatalogError::InvalidRecord {
                    reason: "table could not be normalized".to_string(),
                })?,
            _ => record.clone(),
        };

        let uri = EntityUri::new(kind, &source, &slug);
        let summary = CatalogSummary {
            uri: uri.clone(),
            name: name.to_string(),
            slug,
            ruleset: Ruleset::for_source(&source),
            kind,
            facets: Facets::extract(kind, &record),
            aliases: aliases(record.get("alias")),
            homebrew: ctx.homebrew.then_some(true),
            source: source.clone(),
        };
        let entity = StoredEntity::new(uri, kind, source, record, ctx.homebrew);

        Ok((summary, entity))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn as_document<'a>(path: &Path, doc: &'a Value) -> Result<&'a Map<String, Value>> {
    doc.as_object().ok_or_else(|| CatalogError::UnexpectedShape {
        path: path.to_path_buf(),
        expected: "a JSON object",
    })
}

/// Trimmed, non-empty string value.
fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `alias` may be a single string or a list; normalize to a list.
fn aliases(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(single @ Value::String(_)) => non_blank(Some(single))
            .map(|s| vec![s.to_string()])
            .unwrap_or_default(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| non_blank(Some(v)))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

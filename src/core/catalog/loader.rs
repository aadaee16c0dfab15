//! Startup ingestion: parallel reads, serial merge.
//!
//! The loader walks [`OFFICIAL_FAMILIES`], fetches and parses every input
//! file through the [`ContentProvider`] with at most `concurrency` reads in
//! flight, then hands the parsed documents to a single [`CatalogBuilder`]
//! in a fixed order. Merge order depends only on the plan and the sorted
//! directory listings, never on which read finished first, so last-write-wins
//! is deterministic.
//!
//! A failed read or parse is isolated to its file: it is logged and skipped.
//! An absent family contributes nothing.
//!
//! # Usage
//!
//! ```rust,ignore
//! let provider = Arc::new(FsContentProvider::new(config.catalog.data_dir()));
//! let loader = CatalogLoader::new(provider).with_concurrency(config.catalog.read_concurrency);
//! let catalog = Arc::new(loader.load(config.catalog.homebrew_path.as_deref()).await);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::builder::{CatalogBuilder, IngestReport, PassthroughTableNormalizer, TableNormalizer};
use super::error::{CatalogError, Result};
use super::families::{is_fluff_file, is_skipped_directory_file, FamilyLayout, OFFICIAL_FAMILIES};
use super::kinds::EntityKind;
use super::memory_catalog::Catalog;
use super::provider::ContentProvider;
use super::types::EntityUri;

/// Default bound on concurrent file reads.
pub const DEFAULT_READ_CONCURRENCY: usize = 16;

/// One file to read and what to do with it once parsed.
#[derive(Debug, Clone)]
enum ReadJob {
    DirectoryFile {
        kinds: &'static [EntityKind],
    },
    SingleFile {
        primary: EntityKind,
        extras: &'static [(&'static str, EntityKind)],
    },
    Flavor,
    Index {
        kind: EntityKind,
        body_dir: &'static str,
        body_prefix: &'static str,
    },
}

// ============================================================================
// CatalogLoader
// ============================================================================

/// Builds catalogs from a content provider.
pub struct CatalogLoader {
    provider: Arc<dyn ContentProvider>,
    concurrency: usize,
    tables: Arc<dyn TableNormalizer>,
}

impl CatalogLoader {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider,
            concurrency: DEFAULT_READ_CONCURRENCY,
            tables: Arc::new(PassthroughTableNormalizer),
        }
    }

    /// Maximum reads in flight; values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_table_normalizer(mut self, tables: Arc<dyn TableNormalizer>) -> Self {
        self.tables = tables;
        self
    }

    /// Official catalog plus the optional overlay.
    pub async fn load(&self, homebrew: Option<&Path>) -> Catalog {
        let catalog = self.load_official().await;
        match homebrew {
            Some(path) => self.load_homebrew(catalog, path).await,
            None => catalog,
        }
    }

    /// Build the official catalog from every known family.
    pub async fn load_official(&self) -> Catalog {
        let started = Instant::now();
        let jobs = self.plan().await;
        debug!(files = jobs.len(), "Planned official ingestion");

        let mut builder = CatalogBuilder::new().with_table_normalizer(Arc::clone(&self.tables));
        let mut report = IngestReport::default();
        let mut bodies: Vec<(PathBuf, EntityUri)> = Vec::new();

        for (path, job, doc) in self.read_all(jobs).await {
            let Some(doc) = usable(&path, doc) else {
                continue;
            };

            let outcome = match job {
                ReadJob::DirectoryFile { kinds } => builder.ingest_directory_file(&path, &doc, kinds),
                ReadJob::SingleFile { primary, extras } => {
                    builder.ingest_single_file(&path, &doc, primary, extras)
                }
                ReadJob::Flavor => builder
                    .ingest_flavor_file(&path, &doc, false)
                    .map(|_| IngestReport::default()),
                ReadJob::Index {
                    kind,
                    body_dir,
                    body_prefix,
                } => builder.ingest_index(&path, &doc, kind).map(|(index_report, found)| {
                    bodies.extend(found.into_iter().map(|body| {
                        let file = format!("{body_prefix}{}.json", body.id.to_lowercase());
                        (Path::new(body_dir).join(file), body.uri)
                    }));
                    index_report
                }),
            };

            match outcome {
                Ok(file_report) => report += file_report,
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping input file"),
            }
        }

        let merged = self.merge_bodies(&mut builder, bodies).await;
        let catalog = builder.finish();
        let stats = catalog.stats();

        info!(
            entities = stats.entities,
            sources = stats.sources,
            flavor = stats.flavor,
            bodies = merged,
            skipped = report.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Official catalog built"
        );

        catalog
    }

    /// Merge an overlay (a single JSON document or a directory of them) into
    /// an existing catalog. A missing or unreadable overlay leaves the
    /// catalog unchanged.
    pub async fn load_homebrew(&self, catalog: Catalog, path: &Path) -> Catalog {
        let files: Vec<PathBuf> = match self.provider.list_dir(path).await {
            Ok(names) => names
                .into_iter()
                .filter(|name| name.ends_with(".json"))
                .map(|name| path.join(name))
                .collect(),
            Err(_) => vec![path.to_path_buf()],
        };

        let mut builder = CatalogBuilder::from_catalog(catalog).with_table_normalizer(Arc::clone(&self.tables));
        let mut report = IngestReport::default();

        let jobs: Vec<(PathBuf, ())> = files.into_iter().map(|file| (file, ())).collect();
        for (file, (), doc) in self.read_all(jobs).await {
            let doc = match doc {
                Ok(doc) => doc,
                Err(e) => {
                    info!(path = %file.display(), error = %e, "Homebrew overlay unavailable, skipping");
                    continue;
                }
            };
            match builder.ingest_homebrew(&file, &doc) {
                Ok(file_report) => report += file_report,
                Err(e) => warn!(path = %file.display(), error = %e, "Skipping homebrew file"),
            }
        }

        info!(
            path = %path.display(),
            inserted = report.inserted,
            skipped = report.skipped,
            "Homebrew overlay merged"
        );

        builder.finish()
    }

    // ========================================================================
    // Planning and reading
    // ========================================================================

    /// Expand the family plan into concrete files, in merge order.
    async fn plan(&self) -> Vec<(PathBuf, ReadJob)> {
        let mut jobs = Vec::new();

        for family in OFFICIAL_FAMILIES {
            match *family {
                FamilyLayout::Directory { dir, kinds } => {
                    let names = match self.provider.list_dir(Path::new(dir)).await {
                        Ok(names) => names,
                        Err(e) => {
                            log_missing(family.label(), &e);
                            continue;
                        }
                    };

                    for name in names {
                        let path = Path::new(dir).join(&name);
                        if is_fluff_file(&name) {
                            jobs.push((path, ReadJob::Flavor));
                        } else if !is_skipped_directory_file(&name) {
                            jobs.push((path, ReadJob::DirectoryFile { kinds }));
                        }
                    }
                }
                FamilyLayout::SingleFile {
                    file,
                    primary,
                    extras,
                    fluff,
                } => {
                    jobs.push((PathBuf::from(file), ReadJob::SingleFile { primary, extras }));
                    if let Some(fluff) = fluff {
                        jobs.push((PathBuf::from(fluff), ReadJob::Flavor));
                    }
                }
                FamilyLayout::Indexed {
                    index_file,
                    kind,
                    body_dir,
                    body_prefix,
                } => jobs.push((
                    PathBuf::from(index_file),
                    ReadJob::Index {
                        kind,
                        body_dir,
                        body_prefix,
                    },
                )),
            }
        }

        jobs
    }

    /// Read and parse every file with bounded concurrency. Results come back
    /// in job order regardless of completion order.
    async fn read_all<T: Send>(&self, jobs: Vec<(PathBuf, T)>) -> Vec<(PathBuf, T, Result<Value>)> {
        let provider = self.provider.as_ref();

        let mut results: Vec<(usize, PathBuf, T, Result<Value>)> = stream::iter(jobs.into_iter().enumerate())
            .map(|(index, (path, job))| async move {
                let doc = provider.read_json(&path).await;
                (index, path, job, doc)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        results.sort_by_key(|(index, ..)| *index);
        results
            .into_iter()
            .map(|(_, path, job, doc)| (path, job, doc))
            .collect()
    }

    /// Second round for indexed families: attach each found body to its
    /// entity. A missing body leaves a metadata-only entity.
    async fn merge_bodies(&self, builder: &mut CatalogBuilder, bodies: Vec<(PathBuf, EntityUri)>) -> usize {
        let mut merged = 0;
        for (path, uri, doc) in self.read_all(bodies).await {
            match doc {
                Ok(doc) => {
                    if builder.merge_body(&uri, &doc) {
                        merged += 1;
                    }
                }
                Err(e) if e.is_not_found() => {
                    debug!(uri = %uri, path = %path.display(), "No body file, keeping metadata only");
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping body file"),
            }
        }
        merged
    }
}

/// Unwrap a read result, logging and dropping failures.
fn usable(path: &Path, doc: Result<Value>) -> Option<Value> {
    match doc {
        Ok(doc) => Some(doc),
        Err(e) if e.is_not_found() => {
            debug!(path = %path.display(), "Input file absent");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable input file");
            None
        }
    }
}

fn log_missing(label: &str, error: &CatalogError) {
    if error.is_not_found() {
        debug!(family = label, "Family absent, contributes nothing");
    } else {
        warn!(family = label, error = %error, "Cannot list family directory");
    }
}

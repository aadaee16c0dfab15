//! File-access seam for catalog ingestion.
//!
//! The builder never touches the filesystem directly: it asks a
//! [`ContentProvider`] for raw text and directory listings by path relative to
//! the content root. Read and parse failures surface as [`CatalogError`]s
//! that the loader logs before skipping the unit.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::error::{CatalogError, Result};

/// Supplies raw content and directory listings for relative paths.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Read a whole file as UTF-8 text.
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// File names (not paths) directly inside `dir`, sorted.
    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>>;

    /// Read and parse a JSON document.
    async fn read_json(&self, path: &Path) -> Result<Value> {
        let text = self.read_to_string(path).await?;
        serde_json::from_str(&text).map_err(|e| CatalogError::parse(path, e))
    }
}

// ============================================================================
// FsContentProvider
// ============================================================================

/// Reads content from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsContentProvider {
    root: PathBuf,
}

impl FsContentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl ContentProvider for FsContentProvider {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let full = self.resolve(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| CatalogError::io(full, e))
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let full = self.resolve(dir);
        let mut entries = tokio::fs::read_dir(&full)
            .await
            .map_err(|e| CatalogError::io(&full, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CatalogError::io(&full, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

// ============================================================================
// MemoryContentProvider
// ============================================================================

/// In-memory file tree, for tests and embedded content.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentProvider {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with raw text content.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add a file holding the serialized JSON value.
    pub fn with_json(self, path: impl Into<PathBuf>, value: &Value) -> Self {
        self.with_file(path, value.to_string())
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

#[async_trait]
impl ContentProvider for MemoryContentProvider {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            CatalogError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let names: Vec<String> = self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();

        if names.is_empty() {
            return Err(CatalogError::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            ));
        }
        Ok(names)
    }
}

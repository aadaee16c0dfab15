//! Error types for the content catalog.
//!
//! Catalog errors never escape a build: the builder and loader consume them
//! per input unit or per record, log them, and move on. They exist so that
//! the skip decision and the log line carry the precise cause.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure while reading or normalizing one input unit or record.
#[derive(Error, Debug)]
pub enum CatalogError {
    // =========================================================================
    // Input Unit Errors
    // =========================================================================

    /// Reading a file or directory listing failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON.
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        /// Path of the malformed file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but does not have the expected top-level shape.
    #[error("Unexpected document shape in {path}: expected {expected}")]
    UnexpectedShape {
        /// Path of the offending file
        path: PathBuf,
        /// Human-readable description of the expected shape
        expected: &'static str,
    },

    // =========================================================================
    // Record Errors
    // =========================================================================

    /// The record has no usable display name.
    #[error("Record has no usable name")]
    MissingName,

    /// The record is not an object or is otherwise unusable.
    #[error("Invalid record: {reason}")]
    InvalidRecord {
        /// Description of what made the record unusable
        reason: String,
    },

    // =========================================================================
    // Identifier Errors
    // =========================================================================

    /// A string could not be parsed as a catalog URI.
    #[error("Invalid catalog URI: {0}")]
    InvalidUri(String),
}

impl CatalogError {
    /// Build an [`CatalogError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`CatalogError::Parse`] for the given path.
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means "the input simply isn't there".
    ///
    /// Missing optional inputs contribute nothing and are logged at debug
    /// level instead of warn.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let err = CatalogError::io(
            "data/bestiary/bestiary-mm.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("bestiary-mm.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = CatalogError::parse("data/spells/spells-phb.json", json_err);
        assert!(err.to_string().contains("spells-phb.json"));
    }

    #[test]
    fn test_is_not_found() {
        let missing = CatalogError::io(
            "data/items.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(missing.is_not_found());
        assert!(!CatalogError::MissingName.is_not_found());
    }

    #[test]
    fn test_error_display_invalid_uri() {
        let err = CatalogError::InvalidUri("http://nope".to_string());
        assert!(err.to_string().contains("http://nope"));
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::catalog::DEFAULT_READ_CONCURRENCY;

/// Directory name used under the platform config, data and log roots.
const APP_DIR: &str = "ttrpg-catalog";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Content locations and ingestion limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Override the default content root.
    pub data_dir: Option<PathBuf>,
    /// Homebrew overlay: a JSON document or a directory of them.
    pub homebrew_path: Option<PathBuf>,
    /// Maximum concurrent file reads during ingestion.
    pub read_concurrency: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            homebrew_path: None,
            read_concurrency: DEFAULT_READ_CONCURRENCY,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Where the loaded configuration came from.
///
/// Returned alongside the config so the outcome can be logged once the
/// subscriber built from that config is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, reason: String },
}

impl ConfigOrigin {
    /// Emit the load outcome through the `log` facade.
    pub fn log(&self) {
        match self {
            Self::File(path) => log::info!("Loaded config from {}", path.display()),
            Self::Missing(path) => {
                log::debug!("No config file at {}, using defaults", path.display())
            }
            Self::Invalid { path, reason } => log::warn!(
                "Failed to parse config at {}: {reason}, using defaults",
                path.display()
            ),
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/ttrpg-catalog/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, with the same fallbacks as
    /// [`AppConfig::load`].
    pub fn load_from(config_path: &Path) -> Self {
        let (config, origin) = Self::read(config_path);
        origin.log();
        config
    }

    /// Read configuration without logging, reporting where it came from.
    pub fn read(config_path: &Path) -> (Self, ConfigOrigin) {
        let contents = match std::fs::read_to_string(config_path) {
            Ok(contents) => contents,
            Err(_) => return (Self::default(), ConfigOrigin::Missing(config_path.to_path_buf())),
        };

        match toml::from_str(&contents) {
            Ok(config) => (config, ConfigOrigin::File(config_path.to_path_buf())),
            Err(e) => (
                Self::default(),
                ConfigOrigin::Invalid {
                    path: config_path.to_path_buf(),
                    reason: e.to_string(),
                },
            ),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl CatalogConfig {
    /// Resolved content root (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR).join("data"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Read concurrency, never below 1.
    pub fn read_concurrency(&self) -> usize {
        self.read_concurrency.max(1)
    }
}

impl LoggingConfig {
    /// Resolved log directory (override or XDG default).
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR).join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

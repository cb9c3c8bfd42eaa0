//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GPM_STORAGE` - Storage backend, `file` or `memory` (default: file)
//! - `GPM_STORAGE_DIR` - Directory for file storage (default: .gpm)
//! - `GPM_CATALOG_PATH` - Product catalog file (default: data/catalog.yaml)
//! - `GPM_GALLERY_PATH` - Gallery file (default: data/gallery.yaml)
//! - `GPM_LOG_FORMAT` - Log output, `pretty` or `json` (default: pretty)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_STORAGE_DIR: &str = ".gpm";
const DEFAULT_CATALOG_PATH: &str = "data/catalog.yaml";
const DEFAULT_GALLERY_PATH: &str = "data/gallery.yaml";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where store snapshots are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One JSON file per key under the storage directory.
    #[default]
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("expected 'file' or 'memory', got '{s}'")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected 'pretty' or 'json', got '{s}'")),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage backend for cart, wishlist and order snapshots
    pub storage: StorageBackend,
    /// Directory used by the file backend
    pub storage_dir: PathBuf,
    /// Product catalog (YAML or JSON)
    pub catalog_path: PathBuf,
    /// Gallery images (YAML or JSON); a missing file means an empty gallery
    pub gallery_path: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            gallery_path: PathBuf::from(DEFAULT_GALLERY_PATH),
            log_format: LogFormat::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unrecognized value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unrecognized value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage = parse_var("GPM_STORAGE", &get_or_default("GPM_STORAGE", "file"))?;
        let log_format = parse_var("GPM_LOG_FORMAT", &get_or_default("GPM_LOG_FORMAT", "pretty"))?;

        Ok(Self {
            storage,
            storage_dir: get_or_default("GPM_STORAGE_DIR", DEFAULT_STORAGE_DIR).into(),
            catalog_path: get_or_default("GPM_CATALOG_PATH", DEFAULT_CATALOG_PATH).into(),
            gallery_path: get_or_default("GPM_GALLERY_PATH", DEFAULT_GALLERY_PATH).into(),
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable value, naming the variable in the error.
fn parse_var<T: FromStr<Err = String>>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
}

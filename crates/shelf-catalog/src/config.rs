//! Storage configuration, read from an optional TOML file.
//!
//! ```toml
//! data_dir = "data"
//! items_file = "books.txt"
//! borrowers_file = "members.txt"
//! ```

use crate::codec::RecordKind;
use crate::store::{DEFAULT_BORROWERS_FILE, DEFAULT_DATA_DIR, DEFAULT_ITEMS_FILE, FlatFileStore};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
    pub items_file: String,
    pub borrowers_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            items_file: DEFAULT_ITEMS_FILE.to_string(),
            borrowers_file: DEFAULT_BORROWERS_FILE.to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Build the file store this configuration describes.
    pub fn store(&self) -> FlatFileStore {
        FlatFileStore::new(&self.data_dir)
            .with_file_name(RecordKind::Item, &self.items_file)
            .with_file_name(RecordKind::Borrower, &self.borrowers_file)
    }
}

//! Input and index locations

use super::defaults::{DEFAULT_DATA_FILE, DEFAULT_PERSIST_DIR};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the corpus is read from and the index is written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// CSV file with `book_id`, `book_name`, `book_summary` columns
    pub data_file: PathBuf,
    /// Directory holding the persisted graph index
    pub persist_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            persist_dir: PathBuf::from(DEFAULT_PERSIST_DIR),
        }
    }
}

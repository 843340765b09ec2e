//! Bag set persistence.
//!
//! Splits are written as pretty-printed JSON arrays, one file per split,
//! named by the bag interval so runs with different windows can coexist in
//! the same directory.

use std::path::{Path, PathBuf};

use crate::core::bag::Bag;

/// Errors raised while reading or writing bag files.
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {e}"),
            StoreError::Serialize(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// File name for a training split with the given interval.
pub fn train_file_name(interval_minutes: i64) -> String {
    format!("train_intv={interval_minutes}_min.json")
}

/// File name for a test split with the given interval.
pub fn test_file_name(interval_minutes: i64) -> String {
    format!("test_intv={interval_minutes}_min.json")
}

/// Write a bag collection to a JSON file, creating parent directories.
pub fn save_bags(path: impl AsRef<Path>, bags: &[Bag]) -> Result<PathBuf, StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
    }

    let json =
        serde_json::to_string_pretty(bags).map_err(|e| StoreError::Serialize(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| StoreError::Io(e.to_string()))?;

    Ok(path.to_path_buf())
}

/// Read a bag collection from a JSON file.
pub fn load_bags(path: impl AsRef<Path>) -> Result<Vec<Bag>, StoreError> {
    let content =
        std::fs::read_to_string(path.as_ref()).map_err(|e| StoreError::Io(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| StoreError::Serialize(e.to_string()))
}

#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the data directory.
//!
//! The root is `AGING_MAP_DATA_DIR` when set, otherwise `data/` relative
//! to the working directory.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "AGING_MAP_DATA_DIR";

/// Returns the data directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from("data"), PathBuf::from)
}

/// Returns the `cache/` directory for serialized snapshot series.
#[must_use]
pub fn cache_dir() -> PathBuf {
    data_dir().join("cache")
}

/// Returns the path for a named cache file.
#[must_use]
pub fn cache_path(name: &str) -> PathBuf {
    cache_dir().join(format!("{name}.json"))
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

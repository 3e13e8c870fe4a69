//! JSON cache of processed snapshot series.
//!
//! Only raw counts are written. Ratios are recomputed from them after
//! loading.

use std::path::Path;

use aging_map_demographics_models::{DemographicSnapshot, RegionSeries, TimeSeries};
use aging_map_ingest_models::{CacheFile, CachedSnapshot};

use crate::IngestError;
use crate::paths::ensure_dir;

/// Converts a region series into the cache file layout.
#[must_use]
pub fn to_cache(series: &RegionSeries) -> CacheFile {
    series
        .iter()
        .map(|(code, years)| {
            let years = years
                .iter()
                .map(|(year, snapshot)| (year.to_string(), CachedSnapshot::from(snapshot)))
                .collect();
            (code.clone(), years)
        })
        .collect()
}

/// Rebuilds a region series from the cache file layout.
///
/// Entries whose year key is not a number are dropped with a warning.
#[must_use]
pub fn from_cache(cache: CacheFile) -> RegionSeries {
    cache
        .into_iter()
        .map(|(code, years)| {
            let series: TimeSeries = years
                .into_iter()
                .filter_map(|(key, cached)| match key.trim().parse::<i32>() {
                    Ok(year) => Some((year, DemographicSnapshot::from(cached))),
                    Err(_) => {
                        log::warn!("Ignoring cache entry {code}/{key}: year key is not a number");
                        None
                    }
                })
                .collect();
            (code, series)
        })
        .collect()
}

/// Serializes a region series as pretty-printed cache JSON.
///
/// # Errors
///
/// * If serialization fails
pub fn to_json(series: &RegionSeries) -> Result<String, IngestError> {
    Ok(serde_json::to_string_pretty(&to_cache(series))?)
}

/// Parses cache JSON into a region series.
///
/// # Errors
///
/// * If the text is not a valid cache document
pub fn from_json(text: &str) -> Result<RegionSeries, IngestError> {
    let cache: CacheFile = serde_json::from_str(text)?;
    Ok(from_cache(cache))
}

/// Writes a region series to `path`, creating parent directories.
///
/// # Errors
///
/// * If the directory or file cannot be written
pub fn save_cache(series: &RegionSeries, path: &Path) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, to_json(series)?)?;
    log::info!("Cached {} regions to {}", series.len(), path.display());
    Ok(())
}

/// Reads a region series from the cache at `path`.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file is not a valid cache document
pub fn load_cache(path: &Path) -> Result<RegionSeries, IngestError> {
    let text = std::fs::read_to_string(path)?;
    let series = from_json(&text)?;
    log::info!("Loaded {} regions from {}", series.len(), path.display());
    Ok(series)
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Population statistics ingestion.
//!
//! Reads raw population CSV files into [`PopulationRecord`]s, builds
//! per-region snapshot series, and persists them as a JSON cache that the
//! CLI subcommands analyze.
//!
//! [`PopulationRecord`]: aging_map_demographics_models::PopulationRecord

pub mod cache;
pub mod loader;
pub mod paths;
pub mod pipeline;

use std::path::Path;

use aging_map_analytics::AnalyticsError;
use aging_map_analytics_models::AnalysisConfig;
use aging_map_region::RegionError;
use aging_map_region_models::AggregatePatterns;
use thiserror::Error;

/// Errors that can occur while loading or caching population data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Cache JSON could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error on a data file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Analysis configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] AnalyticsError),

    /// Aggregate-pattern table could not be loaded.
    #[error(transparent)]
    Patterns(#[from] RegionError),

    /// The CSV header does not carry the expected columns.
    #[error("Missing columns: {message}")]
    MissingColumns {
        /// Which columns were missing.
        message: String,
    },
}

/// Loads the analysis config from `path`, or the embedded default.
///
/// # Errors
///
/// * If the config file cannot be read or is invalid
pub fn load_analysis_config(path: Option<&Path>) -> Result<AnalysisConfig, IngestError> {
    match path {
        Some(path) => Ok(aging_map_analytics::config::load_config(path)?),
        None => Ok(aging_map_analytics::config::default_config()),
    }
}

/// Loads the aggregate-label table from `path`, or the embedded default.
///
/// # Errors
///
/// * If the pattern file cannot be read or is invalid
pub fn load_aggregate_patterns(path: Option<&Path>) -> Result<AggregatePatterns, IngestError> {
    match path {
        Some(path) => Ok(aging_map_region::patterns::load_patterns(path)?),
        None => Ok(aging_map_region::patterns::default_patterns().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_is_a_config_error() {
        let path = std::env::temp_dir().join("aging_map_no_such_config.toml");
        let err = load_analysis_config(Some(&path)).unwrap_err();
        assert!(matches!(err, IngestError::Config(AnalyticsError::Io(_))));
    }

    #[test]
    fn missing_pattern_file_is_a_patterns_error() {
        let path = std::env::temp_dir().join("aging_map_no_such_patterns.toml");
        let err = load_aggregate_patterns(Some(&path)).unwrap_err();
        assert!(matches!(err, IngestError::Patterns(RegionError::Io(_))));
    }

    #[test]
    fn custom_patterns_drive_the_processor() {
        let path = std::env::temp_dir().join(format!("aging_map_ingest_patterns_{}.toml", std::process::id()));
        std::fs::write(&path, "[[patterns]]\nkind = \"exact\"\nvalue = \"기타\"\n").unwrap();
        let patterns = load_aggregate_patterns(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        let processor = aging_map_demographics::DemographicProcessor::with_patterns(patterns.clone());
        let resolver = aging_map_region::HierarchyResolver::with_patterns(patterns);
        assert!(processor.is_total_entry("기타"));
        assert!(!processor.is_total_entry("합계"));
        assert!(resolver.is_total_entry("기타"));
    }

    #[test]
    fn default_patterns_without_a_path() {
        let patterns = load_aggregate_patterns(None).unwrap();
        assert!(patterns.is_aggregate("소계"));
    }

    #[test]
    fn defaults_without_a_path() {
        let config = load_analysis_config(None).unwrap();
        assert_eq!(config.analysis_years, vec![2021, 2022, 2023, 2024, 2025]);
    }
}

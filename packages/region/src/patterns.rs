//! Aggregate-label pattern table.
//!
//! The default table is embedded at compile time from
//! `config/aggregate_patterns.toml`. Callers that need a different set can
//! load their own file with [`load_patterns`].

use std::path::Path;
use std::sync::OnceLock;

use aging_map_region_models::AggregatePatterns;

use crate::RegionError;

const DEFAULT_PATTERNS_TOML: &str = include_str!("../config/aggregate_patterns.toml");

/// Parses an aggregate-pattern table from TOML text.
///
/// # Errors
///
/// Returns [`RegionError::Patterns`] if the TOML is malformed.
pub fn parse_patterns(text: &str) -> Result<AggregatePatterns, RegionError> {
    Ok(toml::from_str(text)?)
}

/// Loads an aggregate-pattern table from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_patterns(path: &Path) -> Result<AggregatePatterns, RegionError> {
    let text = std::fs::read_to_string(path)?;
    let patterns = parse_patterns(&text)?;
    log::debug!(
        "Loaded {} aggregate patterns from {}",
        patterns.patterns.len(),
        path.display()
    );
    Ok(patterns)
}

/// Returns the embedded default pattern table.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn default_patterns() -> &'static AggregatePatterns {
    static PATTERNS: OnceLock<AggregatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        parse_patterns(DEFAULT_PATTERNS_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse aggregate_patterns.toml: {e}"))
    })
}

/// Returns `true` if `label` is a total/subtotal entry under the default
/// table.
#[must_use]
pub fn is_total_entry(label: &str) -> bool {
    default_patterns().is_aggregate(label)
}

//! Analysis configuration loading.
//!
//! The default configuration is embedded at compile time from
//! `config/default.toml`. A custom file only needs the sections it changes.

use std::path::Path;

use aging_map_analytics_models::AnalysisConfig;

use crate::AnalyticsError;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Parses and validates an analysis configuration from TOML text.
///
/// Analysis years are sorted and deduplicated.
///
/// # Errors
///
/// Returns [`AnalyticsError::Config`] if the TOML is malformed, or
/// [`AnalyticsError::InvalidConfig`] if no analysis years are given or the
/// urgency weights do not sum to 1.
pub fn parse_config(text: &str) -> Result<AnalysisConfig, AnalyticsError> {
    let mut config: AnalysisConfig = toml::from_str(text)?;

    config.analysis_years.sort_unstable();
    config.analysis_years.dedup();

    if config.analysis_years.is_empty() {
        return Err(AnalyticsError::InvalidConfig {
            message: "analysis_years must not be empty".to_string(),
        });
    }

    let total = config.weights.total();
    if (total - 1.0).abs() > 1e-6 {
        return Err(AnalyticsError::InvalidConfig {
            message: format!("urgency weights sum to {total}, expected 1.0"),
        });
    }

    Ok(config)
}

/// Loads an analysis configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, AnalyticsError> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    log::info!(
        "Loaded analysis config from {} ({} analysis years)",
        path.display(),
        config.analysis_years.len()
    );
    Ok(config)
}

/// Returns the embedded default configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn default_config() -> AnalysisConfig {
    parse_config(DEFAULT_CONFIG_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse default.toml: {e}"))
}

#[cfg(test)]
mod tests {
    use aging_map_analytics_models::Language;

    use super::*;

    #[test]
    fn embedded_default_matches_struct_default() {
        assert_eq!(default_config(), AnalysisConfig::default());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config = parse_config("language = \"en\"\nanalysis_years = [2025, 2023, 2023]").unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.analysis_years, vec![2023, 2025]);
        assert_eq!(config.weights, AnalysisConfig::default().weights);
    }

    #[test]
    fn rejects_empty_years() {
        assert!(matches!(
            parse_config("analysis_years = []"),
            Err(AnalyticsError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_unbalanced_weights() {
        let text = "[weights]\naging_velocity = 0.9\nold_old_ratio = 0.25\nabsolute_elderly = 0.15\n\
                    dependency_ratio = 0.15\ntrend_acceleration = 0.10\nyouth_decline = 0.10";
        assert!(matches!(
            parse_config(text),
            Err(AnalyticsError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            parse_config("language = [1"),
            Err(AnalyticsError::Config(_))
        ));
    }
}

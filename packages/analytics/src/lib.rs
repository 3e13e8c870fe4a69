#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Demographic trend analysis.
//!
//! [`TrendAnalyzer`] turns per-region snapshot series into [`TrendMetrics`]:
//! compound growth rates, old-old acceleration, a weighted 0-100 welfare
//! urgency score, anomaly flags, rankings, and cross-region statistics.
//!
//! Analysis is infallible. Insufficient data yields degenerate metrics or
//! empty results rather than errors; only loading configuration can fail.
//!
//! [`TrendMetrics`]: aging_map_analytics_models::TrendMetrics

pub mod analyzer;
pub mod anomalies;
pub mod config;
pub mod statistics;
pub mod urgency;

pub use aging_map_analytics_models::calculate_cagr;
pub use analyzer::TrendAnalyzer;

use thiserror::Error;

/// Errors that can occur while loading analysis configuration.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Config TOML could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config parsed but is unusable.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },
}

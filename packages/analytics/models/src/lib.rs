#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trend analysis result types and analysis configuration.
//!
//! [`TrendMetrics`] and the other result types are recomputed on demand
//! from snapshot series; nothing here is persisted independently.

use std::collections::BTreeMap;

use aging_map_demographics_models::TimeSeries;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Compound annual growth rate between two values, in percent.
///
/// Returns 0 when `start_value <= 0` or `years <= 0`.
#[must_use]
pub fn calculate_cagr(start_value: f64, end_value: f64, years: i32) -> f64 {
    if start_value <= 0.0 || years <= 0 {
        return 0.0;
    }
    ((end_value / start_value).powf(1.0 / f64::from(years)) - 1.0) * 100.0
}

// ── Classifications ──────────────────────────────────────────────────────

/// Direction of a demographic trend, bucketed by annual growth rate.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendDirection {
    /// Growth above the rapid threshold.
    RapidIncrease,
    /// Growth between the moderate and rapid thresholds.
    ModerateIncrease,
    /// Change within the stable band.
    #[default]
    Stable,
    /// Decline between the stable and negative rapid thresholds.
    ModerateDecrease,
    /// Decline at or beyond the negative rapid threshold.
    RapidDecrease,
}

/// Welfare intervention urgency, from 1 (low) to 5 (critical).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    /// Minimal intervention needed
    Low = 1,
    /// Standard monitoring
    #[default]
    Moderate = 2,
    /// Above normal concern
    Elevated = 3,
    /// Priority attention needed
    High = 4,
    /// Immediate action required
    Critical = 5,
}

impl UrgencyLevel {
    /// Every level, most urgent first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Critical,
            Self::High,
            Self::Elevated,
            Self::Moderate,
            Self::Low,
        ]
    }
}

/// How far a region deviates from its reference.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviationSeverity {
    /// Total absolute deviation of 8 points or less.
    #[default]
    Normal,
    /// Total absolute deviation above 8 points.
    Elevated,
    /// Total absolute deviation above 15 points.
    Severe,
}

/// Metric used to order regions in a ranking.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RankBy {
    #[default]
    UrgencyScore,
    AgingVelocity,
    OldOldVelocity,
}

/// Language of generated factor and anomaly text.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// Korean
    #[default]
    Ko,
    /// English
    En,
}

/// Anomalous patterns flagged independently of the urgency score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Anomaly {
    /// Old-old growth accelerating by more than 5 points.
    AccelerationSpike,
    /// Aging velocity above 8% per year.
    RapidAging,
    /// Total population down more than 5%.
    PopulationCliff,
    /// Youth velocity below -5% per year.
    YouthCollapse,
    /// Aging ratio above 20% in some analyzed year.
    SuperAged,
}

// ── Results ──────────────────────────────────────────────────────────────

/// Trend indicators for one region over the analysis window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetrics {
    pub region_code: String,
    pub region_name: String,
    pub start_year: i32,
    pub end_year: i32,

    pub total_change_absolute: i64,
    pub total_change_percent: f64,

    /// CAGR of the elderly (65+) population, in percent.
    pub aging_velocity: f64,
    pub aging_velocity_trend: TrendDirection,

    /// CAGR of the old-old (75+) population, in percent.
    pub old_old_velocity: f64,
    /// Second-half old-old CAGR minus first-half old-old CAGR.
    pub old_old_acceleration: f64,

    /// CAGR of the children and youth population, in percent.
    pub youth_velocity: f64,

    /// Dependency ratio at the end year minus the start year.
    pub dependency_change: f64,

    pub yearly_aging_ratios: BTreeMap<i32, f64>,
    pub yearly_populations: BTreeMap<i32, u64>,
    pub yearly_elderly: BTreeMap<i32, u64>,

    pub urgency_level: UrgencyLevel,
    /// Composite score in `[0, 100]`.
    pub urgency_score: f64,
    /// Descriptions of the urgency rules that fired, in rule order.
    pub urgency_factors: Vec<String>,
}

/// A region compared against a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeAnalysis {
    pub region_code: String,
    /// `"national"` or the reference region's code.
    pub reference_type: String,
    pub aging_ratio_diff: f64,
    pub aging_velocity_diff: f64,
    pub old_old_ratio_diff: f64,
    pub deviation_severity: DeviationSeverity,
}

/// What a region is compared against.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceScope {
    /// The analyzer's current national reference.
    National,
    /// Another region, typically the parent.
    Region {
        /// Code of the reference region.
        code: String,
        /// Reference values computed from that region's series.
        values: ReferenceValues,
    },
}

/// Changes between two consecutive available years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearOverYearChange {
    pub year: i32,
    pub prev_year: i32,
    pub population_change: i64,
    pub population_change_pct: f64,
    pub elderly_change: i64,
    pub elderly_change_pct: f64,
    pub aging_ratio_change: f64,
    pub old_old_change: i64,
}

/// Spread of a metric across regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Urgency score summary across regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyScoreStats {
    pub mean: f64,
    pub median: f64,
    /// 90th percentile, linearly interpolated.
    pub top_10_threshold: f64,
}

/// Aggregate statistics over a set of analyzed regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub total_regions: usize,
    pub aging_velocity: DistributionStats,
    /// Region count per level; every level is present.
    pub urgency_distribution: BTreeMap<UrgencyLevel, usize>,
    pub urgency_scores: UrgencyScoreStats,
}

// ── Configuration ────────────────────────────────────────────────────────

/// Reference values regions are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValues {
    /// Elderly share of the population, in percent.
    pub aging_ratio: f64,
    /// Old-old share of the elderly, in percent.
    pub old_old_ratio: f64,
    /// Elderly CAGR, in percent.
    pub aging_velocity: f64,
    /// Dependants per 100 productive-age people.
    pub dependency_ratio: f64,
}

impl Default for ReferenceValues {
    fn default() -> Self {
        Self {
            aging_ratio: 19.2,
            old_old_ratio: 42.5,
            aging_velocity: 4.2,
            dependency_ratio: 45.0,
        }
    }
}

impl ReferenceValues {
    /// Computes reference values from a series, starting from the defaults.
    #[must_use]
    pub fn from_series(series: &TimeSeries, start_year: i32, end_year: i32) -> Self {
        Self::default().recalibrated(series, start_year, end_year)
    }

    /// Returns a copy with the ratios taken from `end_year` and the aging
    /// velocity from the `start_year`..`end_year` elderly CAGR.
    ///
    /// Values that cannot be computed (missing years, zero elderly base)
    /// keep their current value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn recalibrated(&self, series: &TimeSeries, start_year: i32, end_year: i32) -> Self {
        let mut values = *self;

        if let Some(latest) = series.get(&end_year) {
            values.aging_ratio = latest.aging_ratio();
            values.old_old_ratio = latest.old_old_ratio();
            values.dependency_ratio = latest.dependency_ratio();
        }

        if let (Some(start), Some(end)) = (series.get(&start_year), series.get(&end_year)) {
            let years = end_year - start_year;
            if start.elderly_total() > 0 && years > 0 {
                values.aging_velocity = calculate_cagr(
                    start.elderly_total() as f64,
                    end.elderly_total() as f64,
                    years,
                );
            }
        }

        values
    }
}

/// Trend direction thresholds, in percent per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityThresholds {
    pub rapid: f64,
    pub moderate: f64,
    pub stable: f64,
}

impl Default for VelocityThresholds {
    fn default() -> Self {
        Self {
            rapid: 5.0,
            moderate: 2.0,
            stable: -2.0,
        }
    }
}

/// Weights of the six urgency components. They sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrgencyWeights {
    pub aging_velocity: f64,
    pub old_old_ratio: f64,
    pub absolute_elderly: f64,
    pub dependency_ratio: f64,
    pub trend_acceleration: f64,
    pub youth_decline: f64,
}

impl Default for UrgencyWeights {
    fn default() -> Self {
        Self {
            aging_velocity: 0.25,
            old_old_ratio: 0.25,
            absolute_elderly: 0.15,
            dependency_ratio: 0.15,
            trend_acceleration: 0.10,
            youth_decline: 0.10,
        }
    }
}

impl UrgencyWeights {
    /// Sum of all six weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.aging_velocity
            + self.old_old_ratio
            + self.absolute_elderly
            + self.dependency_ratio
            + self.trend_acceleration
            + self.youth_decline
    }
}

/// Analyzer configuration.
///
/// Every section is optional in TOML and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Years included in analysis, ascending.
    pub analysis_years: Vec<i32>,
    pub thresholds: VelocityThresholds,
    pub weights: UrgencyWeights,
    /// Initial national reference.
    pub reference: ReferenceValues,
    pub language: Language,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_years: (2021..=2025).collect(),
            thresholds: VelocityThresholds::default(),
            weights: UrgencyWeights::default(),
            reference: ReferenceValues::default(),
            language: Language::default(),
        }
    }
}

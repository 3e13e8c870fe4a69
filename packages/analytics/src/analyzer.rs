//! Per-region trend analysis.

use aging_map_analytics_models::{
    AnalysisConfig, ComparativeAnalysis, DeviationSeverity, RankBy, ReferenceScope,
    ReferenceValues, SummaryStatistics, TrendDirection, TrendMetrics, YearOverYearChange,
    calculate_cagr,
};
use aging_map_demographics_models::{DemographicSnapshot, TimeSeries};

use crate::{anomalies, config, statistics, urgency};

/// Computes trend metrics from snapshot series.
///
/// Holds the analysis configuration and the current national reference.
/// The reference is only ever replaced as a whole, by
/// [`TrendAnalyzer::set_national_reference`].
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    config: AnalysisConfig,
    reference: ReferenceValues,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(config::default_config())
    }
}

fn signed_diff(end: u64, start: u64) -> i64 {
    i64::try_from(i128::from(end) - i128::from(start)).unwrap_or(if end > start {
        i64::MAX
    } else {
        i64::MIN
    })
}

#[allow(clippy::cast_precision_loss)]
fn percent_change(end: u64, start: u64) -> f64 {
    if start == 0 {
        0.0
    } else {
        signed_diff(end, start) as f64 / start as f64 * 100.0
    }
}

impl TrendAnalyzer {
    /// Creates an analyzer from `config`.
    ///
    /// Analysis years are sorted and deduplicated. An empty year list falls
    /// back to the default years.
    #[must_use]
    pub fn new(mut config: AnalysisConfig) -> Self {
        config.analysis_years.sort_unstable();
        config.analysis_years.dedup();
        if config.analysis_years.is_empty() {
            log::warn!("No analysis years configured, using defaults");
            config.analysis_years = AnalysisConfig::default().analysis_years;
        }
        let reference = config.reference;
        Self { config, reference }
    }

    #[must_use]
    pub fn analysis_years(&self) -> &[i32] {
        &self.config.analysis_years
    }

    /// First configured analysis year.
    #[must_use]
    pub fn start_year(&self) -> i32 {
        self.config.analysis_years.first().copied().unwrap_or_default()
    }

    /// Last configured analysis year.
    #[must_use]
    pub fn end_year(&self) -> i32 {
        self.config.analysis_years.last().copied().unwrap_or_default()
    }

    /// Current national reference.
    #[must_use]
    pub const fn reference(&self) -> &ReferenceValues {
        &self.reference
    }

    /// Recalibrates the national reference from a national series.
    ///
    /// Ratios come from the last analysis year and the aging velocity from
    /// the first-to-last elderly CAGR; values the series cannot supply are
    /// carried over from the current reference.
    pub fn set_national_reference(&mut self, national: &TimeSeries) {
        let reference = self
            .reference
            .recalibrated(national, self.start_year(), self.end_year());
        log::info!(
            "National reference set: aging_ratio={:.2} old_old_ratio={:.2} \
             aging_velocity={:.2} dependency_ratio={:.2}",
            reference.aging_ratio,
            reference.old_old_ratio,
            reference.aging_velocity,
            reference.dependency_ratio
        );
        self.reference = reference;
    }

    /// Compound annual growth rate in percent; see [`calculate_cagr`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn calculate_cagr(&self, start_value: f64, end_value: f64, years: i32) -> f64 {
        calculate_cagr(start_value, end_value, years)
    }

    /// Buckets an annual growth rate. Every bound is exclusive, so a rate
    /// exactly on a threshold falls into the next bucket down.
    #[must_use]
    pub fn classify_trend(&self, velocity: f64) -> TrendDirection {
        let t = &self.config.thresholds;
        if velocity > t.rapid {
            TrendDirection::RapidIncrease
        } else if velocity > t.moderate {
            TrendDirection::ModerateIncrease
        } else if velocity > t.stable {
            TrendDirection::Stable
        } else if velocity > -t.rapid {
            TrendDirection::ModerateDecrease
        } else {
            TrendDirection::RapidDecrease
        }
    }

    /// Analysis years present in `series`, ascending.
    #[must_use]
    pub fn available_years(&self, series: &TimeSeries) -> Vec<i32> {
        self.config
            .analysis_years
            .iter()
            .copied()
            .filter(|year| series.contains_key(year))
            .collect()
    }

    /// Computes trend metrics for one region.
    ///
    /// Uses the first and last available analysis years as endpoints. With
    /// no available years the result is empty; with one year it carries
    /// that year as start and end and no computed indicators.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn analyze_region(&self, series: &TimeSeries) -> TrendMetrics {
        let years = self.available_years(series);

        let (Some(&first_year), Some(&last_year)) = (years.first(), years.last()) else {
            return TrendMetrics::default();
        };
        let first = &series[&first_year];
        let last = &series[&last_year];

        let mut metrics = TrendMetrics {
            region_code: first.region_code.clone(),
            region_name: first.region_name.clone(),
            start_year: first_year,
            end_year: last_year,
            ..TrendMetrics::default()
        };

        if years.len() < 2 {
            log::debug!(
                "{}: only {first_year} available, skipping trend analysis",
                metrics.region_code
            );
            return metrics;
        }

        let span = last_year - first_year;

        for year in &years {
            let snapshot = &series[year];
            metrics.yearly_populations.insert(*year, snapshot.total_population);
            metrics.yearly_elderly.insert(*year, snapshot.elderly_total());
            metrics.yearly_aging_ratios.insert(*year, snapshot.aging_ratio());
        }

        metrics.total_change_absolute = signed_diff(last.total_population, first.total_population);
        metrics.total_change_percent = percent_change(last.total_population, first.total_population);

        metrics.aging_velocity = calculate_cagr(
            first.elderly_total() as f64,
            last.elderly_total() as f64,
            span,
        );
        metrics.aging_velocity_trend = self.classify_trend(metrics.aging_velocity);

        metrics.old_old_velocity =
            calculate_cagr(first.old_old as f64, last.old_old as f64, span);

        if years.len() >= 3 {
            let mid_year = years[years.len() / 2];
            let mid = &series[&mid_year];
            let first_half = if mid_year > first_year {
                calculate_cagr(first.old_old as f64, mid.old_old as f64, mid_year - first_year)
            } else {
                0.0
            };
            let second_half = if last_year > mid_year {
                calculate_cagr(mid.old_old as f64, last.old_old as f64, last_year - mid_year)
            } else {
                0.0
            };
            metrics.old_old_acceleration = second_half - first_half;
        }

        metrics.youth_velocity = calculate_cagr(
            first.children_youth as f64,
            last.children_youth as f64,
            span,
        );

        metrics.dependency_change = last.dependency_ratio() - first.dependency_ratio();

        let (score, factors) =
            urgency::calculate_urgency(&metrics, last, &self.config.weights, &self.reference);
        metrics.urgency_score = score;
        metrics.urgency_level = urgency::classify_urgency(score);
        metrics.urgency_factors = factors
            .iter()
            .map(|factor| factor.describe(self.config.language))
            .collect();

        log::debug!(
            "{} {}-{}: aging_velocity={:.2} urgency={:.1} ({})",
            metrics.region_code,
            first_year,
            last_year,
            metrics.aging_velocity,
            metrics.urgency_score,
            metrics.urgency_level
        );

        metrics
    }

    /// Compares a region's latest snapshot and velocity with a reference.
    ///
    /// Severity is graded on the sum of absolute differences: above 15 is
    /// severe, above 8 elevated, otherwise normal.
    #[must_use]
    pub fn compare_to_reference(
        &self,
        metrics: &TrendMetrics,
        latest: &DemographicSnapshot,
        scope: &ReferenceScope,
    ) -> ComparativeAnalysis {
        let (reference_type, reference) = match scope {
            ReferenceScope::National => ("national".to_string(), &self.reference),
            ReferenceScope::Region { code, values } => (code.clone(), values),
        };

        let aging_ratio_diff = latest.aging_ratio() - reference.aging_ratio;
        let aging_velocity_diff = metrics.aging_velocity - reference.aging_velocity;
        let old_old_ratio_diff = latest.old_old_ratio() - reference.old_old_ratio;

        let total_deviation =
            aging_ratio_diff.abs() + aging_velocity_diff.abs() + old_old_ratio_diff.abs();
        let deviation_severity = if total_deviation > 15.0 {
            DeviationSeverity::Severe
        } else if total_deviation > 8.0 {
            DeviationSeverity::Elevated
        } else {
            DeviationSeverity::Normal
        };

        ComparativeAnalysis {
            region_code: metrics.region_code.clone(),
            reference_type,
            aging_ratio_diff,
            aging_velocity_diff,
            old_old_ratio_diff,
            deviation_severity,
        }
    }

    /// Analyzes every region and orders them by `rank_by`, descending.
    ///
    /// Regions with equal values keep their input order.
    #[must_use]
    pub fn rank_regions<'a, I>(&self, all_series: I, rank_by: RankBy) -> Vec<(String, TrendMetrics)>
    where
        I: IntoIterator<Item = (&'a String, &'a TimeSeries)>,
    {
        let mut ranked: Vec<(String, TrendMetrics)> = all_series
            .into_iter()
            .map(|(code, series)| (code.clone(), self.analyze_region(series)))
            .collect();

        let key = |metrics: &TrendMetrics| match rank_by {
            RankBy::UrgencyScore => metrics.urgency_score,
            RankBy::AgingVelocity => metrics.aging_velocity,
            RankBy::OldOldVelocity => metrics.old_old_velocity,
        };
        ranked.sort_by(|(_, a), (_, b)| key(b).total_cmp(&key(a)));

        log::info!("Ranked {} regions by {rank_by}", ranked.len());
        ranked
    }

    /// Anomaly messages for `metrics`, formatted as `CODE: message`.
    #[must_use]
    pub fn detect_anomalies(&self, metrics: &TrendMetrics) -> Vec<String> {
        anomalies::detect(metrics)
            .into_iter()
            .map(|anomaly| anomalies::describe(anomaly, self.config.language))
            .collect()
    }

    /// Changes between each consecutive pair of available years.
    #[must_use]
    pub fn get_year_over_year(&self, series: &TimeSeries) -> Vec<YearOverYearChange> {
        self.available_years(series)
            .windows(2)
            .map(|pair| {
                let prev = &series[&pair[0]];
                let curr = &series[&pair[1]];
                YearOverYearChange {
                    year: pair[1],
                    prev_year: pair[0],
                    population_change: signed_diff(curr.total_population, prev.total_population),
                    population_change_pct: percent_change(
                        curr.total_population,
                        prev.total_population,
                    ),
                    elderly_change: signed_diff(curr.elderly_total(), prev.elderly_total()),
                    elderly_change_pct: percent_change(curr.elderly_total(), prev.elderly_total()),
                    aging_ratio_change: curr.aging_ratio() - prev.aging_ratio(),
                    old_old_change: signed_diff(curr.old_old, prev.old_old),
                }
            })
            .collect()
    }

    /// Summary statistics across regions; `None` for an empty input.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn get_summary_statistics(&self, metrics: &[TrendMetrics]) -> Option<SummaryStatistics> {
        statistics::get_summary_statistics(metrics)
    }
}

#[cfg(test)]
mod tests {
    use aging_map_analytics_models::{Language, UrgencyLevel};
    use aging_map_demographics_models::RegionSeries;

    use super::*;

    fn snapshot(
        year: i32,
        total: u64,
        children: u64,
        productive: u64,
        young_old: u64,
        old_old: u64,
    ) -> DemographicSnapshot {
        let mut s = DemographicSnapshot::new("1168000000", "강남구", year);
        s.total_population = total;
        s.children_youth = children;
        s.productive = productive;
        s.young_old = young_old;
        s.old_old = old_old;
        s
    }

    fn series(snapshots: Vec<DemographicSnapshot>) -> TimeSeries {
        snapshots.into_iter().map(|s| (s.year, s)).collect()
    }

    fn two_year_series() -> TimeSeries {
        series(vec![
            snapshot(2021, 100_000, 18_000, 70_000, 8_000, 4_000),
            snapshot(2025, 98_000, 16_500, 65_000, 9_500, 6_000),
        ])
    }

    #[test]
    fn classifies_trends() {
        let analyzer = TrendAnalyzer::default();
        assert_eq!(analyzer.classify_trend(5.01), TrendDirection::RapidIncrease);
        assert_eq!(analyzer.classify_trend(5.0), TrendDirection::ModerateIncrease);
        assert_eq!(analyzer.classify_trend(2.0), TrendDirection::Stable);
        assert_eq!(analyzer.classify_trend(0.0), TrendDirection::Stable);
        assert_eq!(analyzer.classify_trend(-2.0), TrendDirection::ModerateDecrease);
        assert_eq!(analyzer.classify_trend(-4.99), TrendDirection::ModerateDecrease);
        assert_eq!(analyzer.classify_trend(-5.0), TrendDirection::RapidDecrease);
    }

    #[test]
    fn two_year_scenario() {
        let analyzer = TrendAnalyzer::default();
        let metrics = analyzer.analyze_region(&two_year_series());

        assert_eq!(metrics.region_code, "1168000000");
        assert_eq!(metrics.start_year, 2021);
        assert_eq!(metrics.end_year, 2025);
        assert!((metrics.aging_velocity - calculate_cagr(12_000.0, 15_500.0, 4)).abs() < 1e-9);
        assert!((metrics.aging_velocity - 6.6).abs() < 0.05);
        assert!((metrics.old_old_velocity - 10.67).abs() < 0.01);
        assert!((metrics.total_change_percent + 2.0).abs() < 1e-9);
        assert_eq!(metrics.total_change_absolute, -2_000);
        assert_eq!(metrics.aging_velocity_trend, TrendDirection::RapidIncrease);
        // Two points: no midpoint split.
        assert!(metrics.old_old_acceleration.abs() < f64::EPSILON);
        assert!(metrics.youth_velocity < 0.0);
        assert_eq!(metrics.yearly_populations.len(), 2);
        assert!((0.0..=100.0).contains(&metrics.urgency_score));
        assert_eq!(
            metrics.urgency_factors.first().map(String::as_str),
            Some("고령화속도 전국평균 초과 (6.6%)")
        );
    }

    #[test]
    fn empty_series_is_degenerate() {
        let metrics = TrendAnalyzer::default().analyze_region(&TimeSeries::new());
        assert_eq!(metrics, TrendMetrics::default());
        assert!(metrics.region_code.is_empty());
    }

    #[test]
    fn single_year_is_degenerate() {
        let data = series(vec![snapshot(2023, 100, 10, 60, 20, 10)]);
        let metrics = TrendAnalyzer::default().analyze_region(&data);
        assert_eq!(metrics.region_code, "1168000000");
        assert_eq!(metrics.start_year, 2023);
        assert_eq!(metrics.end_year, 2023);
        assert!(metrics.aging_velocity.abs() < f64::EPSILON);
        assert!(metrics.urgency_score.abs() < f64::EPSILON);
        assert_eq!(metrics.urgency_level, UrgencyLevel::Moderate);
        assert!(metrics.yearly_populations.is_empty());
    }

    #[test]
    fn ignores_years_outside_analysis_window() {
        let mut data = two_year_series();
        data.insert(2019, snapshot(2019, 1, 1, 1, 1, 1));
        let metrics = TrendAnalyzer::default().analyze_region(&data);
        assert_eq!(metrics.start_year, 2021);
    }

    #[test]
    fn acceleration_splits_at_middle_index() {
        let data = series(vec![
            snapshot(2021, 1_000, 100, 600, 200, 100),
            snapshot(2022, 1_000, 100, 600, 200, 110),
            snapshot(2023, 1_000, 100, 600, 200, 121),
            snapshot(2024, 1_000, 100, 600, 200, 145),
            snapshot(2025, 1_000, 100, 600, 200, 174),
        ]);
        let metrics = TrendAnalyzer::default().analyze_region(&data);

        let first_half = calculate_cagr(100.0, 121.0, 2);
        let second_half = calculate_cagr(121.0, 174.0, 2);
        assert!((metrics.old_old_acceleration - (second_half - first_half)).abs() < 1e-9);
        assert!(metrics.old_old_acceleration > 0.0);
    }

    #[test]
    fn three_points_use_middle_year() {
        let data = series(vec![
            snapshot(2021, 1_000, 100, 600, 200, 100),
            snapshot(2022, 1_000, 100, 600, 200, 100),
            snapshot(2025, 1_000, 100, 600, 200, 200),
        ]);
        let metrics = TrendAnalyzer::default().analyze_region(&data);
        let expected = calculate_cagr(100.0, 200.0, 3) - calculate_cagr(100.0, 100.0, 1);
        assert!((metrics.old_old_acceleration - expected).abs() < 1e-9);
    }

    #[test]
    fn compares_to_national_reference() {
        let analyzer = TrendAnalyzer::default();
        let data = two_year_series();
        let metrics = analyzer.analyze_region(&data);
        let latest = &data[&2025];

        let comparison = analyzer.compare_to_reference(&metrics, latest, &ReferenceScope::National);
        assert_eq!(comparison.reference_type, "national");
        assert!((comparison.aging_ratio_diff - (latest.aging_ratio() - 19.2)).abs() < 1e-9);
        assert!((comparison.aging_velocity_diff - (metrics.aging_velocity - 4.2)).abs() < 1e-9);
        // |15.82 - 19.2| + |6.61 - 4.2| + |38.71 - 42.5| is about 9.6.
        assert_eq!(comparison.deviation_severity, DeviationSeverity::Elevated);
    }

    #[test]
    fn compares_to_region_reference() {
        let analyzer = TrendAnalyzer::default();
        let data = two_year_series();
        let metrics = analyzer.analyze_region(&data);
        let latest = &data[&2025];
        let values = ReferenceValues {
            aging_ratio: latest.aging_ratio(),
            old_old_ratio: latest.old_old_ratio(),
            aging_velocity: metrics.aging_velocity,
            dependency_ratio: latest.dependency_ratio(),
        };

        let comparison = analyzer.compare_to_reference(
            &metrics,
            latest,
            &ReferenceScope::Region {
                code: "1100000000".to_string(),
                values,
            },
        );
        assert_eq!(comparison.reference_type, "1100000000");
        assert_eq!(comparison.deviation_severity, DeviationSeverity::Normal);
    }

    #[test]
    fn severe_deviation() {
        let analyzer = TrendAnalyzer::default();
        let metrics = TrendMetrics::default();
        let latest = snapshot(2025, 1_000, 100, 400, 250, 250);
        let comparison = analyzer.compare_to_reference(&metrics, &latest, &ReferenceScope::National);
        assert_eq!(comparison.deviation_severity, DeviationSeverity::Severe);
    }

    #[test]
    fn national_reference_recalibrates() {
        let mut analyzer = TrendAnalyzer::default();
        let mut national = two_year_series();
        for s in national.values_mut() {
            s.region_code = "0000000000".to_string();
        }

        analyzer.set_national_reference(&national);
        let reference = *analyzer.reference();
        assert!((reference.aging_ratio - national[&2025].aging_ratio()).abs() < 1e-9);
        assert!((reference.aging_velocity - calculate_cagr(12_000.0, 15_500.0, 4)).abs() < 1e-9);

        // The region now matches the reference, so the velocity factor no
        // longer fires.
        let metrics = analyzer.analyze_region(&two_year_series());
        assert!(
            !metrics
                .urgency_factors
                .iter()
                .any(|f| f.starts_with("고령화속도"))
        );
    }

    #[test]
    fn ranking_is_stable_and_descending() {
        let analyzer = TrendAnalyzer::default();
        let mut all = RegionSeries::new();
        let fast = series(vec![
            snapshot(2021, 1_000, 100, 600, 200, 100),
            snapshot(2025, 1_000, 100, 600, 300, 200),
        ]);
        all.insert("1111000000".to_string(), two_year_series());
        all.insert("1122000000".to_string(), fast);
        all.insert("1133000000".to_string(), two_year_series());

        let ranked = analyzer.rank_regions(&all, RankBy::AgingVelocity);
        let codes: Vec<&str> = ranked.iter().map(|(code, _)| code.as_str()).collect();
        assert_eq!(codes, vec!["1122000000", "1111000000", "1133000000"]);

        let ranked = analyzer.rank_regions(&all, RankBy::UrgencyScore);
        let tied: Vec<&str> = ranked
            .iter()
            .map(|(code, _)| code.as_str())
            .filter(|code| *code != "1122000000")
            .collect();
        assert_eq!(tied, vec!["1111000000", "1133000000"]);
    }

    #[test]
    fn ranking_empty_set() {
        let analyzer = TrendAnalyzer::default();
        assert!(analyzer.rank_regions(&RegionSeries::new(), RankBy::default()).is_empty());
    }

    #[test]
    fn year_over_year_changes() {
        let data = series(vec![
            snapshot(2021, 1_000, 100, 600, 200, 100),
            snapshot(2023, 900, 80, 500, 200, 120),
            snapshot(2024, 950, 80, 530, 210, 130),
        ]);
        let changes = TrendAnalyzer::default().get_year_over_year(&data);
        assert_eq!(changes.len(), 2);

        assert_eq!(changes[0].prev_year, 2021);
        assert_eq!(changes[0].year, 2023);
        assert_eq!(changes[0].population_change, -100);
        assert!((changes[0].population_change_pct + 10.0).abs() < 1e-9);
        assert_eq!(changes[0].elderly_change, 20);
        assert_eq!(changes[0].old_old_change, 20);

        assert_eq!(changes[1].population_change, 50);
        assert_eq!(changes[1].elderly_change, 20);
    }

    #[test]
    fn anomalies_use_configured_language() {
        let analyzer = TrendAnalyzer::new(AnalysisConfig {
            language: Language::En,
            ..AnalysisConfig::default()
        });
        let metrics = TrendMetrics {
            aging_velocity: 9.0,
            ..TrendMetrics::default()
        };
        assert_eq!(
            analyzer.detect_anomalies(&metrics),
            vec!["RAPID_AGING: Very rapid aging under way".to_string()]
        );
    }

    #[test]
    fn empty_years_fall_back_to_defaults() {
        let analyzer = TrendAnalyzer::new(AnalysisConfig {
            analysis_years: vec![],
            ..AnalysisConfig::default()
        });
        assert_eq!(analyzer.start_year(), 2021);
        assert_eq!(analyzer.end_year(), 2025);
    }
}

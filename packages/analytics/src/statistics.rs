//! Cross-region summary statistics.

use std::collections::BTreeMap;

use aging_map_analytics_models::{
    DistributionStats, SummaryStatistics, TrendMetrics, UrgencyLevel, UrgencyScoreStats,
};

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
#[allow(clippy::cast_precision_loss)]
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Percentile with linear interpolation between closest ranks.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = pct / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let fraction = rank - rank.floor();
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}

/// Summarizes aging velocity and urgency across regions.
///
/// Returns `None` for an empty input.
#[must_use]
pub fn get_summary_statistics(metrics: &[TrendMetrics]) -> Option<SummaryStatistics> {
    if metrics.is_empty() {
        return None;
    }

    let velocities: Vec<f64> = metrics.iter().map(|m| m.aging_velocity).collect();
    let urgencies: Vec<f64> = metrics.iter().map(|m| m.urgency_score).collect();
    let sorted_velocities = sorted(&velocities);
    let sorted_urgencies = sorted(&urgencies);

    let mut urgency_distribution: BTreeMap<UrgencyLevel, usize> =
        UrgencyLevel::all().iter().map(|level| (*level, 0)).collect();
    for m in metrics {
        *urgency_distribution.entry(m.urgency_level).or_insert(0) += 1;
    }

    Some(SummaryStatistics {
        total_regions: metrics.len(),
        aging_velocity: DistributionStats {
            mean: mean(&velocities),
            median: median(&sorted_velocities),
            std: std_dev(&velocities),
            min: sorted_velocities[0],
            max: sorted_velocities[sorted_velocities.len() - 1],
        },
        urgency_distribution,
        urgency_scores: UrgencyScoreStats {
            mean: mean(&urgencies),
            median: median(&sorted_urgencies),
            top_10_threshold: percentile(&sorted_urgencies, 90.0),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(velocity: f64, score: f64, level: UrgencyLevel) -> TrendMetrics {
        TrendMetrics {
            aging_velocity: velocity,
            urgency_score: score,
            urgency_level: level,
            ..TrendMetrics::default()
        }
    }

    #[test]
    fn empty_input_has_no_statistics() {
        assert!(get_summary_statistics(&[]).is_none());
    }

    #[test]
    fn summarizes_regions() {
        let all = vec![
            metrics(4.0, 10.0, UrgencyLevel::Low),
            metrics(1.0, 90.0, UrgencyLevel::Critical),
            metrics(3.0, 50.0, UrgencyLevel::Elevated),
            metrics(2.0, 30.0, UrgencyLevel::Moderate),
        ];

        let stats = get_summary_statistics(&all).unwrap();
        assert_eq!(stats.total_regions, 4);
        assert!((stats.aging_velocity.mean - 2.5).abs() < 1e-9);
        assert!((stats.aging_velocity.median - 2.5).abs() < 1e-9);
        assert!((stats.aging_velocity.std - 1.25_f64.sqrt()).abs() < 1e-9);
        assert!((stats.aging_velocity.min - 1.0).abs() < f64::EPSILON);
        assert!((stats.aging_velocity.max - 4.0).abs() < f64::EPSILON);

        assert_eq!(stats.urgency_distribution.len(), 5);
        assert_eq!(stats.urgency_distribution[&UrgencyLevel::High], 0);
        assert_eq!(stats.urgency_distribution[&UrgencyLevel::Critical], 1);

        assert!((stats.urgency_scores.mean - 45.0).abs() < 1e-9);
        assert!((stats.urgency_scores.median - 40.0).abs() < 1e-9);
        // Sorted [10, 30, 50, 90]: rank 2.7 -> 50 + 0.7 * 40.
        assert!((stats.urgency_scores.top_10_threshold - 78.0).abs() < 1e-9);
    }

    #[test]
    fn single_region() {
        let stats = get_summary_statistics(&[metrics(3.0, 42.0, UrgencyLevel::Elevated)]).unwrap();
        assert!(stats.aging_velocity.std.abs() < f64::EPSILON);
        assert!((stats.urgency_scores.top_10_threshold - 42.0).abs() < f64::EPSILON);
    }
}

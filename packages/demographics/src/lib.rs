#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Demographic classification.
//!
//! Turns heterogeneous raw population rows into canonical
//! [`DemographicSnapshot`]s grouped by welfare cluster. Aggregate rows are
//! filtered out before classification and malformed rows are skipped.

pub mod age;
pub mod parsing;
pub mod processor;

use aging_map_demographics_models::{
    ClusterSummary, DemographicSnapshot, RegionSeries, SnapshotRow, WelfareCluster,
};

pub use processor::DemographicProcessor;

/// Per-cluster population breakdown of a snapshot, in age order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cluster_summary(snapshot: &DemographicSnapshot) -> Vec<ClusterSummary> {
    WelfareCluster::all()
        .iter()
        .map(|&cluster| {
            let population = snapshot.cluster(cluster);
            let ratio = if snapshot.total_population == 0 {
                0.0
            } else {
                population as f64 / snapshot.total_population as f64 * 100.0
            };
            ClusterSummary {
                cluster,
                korean_name: cluster.korean_name().to_string(),
                focus_area: cluster.focus_area().to_string(),
                age_range: cluster.range_label(),
                population,
                male: snapshot.male_by_cluster.get(&cluster).copied().unwrap_or(0),
                female: snapshot.female_by_cluster.get(&cluster).copied().unwrap_or(0),
                ratio,
            }
        })
        .collect()
}

/// Flattens every snapshot into export rows ordered by region code, then
/// year.
#[must_use]
pub fn to_rows(series: &RegionSeries) -> Vec<SnapshotRow> {
    series
        .values()
        .flat_map(|years| years.values().map(SnapshotRow::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_covers_every_cluster() {
        let mut snapshot = DemographicSnapshot::new("1168000000", "강남구", 2021);
        snapshot.total_population = 1000;
        snapshot.children_youth = 150;
        snapshot.productive = 650;
        snapshot.young_old = 120;
        snapshot.old_old = 80;
        snapshot.female_by_cluster.insert(WelfareCluster::OldOld, 50);

        let summary = cluster_summary(&snapshot);
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].korean_name, "아동·청소년");
        assert!((summary[1].ratio - 65.0).abs() < 1e-9);
        assert_eq!(summary[3].age_range, "75세 이상");
        assert_eq!(summary[3].female, 50);
        assert_eq!(summary[3].male, 0);
    }

    #[test]
    fn summary_of_empty_snapshot() {
        let snapshot = DemographicSnapshot::new("1168000000", "강남구", 2021);
        assert!(cluster_summary(&snapshot).iter().all(|s| s.ratio.abs() < f64::EPSILON));
    }

    #[test]
    fn rows_are_ordered() {
        let mut series = RegionSeries::new();
        for (code, year) in [("1168000000", 2022), ("1165000000", 2021), ("1168000000", 2021)] {
            series
                .entry(code.to_string())
                .or_default()
                .insert(year, DemographicSnapshot::new(code, "", year));
        }

        let keys: Vec<(String, i32)> = to_rows(&series)
            .into_iter()
            .map(|r| (r.region_code, r.year))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("1165000000".to_string(), 2021),
                ("1168000000".to_string(), 2021),
                ("1168000000".to_string(), 2022),
            ]
        );
    }
}

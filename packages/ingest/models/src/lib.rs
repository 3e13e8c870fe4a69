#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion configuration, reporting, and cache record types.

use std::collections::BTreeMap;

use aging_map_demographics_models::{DemographicSnapshot, WelfareCluster};
use serde::{Deserialize, Serialize};

/// Names of the CSV columns holding each logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub region_code: String,
    pub region_name: String,
    pub year: String,
    pub age_group: String,
    /// Rows are treated as both-gender totals when absent.
    pub gender: Option<String>,
    pub population: String,
}

impl ColumnMapping {
    /// Standard Korean statistical-office headers.
    #[must_use]
    pub fn korean() -> Self {
        Self {
            region_code: "행정구역코드".to_string(),
            region_name: "행정구역".to_string(),
            year: "시점".to_string(),
            age_group: "연령".to_string(),
            gender: Some("성별".to_string()),
            population: "인구수".to_string(),
        }
    }

    /// Short English headers.
    #[must_use]
    pub fn simple() -> Self {
        Self {
            region_code: "code".to_string(),
            region_name: "name".to_string(),
            year: "year".to_string(),
            age_group: "age".to_string(),
            gender: Some("sex".to_string()),
            population: "pop".to_string(),
        }
    }

    /// Column names that must be present.
    #[must_use]
    pub fn required(&self) -> [&str; 5] {
        [
            self.region_code.as_str(),
            self.region_name.as_str(),
            self.year.as_str(),
            self.age_group.as_str(),
            self.population.as_str(),
        ]
    }
}

/// Outcome of loading one CSV file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows read from the file.
    pub total_rows: u64,
    /// Rows converted into population records.
    pub loaded_rows: u64,
    /// Rows dropped as unreadable.
    pub skipped_rows: u64,
}

/// Raw snapshot fields as persisted in the JSON cache.
///
/// Derived ratios are never stored. The per-cluster maps and age
/// distribution default to empty so minimal cache files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub region_code: String,
    pub region_name: String,
    pub year: i32,
    #[serde(default)]
    pub total_population: u64,
    #[serde(default)]
    pub male_population: u64,
    #[serde(default)]
    pub female_population: u64,
    #[serde(default)]
    pub children_youth: u64,
    #[serde(default)]
    pub productive: u64,
    #[serde(default)]
    pub young_old: u64,
    #[serde(default)]
    pub old_old: u64,
    #[serde(default)]
    pub male_by_cluster: BTreeMap<WelfareCluster, u64>,
    #[serde(default)]
    pub female_by_cluster: BTreeMap<WelfareCluster, u64>,
    #[serde(default)]
    pub age_distribution: BTreeMap<String, u64>,
}

impl From<&DemographicSnapshot> for CachedSnapshot {
    fn from(s: &DemographicSnapshot) -> Self {
        Self {
            region_code: s.region_code.clone(),
            region_name: s.region_name.clone(),
            year: s.year,
            total_population: s.total_population,
            male_population: s.male_population,
            female_population: s.female_population,
            children_youth: s.children_youth,
            productive: s.productive,
            young_old: s.young_old,
            old_old: s.old_old,
            male_by_cluster: s.male_by_cluster.clone(),
            female_by_cluster: s.female_by_cluster.clone(),
            age_distribution: s.age_distribution.clone(),
        }
    }
}

impl From<CachedSnapshot> for DemographicSnapshot {
    fn from(c: CachedSnapshot) -> Self {
        Self {
            region_code: c.region_code,
            region_name: c.region_name,
            year: c.year,
            total_population: c.total_population,
            male_population: c.male_population,
            female_population: c.female_population,
            children_youth: c.children_youth,
            productive: c.productive,
            young_old: c.young_old,
            old_old: c.old_old,
            male_by_cluster: c.male_by_cluster,
            female_by_cluster: c.female_by_cluster,
            age_distribution: c.age_distribution,
        }
    }
}

/// Cache file layout: region code, then year as a string, then the raw
/// snapshot fields.
pub type CacheFile = BTreeMap<String, BTreeMap<String, CachedSnapshot>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_columns() {
        assert_eq!(
            ColumnMapping::simple().required(),
            ["code", "name", "year", "age", "pop"]
        );
    }

    #[test]
    fn minimal_cache_record_loads() {
        let json = r#"{
            "region_code": "1168000000",
            "region_name": "서울 강남구",
            "year": 2021,
            "total_population": 100,
            "young_old": 10,
            "old_old": 5
        }"#;

        let cached: CachedSnapshot = serde_json::from_str(json).unwrap();
        let snapshot = DemographicSnapshot::from(cached);
        assert_eq!(snapshot.elderly_total(), 15);
        assert!(snapshot.male_by_cluster.is_empty());
        assert!((snapshot.aging_ratio() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn cache_record_has_no_derived_fields() {
        let snapshot = DemographicSnapshot::new("1168000000", "강남구", 2021);
        let json = serde_json::to_value(CachedSnapshot::from(&snapshot)).unwrap();
        assert!(json.get("aging_ratio").is_none());
        assert!(json.get("elderly_total").is_none());
        assert_eq!(json["male_by_cluster"]["children_youth"], 0);
    }
}

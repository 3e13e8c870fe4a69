#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Welfare cluster taxonomy and demographic snapshot types.
//!
//! Every data source normalizes its age/gender/population rows into
//! [`DemographicSnapshot`]s keyed by region code and year. Ratios are
//! derived from the raw counts on demand and never stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Upper age used for open-ended labels such as `75세 이상` or `85+`.
pub const OPEN_ENDED_AGE: u32 = 120;

/// Welfare-oriented age bands.
///
/// The four bands are ordered, non-overlapping, and together cover every
/// non-negative age.
#[derive(
    Debug,
    Clone,
    Copy,
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WelfareCluster {
    /// Ages 0-18: development and protection
    ChildrenYouth,
    /// Ages 19-64: employment and family support
    Productive,
    /// Ages 65-74: active participation
    YoungOld,
    /// Ages 75 and over: intensive care
    OldOld,
}

impl WelfareCluster {
    /// Returns every cluster in age order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ChildrenYouth,
            Self::Productive,
            Self::YoungOld,
            Self::OldOld,
        ]
    }

    /// Inclusive `(min, max)` ages covered by this cluster.
    ///
    /// The last band is unbounded and reports `u32::MAX` as its upper age.
    #[must_use]
    pub const fn bounds(self) -> (u32, u32) {
        match self {
            Self::ChildrenYouth => (0, 18),
            Self::Productive => (19, 64),
            Self::YoungOld => (65, 74),
            Self::OldOld => (75, u32::MAX),
        }
    }

    /// Korean display name.
    #[must_use]
    pub const fn korean_name(self) -> &'static str {
        match self {
            Self::ChildrenYouth => "아동·청소년",
            Self::Productive => "생산가능인구",
            Self::YoungOld => "전기고령",
            Self::OldOld => "후기고령",
        }
    }

    /// Primary welfare focus for the cluster.
    #[must_use]
    pub const fn focus_area(self) -> &'static str {
        match self {
            Self::ChildrenYouth => "발달 및 보호",
            Self::Productive => "고용 및 가족지원",
            Self::YoungOld => "사회참여 활성화",
            Self::OldOld => "집중돌봄",
        }
    }

    /// Age range as display text, e.g. `19-64세` or `75세 이상`.
    #[must_use]
    pub fn range_label(self) -> String {
        match self.bounds() {
            (min, u32::MAX) => format!("{min}세 이상"),
            (min, max) => format!("{min}-{max}세"),
        }
    }
}

/// Gender of a raw population row.
///
/// `Both` covers rows whose gender label is an aggregate (e.g. `계`) or
/// anything unrecognized.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Both genders combined
    Both,
}

const MALE_TOKENS: &[&str] = &["남", "남자", "male", "m"];
const FEMALE_TOKENS: &[&str] = &["여", "여자", "female", "f"];

impl Gender {
    /// Maps a raw gender label to a [`Gender`].
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything that is not a recognized male or female token is treated
    /// as an already-aggregated row and maps to [`Gender::Both`].
    #[must_use]
    pub fn from_label(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if MALE_TOKENS.contains(&lower.as_str()) {
            Self::Male
        } else if FEMALE_TOKENS.contains(&lower.as_str()) {
            Self::Female
        } else {
            Self::Both
        }
    }
}

/// An inclusive age range parsed from an age-group label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgeRange {
    /// Youngest age in the range
    pub min: u32,
    /// Oldest age in the range
    pub max: u32,
}

impl AgeRange {
    /// Creates a range, returning `None` if `min > max`.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Option<Self> {
        if min > max {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Number of whole ages covered.
    #[must_use]
    pub const fn span(self) -> u64 {
        self.max as u64 - self.min as u64 + 1
    }
}

/// One raw statistical row: a population count for a region, year, age
/// group, and gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    /// Region display name
    pub region_name: String,
    /// Administrative code as given by the source (normalized later)
    pub region_code: String,
    /// Reference year
    pub year: i32,
    /// Age-group label, e.g. `0~4세`
    pub age_group: String,
    /// Row gender
    pub gender: Gender,
    /// Population count
    pub population: u64,
}

/// Population structure of one region in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicSnapshot {
    /// Normalized 10-character region code
    pub region_code: String,
    /// Region display name
    pub region_name: String,
    /// Reference year
    pub year: i32,
    /// Total population
    pub total_population: u64,
    /// Male population
    pub male_population: u64,
    /// Female population
    pub female_population: u64,
    /// Ages 0-18
    pub children_youth: u64,
    /// Ages 19-64
    pub productive: u64,
    /// Ages 65-74
    pub young_old: u64,
    /// Ages 75+
    pub old_old: u64,
    /// Male population per cluster
    pub male_by_cluster: BTreeMap<WelfareCluster, u64>,
    /// Female population per cluster
    pub female_by_cluster: BTreeMap<WelfareCluster, u64>,
    /// Population per source age-group label
    pub age_distribution: BTreeMap<String, u64>,
}

#[allow(clippy::cast_precision_loss)]
fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

impl DemographicSnapshot {
    /// Creates an empty snapshot with zeroed per-cluster gender maps.
    #[must_use]
    pub fn new(region_code: impl Into<String>, region_name: impl Into<String>, year: i32) -> Self {
        let zeroed: BTreeMap<WelfareCluster, u64> =
            WelfareCluster::all().iter().map(|c| (*c, 0)).collect();
        Self {
            region_code: region_code.into(),
            region_name: region_name.into(),
            year,
            total_population: 0,
            male_population: 0,
            female_population: 0,
            children_youth: 0,
            productive: 0,
            young_old: 0,
            old_old: 0,
            male_by_cluster: zeroed.clone(),
            female_by_cluster: zeroed,
            age_distribution: BTreeMap::new(),
        }
    }

    /// Population in `cluster`.
    #[must_use]
    pub const fn cluster(&self, cluster: WelfareCluster) -> u64 {
        match cluster {
            WelfareCluster::ChildrenYouth => self.children_youth,
            WelfareCluster::Productive => self.productive,
            WelfareCluster::YoungOld => self.young_old,
            WelfareCluster::OldOld => self.old_old,
        }
    }

    /// Mutable access to the population counter for `cluster`.
    pub const fn cluster_mut(&mut self, cluster: WelfareCluster) -> &mut u64 {
        match cluster {
            WelfareCluster::ChildrenYouth => &mut self.children_youth,
            WelfareCluster::Productive => &mut self.productive,
            WelfareCluster::YoungOld => &mut self.young_old,
            WelfareCluster::OldOld => &mut self.old_old,
        }
    }

    /// Population aged 65 and over.
    #[must_use]
    pub const fn elderly_total(&self) -> u64 {
        self.young_old.saturating_add(self.old_old)
    }

    /// Elderly share of the total population, in percent.
    #[must_use]
    pub fn aging_ratio(&self) -> f64 {
        percent(self.elderly_total(), self.total_population)
    }

    /// Share of the elderly aged 75 and over, in percent.
    #[must_use]
    pub fn old_old_ratio(&self) -> f64 {
        percent(self.old_old, self.elderly_total())
    }

    /// Dependants (children and elderly) per 100 productive-age people.
    #[must_use]
    pub fn dependency_ratio(&self) -> f64 {
        percent(
            self.children_youth.saturating_add(self.elderly_total()),
            self.productive,
        )
    }

    /// Children and youth share of the total population, in percent.
    #[must_use]
    pub fn youth_ratio(&self) -> f64 {
        percent(self.children_youth, self.total_population)
    }

    /// Males per 100 females.
    #[must_use]
    pub fn gender_ratio(&self) -> f64 {
        percent(self.male_population, self.female_population)
    }
}

/// Snapshots of one region keyed by year, iterated in ascending year order.
pub type TimeSeries = BTreeMap<i32, DemographicSnapshot>;

/// Time series of every region keyed by normalized region code.
pub type RegionSeries = BTreeMap<String, TimeSeries>;

/// Per-cluster breakdown of a snapshot for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Cluster being described
    pub cluster: WelfareCluster,
    /// Korean display name
    pub korean_name: String,
    /// Welfare focus area
    pub focus_area: String,
    /// Age range display text
    pub age_range: String,
    /// Cluster population
    pub population: u64,
    /// Male population in the cluster
    pub male: u64,
    /// Female population in the cluster
    pub female: u64,
    /// Share of the total population, in percent
    pub ratio: f64,
}

/// Flat export row combining raw and derived snapshot fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub region_code: String,
    pub region_name: String,
    pub year: i32,
    pub total_population: u64,
    pub male_population: u64,
    pub female_population: u64,
    pub children_youth: u64,
    pub productive: u64,
    pub young_old: u64,
    pub old_old: u64,
    pub elderly_total: u64,
    pub aging_ratio: f64,
    pub old_old_ratio: f64,
    pub dependency_ratio: f64,
    pub youth_ratio: f64,
}

impl From<&DemographicSnapshot> for SnapshotRow {
    fn from(snapshot: &DemographicSnapshot) -> Self {
        Self {
            region_code: snapshot.region_code.clone(),
            region_name: snapshot.region_name.clone(),
            year: snapshot.year,
            total_population: snapshot.total_population,
            male_population: snapshot.male_population,
            female_population: snapshot.female_population,
            children_youth: snapshot.children_youth,
            productive: snapshot.productive,
            young_old: snapshot.young_old,
            old_old: snapshot.old_old,
            elderly_total: snapshot.elderly_total(),
            aging_ratio: snapshot.aging_ratio(),
            old_old_ratio: snapshot.old_old_ratio(),
            dependency_ratio: snapshot.dependency_ratio(),
            youth_ratio: snapshot.youth_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_cover_every_age() {
        for age in 0..=200 {
            let hits = WelfareCluster::all()
                .iter()
                .filter(|c| {
                    let (min, max) = c.bounds();
                    (min..=max).contains(&age)
                })
                .count();
            assert_eq!(hits, 1, "age {age} matched {hits} clusters");
        }
        assert_eq!(WelfareCluster::OldOld.bounds().1, u32::MAX);
    }

    #[test]
    fn cluster_string_roundtrip() {
        for cluster in WelfareCluster::all() {
            let s = cluster.to_string();
            let parsed: WelfareCluster = s.parse().unwrap();
            assert_eq!(*cluster, parsed);
        }
        assert_eq!(WelfareCluster::ChildrenYouth.as_ref(), "children_youth");
    }

    #[test]
    fn cluster_serializes_as_map_key() {
        let snapshot = DemographicSnapshot::new("1100000000", "서울특별시", 2021);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["male_by_cluster"]["old_old"], 0);
    }

    #[test]
    fn range_labels() {
        assert_eq!(WelfareCluster::Productive.range_label(), "19-64세");
        assert_eq!(WelfareCluster::OldOld.range_label(), "75세 이상");
    }

    #[test]
    fn gender_labels() {
        for label in ["남", "남자", "Male", " M ", "male"] {
            assert_eq!(Gender::from_label(label), Gender::Male, "{label}");
        }
        for label in ["여", "여자", "FEMALE", "f"] {
            assert_eq!(Gender::from_label(label), Gender::Female, "{label}");
        }
        for label in ["계", "전체", "", "unknown"] {
            assert_eq!(Gender::from_label(label), Gender::Both, "{label}");
        }
    }

    #[test]
    fn age_range_rejects_inverted() {
        assert_eq!(AgeRange::new(10, 5), None);
        assert_eq!(AgeRange::new(5, 5).unwrap().span(), 1);
        assert_eq!(AgeRange::new(0, 120).unwrap().span(), 121);
    }

    #[test]
    fn ratios_are_zero_on_empty_denominators() {
        let snapshot = DemographicSnapshot::new("1100000000", "서울특별시", 2021);
        assert!(snapshot.aging_ratio().abs() < f64::EPSILON);
        assert!(snapshot.old_old_ratio().abs() < f64::EPSILON);
        assert!(snapshot.dependency_ratio().abs() < f64::EPSILON);
        assert!(snapshot.youth_ratio().abs() < f64::EPSILON);
        assert!(snapshot.gender_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn derived_ratios() {
        let mut snapshot = DemographicSnapshot::new("1100000000", "서울특별시", 2021);
        snapshot.total_population = 100_000;
        snapshot.children_youth = 18_000;
        snapshot.productive = 70_000;
        snapshot.young_old = 8_000;
        snapshot.old_old = 4_000;
        snapshot.male_population = 49_000;
        snapshot.female_population = 51_000;

        assert_eq!(snapshot.elderly_total(), 12_000);
        assert!((snapshot.aging_ratio() - 12.0).abs() < 1e-9);
        assert!((snapshot.old_old_ratio() - 100.0 / 3.0).abs() < 1e-9);
        assert!((snapshot.dependency_ratio() - 30_000.0 / 700.0).abs() < 1e-9);
        assert!((snapshot.youth_ratio() - 18.0).abs() < 1e-9);
        assert!((snapshot.gender_ratio() - 49_000.0 / 510.0).abs() < 1e-9);
    }

    #[test]
    fn cluster_accessors_agree() {
        let mut snapshot = DemographicSnapshot::new("1100000000", "서울특별시", 2021);
        for (i, cluster) in WelfareCluster::all().iter().enumerate() {
            *snapshot.cluster_mut(*cluster) += (i as u64 + 1) * 10;
        }
        assert_eq!(snapshot.children_youth, 10);
        assert_eq!(snapshot.old_old, 40);
        assert_eq!(snapshot.cluster(WelfareCluster::YoungOld), 30);
    }

    #[test]
    fn export_row_carries_derived_fields() {
        let mut snapshot = DemographicSnapshot::new("1168000000", "강남구", 2025);
        snapshot.total_population = 200;
        snapshot.young_old = 30;
        snapshot.old_old = 10;
        let row = SnapshotRow::from(&snapshot);
        assert_eq!(row.elderly_total, 40);
        assert!((row.aging_ratio - 20.0).abs() < 1e-9);
    }
}

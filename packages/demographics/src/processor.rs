//! Raw-row to snapshot construction.
//!
//! [`DemographicProcessor::process_rows`] filters aggregate rows, groups
//! the remainder by (region, year), and accumulates each group into a
//! [`DemographicSnapshot`]. Malformed rows are skipped, never fatal.

use std::collections::BTreeMap;

use aging_map_demographics_models::{
    DemographicSnapshot, Gender, PopulationRecord, RegionSeries, TimeSeries, WelfareCluster,
};
use aging_map_region::{HierarchyResolver, code, patterns::default_patterns};
use aging_map_region_models::AggregatePatterns;

use crate::age::{allocate_population, parse_age_label};

/// Builds [`DemographicSnapshot`]s from raw population rows.
#[derive(Debug, Clone)]
pub struct DemographicProcessor {
    patterns: AggregatePatterns,
}

impl Default for DemographicProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DemographicProcessor {
    /// Creates a processor using the default aggregate-label table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_patterns(default_patterns().clone())
    }

    /// Creates a processor with a custom aggregate-label table.
    #[must_use]
    pub const fn with_patterns(patterns: AggregatePatterns) -> Self {
        Self { patterns }
    }

    /// Returns `true` if `value` is a total/subtotal label.
    #[must_use]
    pub fn is_total_entry(&self, value: &str) -> bool {
        self.patterns.is_aggregate(value)
    }

    fn is_classifiable(&self, row: &PopulationRecord) -> bool {
        !self.is_total_entry(&row.region_name) && !self.is_total_entry(&row.age_group)
    }

    /// Classifies raw rows into per-region, per-year snapshots.
    ///
    /// Rows outside `analysis_years`, and rows whose region or age label is
    /// an aggregate, are dropped before grouping. Within a group the first
    /// row supplies the region name. Gendered rows accumulate into the
    /// gendered maps; `Both` rows accumulate into the cluster totals. A
    /// group with only gendered rows has its totals backfilled from the
    /// male and female counts.
    #[must_use]
    pub fn process_rows(&self, rows: &[PopulationRecord], analysis_years: &[i32]) -> RegionSeries {
        let mut groups: BTreeMap<(String, i32), DemographicSnapshot> = BTreeMap::new();
        let mut skipped_aggregates = 0_usize;
        let mut skipped_ages = 0_usize;

        for row in rows {
            if !analysis_years.contains(&row.year) {
                continue;
            }
            if !self.is_classifiable(row) {
                skipped_aggregates += 1;
                continue;
            }

            let region_code = code::normalize_width(&row.region_code);
            let snapshot = groups
                .entry((region_code.clone(), row.year))
                .or_insert_with(|| {
                    DemographicSnapshot::new(region_code, row.region_name.trim(), row.year)
                });

            let Some(range) = parse_age_label(&row.age_group) else {
                log::trace!("Skipping unparseable age label {:?}", row.age_group);
                skipped_ages += 1;
                continue;
            };

            add_count(
                snapshot
                    .age_distribution
                    .entry(row.age_group.trim().to_string())
                    .or_insert(0),
                row.population,
            );

            for (cluster, share) in allocate_population(row.population, range) {
                accumulate(snapshot, row.gender, cluster, share);
            }
        }

        let mut results = RegionSeries::new();
        for ((region_code, year), mut snapshot) in groups {
            backfill_totals(&mut snapshot);
            log::debug!(
                "Classified {region_code} {year}: total={} elderly={}",
                snapshot.total_population,
                snapshot.elderly_total()
            );
            results.entry(region_code).or_default().insert(year, snapshot);
        }

        log::info!(
            "Classified {} rows into {} regions ({skipped_aggregates} aggregate rows dropped, \
             {skipped_ages} unparseable age labels skipped)",
            rows.len(),
            results.len()
        );

        results
    }

    /// Sums child series into a parent series.
    ///
    /// Every analysis year gets a parent snapshot. Children with data for
    /// that year contribute their counts; children without it contribute
    /// zero, so a year no child covers yields an all-zero snapshot.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn aggregate_to_parent(
        &self,
        children: &[&TimeSeries],
        parent_code: &str,
        parent_name: &str,
        analysis_years: &[i32],
    ) -> TimeSeries {
        let parent_code = code::normalize_width(parent_code);
        let mut aggregated = TimeSeries::new();

        for &year in analysis_years {
            let mut parent = DemographicSnapshot::new(parent_code.clone(), parent_name, year);
            let mut contributors = 0_usize;

            for child in children.iter().filter_map(|series| series.get(&year)) {
                add_snapshot(&mut parent, child);
                contributors += 1;
            }

            log::debug!("Aggregated {contributors} children into {parent_code} for {year}");
            aggregated.insert(year, parent);
        }

        aggregated
    }

    /// Registers every first-seen (code, name) pair from non-aggregate rows.
    ///
    /// Regions are registered coarsest level first so hierarchical full
    /// names resolve against ancestors from the same batch. Returns the
    /// number of newly registered regions.
    pub fn register_regions(&self, rows: &[PopulationRecord], resolver: &mut HierarchyResolver) -> usize {
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for row in rows {
            if self.is_total_entry(&row.region_name) {
                continue;
            }
            seen.entry(code::normalize_width(&row.region_code))
                .or_insert_with(|| row.region_name.as_str());
        }

        let mut pending: Vec<(String, &str)> = seen
            .into_iter()
            .filter(|(region_code, _)| !resolver.contains(region_code))
            .collect();
        pending.sort_by_key(|(region_code, _)| code::level_of(region_code));

        for (region_code, name) in &pending {
            resolver.add_region(region_code, name, true, None);
        }

        log::debug!("Registered {} new regions", pending.len());
        pending.len()
    }
}

fn accumulate(
    snapshot: &mut DemographicSnapshot,
    gender: Gender,
    cluster: WelfareCluster,
    count: u64,
) {
    match gender {
        Gender::Male => {
            add_count(snapshot.male_by_cluster.entry(cluster).or_insert(0), count);
            add_count(&mut snapshot.male_population, count);
        }
        Gender::Female => {
            add_count(snapshot.female_by_cluster.entry(cluster).or_insert(0), count);
            add_count(&mut snapshot.female_population, count);
        }
        Gender::Both => {
            add_count(snapshot.cluster_mut(cluster), count);
            add_count(&mut snapshot.total_population, count);
        }
    }
}

fn backfill_totals(snapshot: &mut DemographicSnapshot) {
    if snapshot.total_population > 0
        || (snapshot.male_population == 0 && snapshot.female_population == 0)
    {
        return;
    }

    snapshot.total_population = snapshot
        .male_population
        .saturating_add(snapshot.female_population);
    for cluster in WelfareCluster::all() {
        let male = snapshot.male_by_cluster.get(cluster).copied().unwrap_or(0);
        let female = snapshot.female_by_cluster.get(cluster).copied().unwrap_or(0);
        *snapshot.cluster_mut(*cluster) = male.saturating_add(female);
    }
}

fn add_snapshot(parent: &mut DemographicSnapshot, child: &DemographicSnapshot) {
    add_count(&mut parent.total_population, child.total_population);
    add_count(&mut parent.male_population, child.male_population);
    add_count(&mut parent.female_population, child.female_population);

    for cluster in WelfareCluster::all() {
        add_count(parent.cluster_mut(*cluster), child.cluster(*cluster));
    }
    for (cluster, count) in &child.male_by_cluster {
        add_count(parent.male_by_cluster.entry(*cluster).or_insert(0), *count);
    }
    for (cluster, count) in &child.female_by_cluster {
        add_count(parent.female_by_cluster.entry(*cluster).or_insert(0), *count);
    }
    for (label, count) in &child.age_distribution {
        add_count(parent.age_distribution.entry(label.clone()).or_insert(0), *count);
    }
}

/// Counters saturate at `u64::MAX` instead of overflowing.
const fn add_count(counter: &mut u64, count: u64) {
    *counter = counter.saturating_add(count);
}

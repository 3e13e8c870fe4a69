//! Glue between loaded records, the hierarchy, and the snapshot series.

use std::collections::BTreeMap;

use aging_map_demographics::DemographicProcessor;
use aging_map_demographics_models::{PopulationRecord, RegionSeries, TimeSeries};
use aging_map_region::{HierarchyResolver, code};
use aging_map_region_models::AdminLevel;

/// Builds snapshot series from raw records and registers their regions.
///
/// With `aggregate` set, parents that have children in the data but no
/// rows of their own are filled in by summing those children, finest
/// level first.
pub fn build_series(
    processor: &DemographicProcessor,
    records: &[PopulationRecord],
    resolver: &mut HierarchyResolver,
    analysis_years: &[i32],
    aggregate: bool,
) -> RegionSeries {
    let registered = processor.register_regions(records, resolver);
    log::info!("Registered {registered} new regions");

    let mut series = processor.process_rows(records, analysis_years);
    if aggregate {
        let added = aggregate_parents(processor, &mut series, resolver, analysis_years);
        log::info!("Aggregated {added} parent regions from their children");
    }
    series
}

/// Adds missing secondary and primary series by summing their children.
///
/// Returns the number of parent series added.
pub fn aggregate_parents(
    processor: &DemographicProcessor,
    series: &mut RegionSeries,
    resolver: &HierarchyResolver,
    analysis_years: &[i32],
) -> usize {
    let mut added = 0;

    for level in [AdminLevel::Tertiary, AdminLevel::Secondary] {
        let mut by_parent: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for region_code in series.keys() {
            if code::level_of(region_code) != level {
                continue;
            }
            if let Some(parent) = code::get_parent_code(region_code) {
                by_parent.entry(parent).or_default().push(region_code);
            }
        }

        let mut parents = Vec::new();
        for (parent, children) in &by_parent {
            if series.contains_key(parent) {
                continue;
            }
            let children: Vec<&TimeSeries> =
                children.iter().filter_map(|c| series.get(*c)).collect();
            let name = resolver
                .get_region(parent)
                .map_or(parent.as_str(), |region| region.name.as_str());
            let aggregated =
                processor.aggregate_to_parent(&children, parent, name, analysis_years);
            if !aggregated.is_empty() {
                parents.push((parent.clone(), aggregated));
            }
        }

        added += parents.len();
        series.extend(parents);
    }

    added
}

/// The national series: taken as-is when present, otherwise summed from
/// the coarsest level available.
pub fn national_series(
    processor: &DemographicProcessor,
    series: &RegionSeries,
    analysis_years: &[i32],
) -> TimeSeries {
    let national_code = code::normalize_code("", AdminLevel::National);
    if let Some(national) = series.get(&national_code) {
        return national.clone();
    }

    for level in [AdminLevel::Primary, AdminLevel::Secondary, AdminLevel::Tertiary] {
        let children: Vec<&TimeSeries> = series
            .iter()
            .filter(|(region_code, _)| code::level_of(region_code) == level)
            .map(|(_, s)| s)
            .collect();
        if !children.is_empty() {
            log::debug!("Building national series from {} {level} regions", children.len());
            return processor.aggregate_to_parent(&children, &national_code, "전국", analysis_years);
        }
    }

    TimeSeries::new()
}

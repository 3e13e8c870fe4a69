#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the population aging analysis tool.

use std::path::PathBuf;
use std::time::Instant;

use aging_map_analytics::TrendAnalyzer;
use aging_map_analytics_models::{RankBy, ReferenceScope, ReferenceValues, TrendMetrics};
use aging_map_demographics::{DemographicProcessor, cluster_summary, to_rows};
use aging_map_demographics_models::{RegionSeries, TimeSeries};
use aging_map_ingest::{
    cache, load_aggregate_patterns, load_analysis_config, loader, paths, pipeline,
};
use aging_map_region::{HierarchyResolver, code};
use aging_map_region_models::AdminLevel;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aging_map_ingest", about = "Population aging analysis tool")]
struct Cli {
    /// Analysis config TOML. Uses the built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Aggregate-label pattern TOML. Uses the built-in table when omitted.
    #[arg(long, global = true)]
    patterns: Option<PathBuf>,
    /// Cache name under `$AGING_MAP_DATA_DIR/cache/`
    #[arg(long, global = true, default_value = "processed_data")]
    cache: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a population CSV and write the snapshot cache
    Load {
        /// CSV file with Korean (`행정구역코드`, ...) or simple (`code`, ...) headers
        csv: PathBuf,
        /// Fill in parent regions that have no rows of their own by summing
        /// their children
        #[arg(long)]
        aggregate: bool,
    },
    /// Rank cached regions, most urgent first
    Rank {
        /// Ranking key: `urgency_score`, `aging_velocity`, or `old_old_velocity`
        #[arg(long, default_value = "urgency_score")]
        by: RankBy,
        /// Number of regions to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show trend metrics, year-over-year changes, anomalies, and reference
    /// comparisons for one region as JSON
    Region {
        /// Region code (padded to 10 digits, e.g. "1168" for 강남구)
        code: String,
    },
    /// Print summary statistics across all cached regions as JSON
    Summary,
    /// Write every cached snapshot as a flat CSV row
    Export {
        /// Output CSV path
        #[arg(long)]
        output: PathBuf,
    },
}

/// Recalibrates the national reference from the cached regions.
fn calibrate_reference(
    analyzer: &mut TrendAnalyzer,
    processor: &DemographicProcessor,
    series: &RegionSeries,
) {
    let national = pipeline::national_series(processor, series, analyzer.analysis_years());
    if national.is_empty() {
        log::warn!("No national data in cache; keeping configured reference values");
    } else {
        analyzer.set_national_reference(&national);
    }
}

fn sub_national(series: &RegionSeries) -> impl Iterator<Item = (&String, &TimeSeries)> {
    series
        .iter()
        .filter(|(region_code, _)| code::level_of(region_code) != AdminLevel::National)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut analyzer = TrendAnalyzer::new(load_analysis_config(cli.config.as_deref())?);
    let patterns = load_aggregate_patterns(cli.patterns.as_deref())?;
    let processor = DemographicProcessor::with_patterns(patterns.clone());
    let cache_path = paths::cache_path(&cli.cache);

    match cli.command {
        Commands::Load { csv, aggregate } => {
            let start = Instant::now();
            let (records, report) = loader::load_csv(&csv, None)?;

            let mut resolver = HierarchyResolver::with_patterns(patterns);
            resolver.add_primary_divisions();
            let series = pipeline::build_series(
                &processor,
                &records,
                &mut resolver,
                analyzer.analysis_years(),
                aggregate,
            );
            cache::save_cache(&series, &cache_path)?;

            println!("{}", serde_json::to_string_pretty(&report)?);
            for (level, count) in resolver.get_statistics() {
                println!("{:<10} {count}", level.label());
            }
            log::info!(
                "Load complete: {} regions in {:.1}s",
                series.len(),
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Rank { by, limit } => {
            let series = cache::load_cache(&cache_path)?;
            calibrate_reference(&mut analyzer, &processor, &series);

            let ranked = analyzer.rank_regions(sub_national(&series), by);
            println!(
                "{:<4} {:<12} {:<20} {:>7} {:>9} {:>9}  LEVEL",
                "#", "CODE", "NAME", "SCORE", "AGING", "OLD-OLD"
            );
            println!("{}", "-".repeat(80));
            for (rank, (region_code, metrics)) in ranked.iter().take(limit).enumerate() {
                println!(
                    "{:<4} {:<12} {:<20} {:>7.1} {:>8.2}% {:>8.2}%  {}",
                    rank + 1,
                    region_code,
                    metrics.region_name,
                    metrics.urgency_score,
                    metrics.aging_velocity,
                    metrics.old_old_velocity,
                    metrics.urgency_level
                );
            }
        }
        Commands::Region { code: region_code } => {
            let series = cache::load_cache(&cache_path)?;
            calibrate_reference(&mut analyzer, &processor, &series);

            let region_code = code::normalize_width(&region_code);
            let region_series = series
                .get(&region_code)
                .ok_or_else(|| format!("Region {region_code} is not in the cache"))?;

            let metrics = analyzer.analyze_region(region_series);
            let latest = analyzer
                .available_years(region_series)
                .last()
                .and_then(|year| region_series.get(year));

            let clusters = latest.map(cluster_summary).unwrap_or_default();
            let mut comparisons = Vec::new();
            if let Some(latest) = latest {
                comparisons.push(analyzer.compare_to_reference(
                    &metrics,
                    latest,
                    &ReferenceScope::National,
                ));
                if let Some((parent, parent_series)) = code::get_parent_code(&region_code)
                    .and_then(|parent| series.get(&parent).map(|s| (parent, s)))
                {
                    let values = ReferenceValues::from_series(
                        parent_series,
                        analyzer.start_year(),
                        analyzer.end_year(),
                    );
                    comparisons.push(analyzer.compare_to_reference(
                        &metrics,
                        latest,
                        &ReferenceScope::Region {
                            code: parent,
                            values,
                        },
                    ));
                }
            }

            let report = serde_json::json!({
                "metrics": metrics,
                "clusters": clusters,
                "yearOverYear": analyzer.get_year_over_year(region_series),
                "anomalies": analyzer.detect_anomalies(&metrics),
                "comparisons": comparisons,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Summary => {
            let series = cache::load_cache(&cache_path)?;
            calibrate_reference(&mut analyzer, &processor, &series);

            let metrics: Vec<TrendMetrics> = analyzer
                .rank_regions(sub_national(&series), RankBy::UrgencyScore)
                .into_iter()
                .map(|(_, metrics)| metrics)
                .collect();

            match analyzer.get_summary_statistics(&metrics) {
                Some(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
                None => log::warn!("Cache {} holds no regions", cache_path.display()),
            }
        }
        Commands::Export { output } => {
            let series = cache::load_cache(&cache_path)?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                paths::ensure_dir(parent)?;
            }

            let rows = to_rows(&series);
            let mut writer = csv::Writer::from_path(&output)?;
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            log::info!("Exported {} rows to {}", rows.len(), output.display());
        }
    }

    Ok(())
}

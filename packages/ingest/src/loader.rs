//! CSV loading for raw population statistics.
//!
//! Headers are matched by name, so column order does not matter. Without
//! an explicit [`ColumnMapping`] the loader tries the statistical-office
//! Korean headers first and then the short English ones.

use std::io::Read;
use std::path::Path;

use aging_map_demographics::parsing::{parse_population, parse_year};
use aging_map_demographics_models::{Gender, PopulationRecord};
use aging_map_ingest_models::{ColumnMapping, LoadReport};

use crate::IngestError;

/// Column positions resolved against one header row.
struct ColumnIndex {
    region_code: usize,
    region_name: usize,
    year: usize,
    age_group: usize,
    gender: Option<usize>,
    population: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String], mapping: &ColumnMapping) -> Result<Self, IngestError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = mapping
            .required()
            .into_iter()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                message: missing.join(", "),
            });
        }

        let position = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            region_code: position(&mapping.region_code),
            region_name: position(&mapping.region_name),
            year: position(&mapping.year),
            age_group: position(&mapping.age_group),
            gender: mapping.gender.as_deref().and_then(find),
            population: position(&mapping.population),
        })
    }
}

/// Picks the built-in mapping whose required columns all appear in
/// `headers`.
#[must_use]
pub fn detect_mapping(headers: &[String]) -> Option<ColumnMapping> {
    [ColumnMapping::korean(), ColumnMapping::simple()]
        .into_iter()
        .find(|mapping| {
            mapping
                .required()
                .iter()
                .all(|name| headers.iter().any(|h| h == name))
        })
}

/// Loads population records from a CSV file.
///
/// # Errors
///
/// * If the file cannot be opened or read as CSV
/// * If the header lacks the mapped (or any detectable) columns
pub fn load_csv(
    path: &Path,
    mapping: Option<&ColumnMapping>,
) -> Result<(Vec<PopulationRecord>, LoadReport), IngestError> {
    log::info!("Loading population CSV {}", path.display());
    let file = std::fs::File::open(path)?;
    load_from_reader(file, mapping)
}

/// Loads population records from any CSV reader.
///
/// Rows whose year cannot be read are skipped and counted in the report.
/// An unreadable population becomes 0, and a missing gender column makes
/// every row a both-gender total.
///
/// # Errors
///
/// * If the input is not valid CSV
/// * If the header lacks the mapped (or any detectable) columns
pub fn load_from_reader<R: Read>(
    reader: R,
    mapping: Option<&ColumnMapping>,
) -> Result<(Vec<PopulationRecord>, LoadReport), IngestError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mapping = match mapping {
        Some(mapping) => mapping.clone(),
        None => detect_mapping(&headers).ok_or_else(|| IngestError::MissingColumns {
            message: format!("no known column layout in header [{}]", headers.join(", ")),
        })?,
    };
    let index = ColumnIndex::resolve(&headers, &mapping)?;
    log::debug!("Using column mapping {mapping:?}");

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in rdr.records() {
        let record = result?;
        report.total_rows += 1;

        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let Some(year) = parse_year(field(index.year)) else {
            log::trace!("Skipping row {}: unreadable year", report.total_rows);
            report.skipped_rows += 1;
            continue;
        };

        let region_code = field(index.region_code);
        if region_code.is_empty() {
            log::trace!("Skipping row {}: empty region code", report.total_rows);
            report.skipped_rows += 1;
            continue;
        }

        records.push(PopulationRecord {
            region_name: field(index.region_name).to_string(),
            region_code: region_code.to_string(),
            year,
            age_group: field(index.age_group).to_string(),
            gender: index
                .gender
                .map_or(Gender::Both, |i| Gender::from_label(field(i))),
            population: parse_population(field(index.population)),
        });
        report.loaded_rows += 1;
    }

    if report.skipped_rows > 0 {
        log::warn!(
            "Skipped {} of {} rows with unreadable year or region code",
            report.skipped_rows,
            report.total_rows
        );
    }
    log::info!(
        "Loaded {} population records ({} rows read)",
        report.loaded_rows,
        report.total_rows
    );

    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KOREAN_CSV: &str = "\u{feff}행정구역코드,행정구역,시점,연령,성별,인구수
1168000000,서울 강남구,2021,65~69세,남,\"12,345\"
1168000000,서울 강남구,2021 년,75세 이상,여자,9876
1168000000,서울 강남구,연도없음,0~4세,남,100
1168000000,서울 강남구,2022,0~4세,계,-
";

    #[test]
    fn loads_korean_headers_with_bom() {
        let (records, report) = load_from_reader(KOREAN_CSV.as_bytes(), None).unwrap();

        assert_eq!(
            report,
            LoadReport {
                total_rows: 4,
                loaded_rows: 3,
                skipped_rows: 1,
            }
        );
        assert_eq!(records[0].population, 12_345);
        assert_eq!(records[0].gender, Gender::Male);
        assert_eq!(records[1].year, 2021);
        assert_eq!(records[1].gender, Gender::Female);
        assert_eq!(records[2].gender, Gender::Both);
        assert_eq!(records[2].population, 0);
    }

    #[test]
    fn detects_simple_headers_in_any_order() {
        let csv = "pop,age,year,name,code\n500,65세,2023,홍천군,4273000000\n";
        let (records, report) = load_from_reader(csv.as_bytes(), None).unwrap();

        assert_eq!(report.loaded_rows, 1);
        assert_eq!(records[0].region_code, "4273000000");
        assert_eq!(records[0].region_name, "홍천군");
        assert_eq!(records[0].age_group, "65세");
        assert_eq!(records[0].gender, Gender::Both);
        assert_eq!(records[0].population, 500);
    }

    #[test]
    fn explicit_mapping() {
        let mapping = ColumnMapping {
            region_code: "adm_cd".to_string(),
            region_name: "adm_nm".to_string(),
            year: "yr".to_string(),
            age_group: "band".to_string(),
            gender: None,
            population: "count".to_string(),
        };
        let csv = "adm_cd,adm_nm,yr,band,count\n11,서울특별시,2025,80+,42\n";
        let (records, _) = load_from_reader(csv.as_bytes(), Some(&mapping)).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].age_group, "80+");
        assert_eq!(records[0].population, 42);
    }

    #[test]
    fn unknown_header_is_an_error() {
        let csv = "a,b,c\n1,2,3\n";
        let err = load_from_reader(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumns { .. }));
    }

    #[test]
    fn explicit_mapping_reports_missing_columns() {
        let csv = "code,name,year,age\n11,서울,2025,65세\n";
        let err = load_from_reader(csv.as_bytes(), Some(&ColumnMapping::simple())).unwrap_err();
        match err {
            IngestError::MissingColumns { message } => assert_eq!(message, "pop"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_rows_read_as_empty_fields() {
        let csv = "code,name,year,age,sex,pop\n1100000000,서울특별시,2024,65세\n";
        let (records, report) = load_from_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(records[0].gender, Gender::Both);
        assert_eq!(records[0].population, 0);
    }
}

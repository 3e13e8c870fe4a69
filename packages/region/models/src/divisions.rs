//! Primary division (시도) code table.
//!
//! Maps the two-digit primary segment of an H-Code to the current official
//! name of the 17 metropolitan cities and provinces.

/// Two-digit codes of the 17 primary divisions.
pub const PRIMARY_CODES: &[&str] = &[
    "11", "26", "27", "28", "29", "30", "31", "36", "41", "42", "43", "44", "45", "46", "47",
    "48", "50",
];

/// Maps a two-digit primary segment to the division's official name.
///
/// Returns `None` for unrecognized codes.
#[must_use]
pub fn primary_name(code: &str) -> Option<&'static str> {
    match code {
        "11" => Some("서울특별시"),
        "26" => Some("부산광역시"),
        "27" => Some("대구광역시"),
        "28" => Some("인천광역시"),
        "29" => Some("광주광역시"),
        "30" => Some("대전광역시"),
        "31" => Some("울산광역시"),
        "36" => Some("세종특별자치시"),
        "41" => Some("경기도"),
        // Renamed from 강원도 in 2023.
        "42" => Some("강원특별자치도"),
        "43" => Some("충청북도"),
        "44" => Some("충청남도"),
        // Renamed from 전라북도 in 2024.
        "45" => Some("전북특별자치도"),
        "46" => Some("전라남도"),
        "47" => Some("경상북도"),
        "48" => Some("경상남도"),
        "50" => Some("제주특별자치도"),
        _ => None,
    }
}

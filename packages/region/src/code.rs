//! H-Code grammar.
//!
//! A normalized code is exactly [`CODE_WIDTH`] characters: a 2-character
//! primary segment, a 3-character secondary segment, and a 5-character
//! tertiary segment. Short input is right-padded with [`FILL_DIGIT`] and
//! long input is truncated, so parsing never fails.

use aging_map_region_models::{
    AdminLevel, CODE_WIDTH, FILL_DIGIT, PRIMARY_WIDTH, ParsedCode, SECONDARY_PREFIX_WIDTH,
};

/// Normalizes `code` to exactly [`CODE_WIDTH`] characters.
///
/// Surrounding whitespace is trimmed first.
#[must_use]
pub fn normalize_width(code: &str) -> String {
    pad_prefix(code.trim(), CODE_WIDTH)
}

/// Keeps the first `width` characters of `code` and pads the rest with
/// [`FILL_DIGIT`].
fn pad_prefix(code: &str, width: usize) -> String {
    let mut out: String = code.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(FILL_DIGIT, CODE_WIDTH - len));
    out
}

fn is_zero(segment: &str) -> bool {
    segment.chars().all(|c| c == FILL_DIGIT)
}

/// Splits a code into its three segments and derives its level from the
/// finest non-zero segment.
#[must_use]
pub fn parse_code(code: &str) -> ParsedCode {
    let chars: Vec<char> = normalize_width(code).chars().collect();
    let primary: String = chars[..PRIMARY_WIDTH].iter().collect();
    let secondary: String = chars[PRIMARY_WIDTH..SECONDARY_PREFIX_WIDTH].iter().collect();
    let tertiary: String = chars[SECONDARY_PREFIX_WIDTH..].iter().collect();

    let level = if !is_zero(&tertiary) {
        AdminLevel::Tertiary
    } else if !is_zero(&secondary) {
        AdminLevel::Secondary
    } else if !is_zero(&primary) {
        AdminLevel::Primary
    } else {
        AdminLevel::National
    };

    ParsedCode {
        level,
        primary,
        secondary,
        tertiary,
    }
}

/// Returns the level of `code`.
#[must_use]
pub fn level_of(code: &str) -> AdminLevel {
    parse_code(code).level
}

/// Zeroes out every segment finer than `target_level`.
///
/// For example `normalize_code("1168010100", Secondary)` is `"1168000000"`.
#[must_use]
pub fn normalize_code(code: &str, target_level: AdminLevel) -> String {
    let code = normalize_width(code);
    match target_level {
        AdminLevel::National => pad_prefix("", CODE_WIDTH),
        AdminLevel::Primary => pad_prefix(&code, PRIMARY_WIDTH),
        AdminLevel::Secondary => pad_prefix(&code, SECONDARY_PREFIX_WIDTH),
        AdminLevel::Tertiary => code,
    }
}

/// Returns the code of the region directly containing `code`.
///
/// Primary divisions and the national code have no parent.
#[must_use]
pub fn get_parent_code(code: &str) -> Option<String> {
    match level_of(code) {
        AdminLevel::Tertiary => Some(normalize_code(code, AdminLevel::Secondary)),
        AdminLevel::Secondary => Some(normalize_code(code, AdminLevel::Primary)),
        AdminLevel::Primary | AdminLevel::National => None,
    }
}

//! Shared parsing utilities for raw statistical fields.

/// Parses a population count, stripping thousands separators and
/// whitespace.
///
/// Fractional values are truncated. Returns 0 for anything unparseable,
/// including negative numbers and placeholders such as `-` or `X`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_population(text: &str) -> u64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if let Ok(value) = cleaned.parse::<u64>() {
        return value;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value as u64,
        _ => 0,
    }
}

/// Parses a reference year from the leading four digits of `text`.
///
/// Accepts plain years (`2021`) and the period forms statistical tables
/// use (`2021.12`, `2021년`, `2021-12`).
#[must_use]
pub fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim();
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    digits.parse().ok()
}

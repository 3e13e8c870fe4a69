#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative region types.
//!
//! Regions are identified by a fixed-width 10-character H-Code whose
//! leading segments name the coarser divisions that contain it. The code
//! is the single source of truth for hierarchy: a region's level and parent
//! are always derived from it.

pub mod divisions;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Total width of a normalized region code.
pub const CODE_WIDTH: usize = 10;

/// Digit used to right-pad short codes and to zero out finer segments.
pub const FILL_DIGIT: char = '0';

/// Width of the primary-division segment (characters `0..2`).
pub const PRIMARY_WIDTH: usize = 2;

/// Width of the primary + secondary prefix (characters `0..5`).
pub const SECONDARY_PREFIX_WIDTH: usize = 5;

/// Administrative hierarchy level, from the whole country down to
/// neighborhoods.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminLevel {
    /// The whole country (all segments zero).
    National = 0,
    /// Metropolitan city or province (시도).
    Primary = 1,
    /// City, county, or district (시군구).
    Secondary = 2,
    /// Town, township, or neighborhood (읍면동).
    Tertiary = 3,
}

impl AdminLevel {
    /// Korean display label for this level.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::National => "전국",
            Self::Primary => "시도",
            Self::Secondary => "시군구",
            Self::Tertiary => "읍면동",
        }
    }

    /// Returns all variants of this enum, coarsest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::National, Self::Primary, Self::Secondary, Self::Tertiary]
    }
}

/// The result of splitting a normalized code into its positional segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCode {
    /// Finest level whose segment is non-zero.
    pub level: AdminLevel,
    /// Two-character primary segment.
    pub primary: String,
    /// Three-character secondary segment.
    pub secondary: String,
    /// Five-character tertiary segment.
    pub tertiary: String,
}

/// A registered administrative region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Normalized 10-character H-Code.
    pub code: String,
    /// Short display name (e.g. "강남구").
    pub name: String,
    /// Hierarchical display name (e.g. "서울특별시 강남구").
    pub name_full: String,
    /// Level derived from the code.
    pub level: AdminLevel,
    /// Cached parent code, derived from the code.
    pub parent_code: Option<String>,
    /// Whether the code is still in use.
    pub is_active: bool,
    /// Date the code was retired, if any.
    pub expired_date: Option<NaiveDate>,
}

/// How a [`LabelPattern`] is compared against a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Label ends with the pattern value.
    Suffix,
    /// Label starts with the pattern value.
    Prefix,
    /// Label equals the pattern value.
    Exact,
    /// Label contains the pattern value anywhere.
    Contains,
}

/// One entry of the aggregate-label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPattern {
    /// Comparison mode.
    pub kind: MatchKind,
    /// Text to compare against.
    pub value: String,
    /// Compare case-insensitively.
    #[serde(default)]
    pub ignore_case: bool,
}

impl LabelPattern {
    /// Returns `true` if `label` (already trimmed) matches this pattern.
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        if self.ignore_case {
            let label = label.to_lowercase();
            let value = self.value.to_lowercase();
            Self::compare(self.kind, &label, &value)
        } else {
            Self::compare(self.kind, label, &self.value)
        }
    }

    fn compare(kind: MatchKind, label: &str, value: &str) -> bool {
        match kind {
            MatchKind::Suffix => label.ends_with(value),
            MatchKind::Prefix => label.starts_with(value),
            MatchKind::Exact => label == value,
            MatchKind::Contains => label.contains(value),
        }
    }
}

/// Table of patterns identifying totals and subtotals ("계", "합계", ...)
/// in region and age-group labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatePatterns {
    /// Patterns checked in order; any match marks the label as an aggregate.
    #[serde(default)]
    pub patterns: Vec<LabelPattern>,
}

impl AggregatePatterns {
    /// Returns `true` if `label` matches any aggregate pattern.
    ///
    /// Surrounding whitespace is ignored. An empty label is never an
    /// aggregate.
    #[must_use]
    pub fn is_aggregate(&self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        self.patterns.iter().any(|p| p.matches(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(kind: MatchKind, value: &str, ignore_case: bool) -> LabelPattern {
        LabelPattern {
            kind,
            value: value.to_string(),
            ignore_case,
        }
    }

    #[test]
    fn match_kinds() {
        assert!(pattern(MatchKind::Suffix, "계", false).matches("서울 소계"));
        assert!(!pattern(MatchKind::Suffix, "계", false).matches("계양구청"));
        assert!(pattern(MatchKind::Prefix, "전국", false).matches("전국 합계"));
        assert!(pattern(MatchKind::Exact, "전국", false).matches("전국"));
        assert!(!pattern(MatchKind::Exact, "전국", false).matches("전국민"));
        assert!(pattern(MatchKind::Contains, "합계", false).matches("남녀 합계 인구"));
    }

    #[test]
    fn ignore_case() {
        let p = pattern(MatchKind::Contains, "total", true);
        assert!(p.matches("Grand TOTAL"));
        assert!(!pattern(MatchKind::Contains, "total", false).matches("TOTAL"));
    }

    #[test]
    fn empty_label_is_not_aggregate() {
        let table = AggregatePatterns {
            patterns: vec![pattern(MatchKind::Contains, "", false)],
        };
        assert!(!table.is_aggregate("   "));
    }

    #[test]
    fn level_ordering_follows_depth() {
        let depths: Vec<u8> = AdminLevel::all().iter().map(|l| *l as u8).collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
        assert!(AdminLevel::Primary < AdminLevel::Tertiary);
        assert_eq!(AdminLevel::Secondary.to_string(), "SECONDARY");
    }
}

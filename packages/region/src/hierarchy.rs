//! Region registry with parent/child indices.

use std::collections::BTreeMap;

use aging_map_region_models::{
    AdminLevel, AggregatePatterns, ParsedCode, Region, divisions::PRIMARY_CODES,
    divisions::primary_name,
};
use chrono::{Datelike, NaiveDate};

use crate::code;
use crate::patterns::default_patterns;

/// Number of years before the reference year after which a retired code is
/// dropped by [`HierarchyResolver::filter_active_regions`].
pub const EXPIRY_WINDOW_YEARS: i32 = 5;

/// Registry of administrative regions keyed by normalized H-Code.
///
/// Not internally synchronized: [`HierarchyResolver::add_region`] takes
/// `&mut self`, so sharing across threads needs an external lock.
#[derive(Debug, Clone)]
pub struct HierarchyResolver {
    regions: BTreeMap<String, Region>,
    /// primary code -> secondary codes, in registration order
    primary_index: BTreeMap<String, Vec<String>>,
    /// secondary code -> tertiary codes, in registration order
    secondary_index: BTreeMap<String, Vec<String>>,
    patterns: AggregatePatterns,
}

impl Default for HierarchyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyResolver {
    /// Creates an empty resolver using the default aggregate patterns.
    #[must_use]
    pub fn new() -> Self {
        Self::with_patterns(default_patterns().clone())
    }

    /// Creates an empty resolver with a custom aggregate-pattern table.
    #[must_use]
    pub const fn with_patterns(patterns: AggregatePatterns) -> Self {
        Self {
            regions: BTreeMap::new(),
            primary_index: BTreeMap::new(),
            secondary_index: BTreeMap::new(),
            patterns,
        }
    }

    /// Creates a resolver preloaded with the 17 primary divisions.
    #[must_use]
    pub fn with_primary_divisions() -> Self {
        let mut resolver = Self::new();
        resolver.add_primary_divisions();
        resolver
    }

    /// Registers the 17 primary divisions under their official names.
    pub fn add_primary_divisions(&mut self) {
        for prefix in PRIMARY_CODES {
            if let Some(name) = primary_name(prefix) {
                self.add_region(prefix, name, true, None);
            }
        }
    }

    /// See [`code::parse_code`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn parse_code(&self, code: &str) -> ParsedCode {
        code::parse_code(code)
    }

    /// See [`code::normalize_code`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn normalize_code(&self, code: &str, target_level: AdminLevel) -> String {
        code::normalize_code(code, target_level)
    }

    /// See [`code::get_parent_code`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn get_parent_code(&self, code: &str) -> Option<String> {
        code::get_parent_code(code)
    }

    /// Registers a region, deriving its level, parent, and full name from
    /// the code.
    ///
    /// Ancestors that are not yet registered contribute an empty name
    /// segment. Re-registering a code overwrites the previous entry without
    /// duplicating child-index entries.
    pub fn add_region(
        &mut self,
        code: &str,
        name: &str,
        is_active: bool,
        expired_date: Option<NaiveDate>,
    ) -> Region {
        let code = code::normalize_width(code);
        let parsed = code::parse_code(&code);
        let name = name.trim();

        let primary_code = code::normalize_code(&code, AdminLevel::Primary);
        let primary_label = self.name_of(&primary_code);

        let (name_full, parent_code) = match parsed.level {
            AdminLevel::Secondary => {
                push_unique(&mut self.primary_index, &primary_code, &code);
                (format!("{primary_label} {name}"), Some(primary_code))
            }
            AdminLevel::Tertiary => {
                let secondary_code = code::normalize_code(&code, AdminLevel::Secondary);
                let secondary_label = self.name_of(&secondary_code);
                push_unique(&mut self.secondary_index, &secondary_code, &code);
                (
                    format!("{primary_label} {secondary_label} {name}"),
                    Some(secondary_code),
                )
            }
            AdminLevel::Primary => {
                self.primary_index.entry(code.clone()).or_default();
                (name.to_string(), None)
            }
            AdminLevel::National => (name.to_string(), None),
        };

        let region = Region {
            code: code.clone(),
            name: name.to_string(),
            name_full,
            level: parsed.level,
            parent_code,
            is_active,
            expired_date,
        };

        log::trace!("Registered {} region {code} ({name})", parsed.level);
        self.regions.insert(code, region.clone());
        region
    }

    fn name_of(&self, code: &str) -> String {
        self.regions
            .get(code)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }

    /// Looks up a region by code (normalized before lookup).
    #[must_use]
    pub fn get_region(&self, code: &str) -> Option<&Region> {
        self.regions.get(&code::normalize_width(code))
    }

    /// Returns `true` if the code has been registered.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get_region(code).is_some()
    }

    /// Returns the codes of the direct children of `code`.
    #[must_use]
    pub fn get_children_codes(&self, code: &str) -> &[String] {
        let parsed = code::parse_code(code);
        let normalized = code::normalize_code(code, parsed.level);
        let index = match parsed.level {
            AdminLevel::Primary => &self.primary_index,
            AdminLevel::Secondary => &self.secondary_index,
            AdminLevel::National | AdminLevel::Tertiary => return &[],
        };
        index
            .get(&normalized)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Moves one level up: tertiary → secondary → primary → `None`.
    #[must_use]
    pub fn navigate_up(&self, code: &str) -> Option<&Region> {
        code::get_parent_code(code).and_then(|parent| self.get_region(&parent))
    }

    /// Returns the registered direct children of `code`.
    #[must_use]
    pub fn navigate_down(&self, code: &str) -> Vec<&Region> {
        self.get_children_codes(code)
            .iter()
            .filter_map(|c| self.regions.get(c))
            .collect()
    }

    /// Returns every region sharing `code`'s parent, including `code`
    /// itself.
    ///
    /// Primary divisions have no parent, so their siblings are all
    /// registered primary divisions.
    #[must_use]
    pub fn get_siblings(&self, code: &str) -> Vec<&Region> {
        if let Some(parent) = code::get_parent_code(code) {
            return self.navigate_down(&parent);
        }
        if code::level_of(code) == AdminLevel::Primary {
            return self.get_all_by_level(AdminLevel::Primary);
        }
        Vec::new()
    }

    /// Returns all registered regions at `level`, in code order.
    #[must_use]
    pub fn get_all_by_level(&self, level: AdminLevel) -> Vec<&Region> {
        self.regions.values().filter(|r| r.level == level).collect()
    }

    /// Returns the path from the outermost registered ancestor down to
    /// `code` inclusive. Empty if `code` is not registered.
    #[must_use]
    pub fn build_breadcrumb(&self, code: &str) -> Vec<&Region> {
        let mut breadcrumb = Vec::new();
        let mut current = self.get_region(code);

        while let Some(region) = current {
            breadcrumb.push(region);
            current = region
                .parent_code
                .as_deref()
                .and_then(|parent| self.regions.get(parent));
        }

        breadcrumb.reverse();
        breadcrumb
    }

    /// Case-insensitive substring search over short and full names,
    /// optionally restricted to one level. Sorted by (level, name).
    #[must_use]
    pub fn search_by_name(&self, query: &str, level: Option<AdminLevel>) -> Vec<&Region> {
        let query = query.to_lowercase();
        let mut results: Vec<&Region> = self
            .regions
            .values()
            .filter(|r| level.is_none_or(|l| r.level == l))
            .filter(|r| {
                r.name.to_lowercase().contains(&query)
                    || r.name_full.to_lowercase().contains(&query)
            })
            .collect();
        results.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        results
    }

    /// Returns `true` if `name` is an aggregate ("total") label under this
    /// resolver's pattern table.
    #[must_use]
    pub fn is_total_entry(&self, name: &str) -> bool {
        self.patterns.is_aggregate(name)
    }

    /// The aggregate-pattern table this resolver uses.
    #[must_use]
    pub const fn patterns(&self) -> &AggregatePatterns {
        &self.patterns
    }

    /// Drops unknown codes and codes retired more than
    /// [`EXPIRY_WINDOW_YEARS`] years before `reference_year`.
    ///
    /// Inactive regions without an expiry date are kept.
    #[must_use]
    pub fn filter_active_regions(&self, codes: &[String], reference_year: i32) -> Vec<String> {
        codes
            .iter()
            .filter(|c| {
                let Some(region) = self.get_region(c) else {
                    return false;
                };
                if region.is_active {
                    return true;
                }
                region
                    .expired_date
                    .is_none_or(|date| date.year() >= reference_year - EXPIRY_WINDOW_YEARS)
            })
            .cloned()
            .collect()
    }

    /// Counts registered regions per level. Every level is present.
    #[must_use]
    pub fn get_statistics(&self) -> BTreeMap<AdminLevel, usize> {
        let mut stats: BTreeMap<AdminLevel, usize> =
            AdminLevel::all().iter().map(|l| (*l, 0)).collect();
        for region in self.regions.values() {
            *stats.entry(region.level).or_default() += 1;
        }
        stats
    }

    /// Iterates every registered region in code order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of registered regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if no regions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn push_unique(index: &mut BTreeMap<String, Vec<String>>, parent: &str, child: &str) {
    let children = index.entry(parent.to_string()).or_default();
    if !children.iter().any(|c| c == child) {
        children.push(child.to_string());
    }
}

//! Age-group label grammar and welfare cluster classification.
//!
//! Source tables label age groups in several textual forms (`5세`,
//! `0~4세`, `15-19`, `20세~24세`, `75세 이상`, `85+`). Patterns are tried in
//! a fixed order: single ages and closed ranges first, open-ended forms last.

use std::sync::LazyLock;

use aging_map_demographics_models::{AgeRange, OPEN_ENDED_AGE, WelfareCluster};
use regex::Regex;

#[derive(Debug, Clone, Copy)]
enum LabelForm {
    Single,
    Closed,
    OpenEnded,
}

static AGE_PATTERNS: LazyLock<Vec<(Regex, LabelForm)>> = LazyLock::new(|| {
    [
        (r"^(\d+)세$", LabelForm::Single),
        (r"^(\d+)\s*[~-]\s*(\d+)\s*세?$", LabelForm::Closed),
        (r"^(\d+)세\s*[~-]\s*(\d+)세$", LabelForm::Closed),
        (r"^(\d+)\s*세?\s*이상$", LabelForm::OpenEnded),
        (r"^(\d+)\s*\+$", LabelForm::OpenEnded),
    ]
    .into_iter()
    .map(|(pattern, form)| {
        (
            Regex::new(pattern).unwrap_or_else(|_| unreachable!()),
            form,
        )
    })
    .collect()
});

/// Parses an age-group label into an inclusive [`AgeRange`].
///
/// Open-ended labels extend to [`OPEN_ENDED_AGE`]. Returns `None` for
/// unrecognized labels (including aggregate labels such as `계`), for
/// numbers that overflow, and for inverted ranges like `10~5세`.
#[must_use]
pub fn parse_age_label(text: &str) -> Option<AgeRange> {
    let text = text.trim();

    for (re, form) in AGE_PATTERNS.iter() {
        let Some(caps) = re.captures(text) else {
            continue;
        };
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;
        return match form {
            LabelForm::Single => AgeRange::new(first, first),
            LabelForm::Closed => {
                let last: u32 = caps.get(2)?.as_str().parse().ok()?;
                AgeRange::new(first, last)
            }
            LabelForm::OpenEnded => AgeRange::new(first, OPEN_ENDED_AGE.max(first)),
        };
    }

    None
}

/// Splits an age range across the welfare clusters it overlaps.
///
/// Each returned proportion is the number of whole ages shared with the
/// cluster divided by the number of whole ages in the range, so the
/// proportions of a valid range sum to 1. Returns an empty list when
/// `min_age > max_age`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify_age_range(min_age: u32, max_age: u32) -> Vec<(WelfareCluster, f64)> {
    let Some(range) = AgeRange::new(min_age, max_age) else {
        return Vec::new();
    };
    let span = range.span() as f64;

    cluster_overlaps(range)
        .map(|(cluster, overlap)| (cluster, overlap as f64 / span))
        .collect()
}

/// Allocates `population` across the clusters `range` overlaps.
///
/// Each share is `floor(population * overlap / span)`, computed in integer
/// arithmetic. Remainders are dropped, so the shares of a straddling range
/// may sum to slightly less than `population`.
#[must_use]
pub fn allocate_population(population: u64, range: AgeRange) -> Vec<(WelfareCluster, u64)> {
    let span = u128::from(range.span());

    cluster_overlaps(range)
        .map(|(cluster, overlap)| {
            let share = u128::from(population) * u128::from(overlap) / span;
            (cluster, u64::try_from(share).unwrap_or(u64::MAX))
        })
        .collect()
}

/// Yields `(cluster, overlapping whole ages)` for every cluster sharing at
/// least one age with `range`.
fn cluster_overlaps(range: AgeRange) -> impl Iterator<Item = (WelfareCluster, u64)> {
    WelfareCluster::all().iter().filter_map(move |cluster| {
        let (cluster_min, cluster_max) = cluster.bounds();
        let low = range.min.max(cluster_min);
        let high = range.max.min(cluster_max);
        (low <= high).then(|| (*cluster, u64::from(high) - u64::from(low) + 1))
    })
}

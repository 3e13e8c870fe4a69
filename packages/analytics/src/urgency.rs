//! Welfare urgency scoring.
//!
//! The score is a weighted sum of six components. Each component is first
//! clamped into `[0, 25]` and then scaled by `weight * 4`; the total is
//! capped at 100.

use aging_map_analytics_models::{
    Language, ReferenceValues, TrendMetrics, UrgencyLevel, UrgencyWeights,
};
use aging_map_demographics_models::DemographicSnapshot;
use num_format::{Locale, ToFormattedString};

const COMPONENT_CAP: f64 = 25.0;
const MAX_SCORE: f64 = 100.0;

/// A narrative threshold crossed while scoring, with the value that
/// crossed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UrgencyFactor {
    /// Aging velocity above the national reference.
    AgingVelocity(f64),
    /// Old-old ratio above 50%.
    OldOldRatio(f64),
    /// More than 50,000 elderly residents.
    ElderlyPopulation(u64),
    /// Dependency ratio above 60%.
    DependencyRatio(f64),
    /// Old-old acceleration above 2 points.
    Acceleration(f64),
    /// Youth velocity below -3%.
    YouthDecline(f64),
}

impl UrgencyFactor {
    /// Human-readable description in `language`.
    #[must_use]
    pub fn describe(&self, language: Language) -> String {
        match (language, *self) {
            (Language::Ko, Self::AgingVelocity(v)) => format!("고령화속도 전국평균 초과 ({v:.1}%)"),
            (Language::Ko, Self::OldOldRatio(v)) => format!("후기고령 비율 50% 초과 ({v:.1}%)"),
            (Language::Ko, Self::ElderlyPopulation(n)) => format!(
                "고령인구 5만명 이상 ({}명)",
                n.to_formatted_string(&Locale::en)
            ),
            (Language::Ko, Self::DependencyRatio(v)) => format!("부양비 60% 초과 ({v:.1}%)"),
            (Language::Ko, Self::Acceleration(v)) => {
                format!("고령화 가속 추세 (가속도: {v:.1}%p)")
            }
            (Language::Ko, Self::YouthDecline(v)) => format!("아동·청소년 급감 ({v:.1}%)"),
            (Language::En, Self::AgingVelocity(v)) => {
                format!("Aging velocity above national average ({v:.1}%)")
            }
            (Language::En, Self::OldOldRatio(v)) => format!("Old-old share above 50% ({v:.1}%)"),
            (Language::En, Self::ElderlyPopulation(n)) => format!(
                "Elderly population of 50,000 or more ({} people)",
                n.to_formatted_string(&Locale::en)
            ),
            (Language::En, Self::DependencyRatio(v)) => {
                format!("Dependency ratio above 60% ({v:.1}%)")
            }
            (Language::En, Self::Acceleration(v)) => {
                format!("Accelerating aging trend (acceleration: {v:.1}pp)")
            }
            (Language::En, Self::YouthDecline(v)) => format!("Sharp youth decline ({v:.1}%)"),
        }
    }
}

fn component(raw: f64) -> f64 {
    raw.clamp(0.0, COMPONENT_CAP)
}

/// Scores a region from its trend metrics and latest snapshot.
///
/// Returns the score in `[0, 100]` and the factors that fired, in
/// component order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_urgency(
    metrics: &TrendMetrics,
    current: &DemographicSnapshot,
    weights: &UrgencyWeights,
    reference: &ReferenceValues,
) -> (f64, Vec<UrgencyFactor>) {
    let mut score = 0.0;
    let mut factors = Vec::new();

    score += component(metrics.aging_velocity * 5.0) * weights.aging_velocity * 4.0;
    if metrics.aging_velocity > reference.aging_velocity {
        factors.push(UrgencyFactor::AgingVelocity(metrics.aging_velocity));
    }

    let old_old_ratio = current.old_old_ratio();
    score += component((old_old_ratio - 30.0) * 2.0) * weights.old_old_ratio * 4.0;
    if old_old_ratio > 50.0 {
        factors.push(UrgencyFactor::OldOldRatio(old_old_ratio));
    }

    let elderly = current.elderly_total();
    score += component(elderly as f64 / 1000.0 / 10.0) * weights.absolute_elderly * 4.0;
    if elderly > 50_000 {
        factors.push(UrgencyFactor::ElderlyPopulation(elderly));
    }

    let dependency_ratio = current.dependency_ratio();
    score += component((dependency_ratio - 40.0) / 2.0) * weights.dependency_ratio * 4.0;
    if dependency_ratio > 60.0 {
        factors.push(UrgencyFactor::DependencyRatio(dependency_ratio));
    }

    if metrics.old_old_acceleration > 0.0 {
        score += component(metrics.old_old_acceleration * 5.0) * weights.trend_acceleration * 4.0;
        if metrics.old_old_acceleration > 2.0 {
            factors.push(UrgencyFactor::Acceleration(metrics.old_old_acceleration));
        }
    }

    if metrics.youth_velocity < 0.0 {
        score += component(metrics.youth_velocity.abs() * 5.0) * weights.youth_decline * 4.0;
        if metrics.youth_velocity < -3.0 {
            factors.push(UrgencyFactor::YouthDecline(metrics.youth_velocity));
        }
    }

    (score.min(MAX_SCORE), factors)
}

/// Buckets an urgency score. Lower bounds are inclusive.
#[must_use]
pub fn classify_urgency(score: f64) -> UrgencyLevel {
    if score >= 80.0 {
        UrgencyLevel::Critical
    } else if score >= 60.0 {
        UrgencyLevel::High
    } else if score >= 40.0 {
        UrgencyLevel::Elevated
    } else if score >= 20.0 {
        UrgencyLevel::Moderate
    } else {
        UrgencyLevel::Low
    }
}

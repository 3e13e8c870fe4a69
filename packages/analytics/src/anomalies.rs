//! Anomaly rules, evaluated independently of the urgency score.

use aging_map_analytics_models::{Anomaly, Language, TrendMetrics};

/// Returns every anomaly rule that `metrics` triggers, in rule order.
#[must_use]
pub fn detect(metrics: &TrendMetrics) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    if metrics.old_old_acceleration > 5.0 {
        anomalies.push(Anomaly::AccelerationSpike);
    }
    if metrics.aging_velocity > 8.0 {
        anomalies.push(Anomaly::RapidAging);
    }
    if metrics.total_change_percent < -5.0 {
        anomalies.push(Anomaly::PopulationCliff);
    }
    if metrics.youth_velocity < -5.0 {
        anomalies.push(Anomaly::YouthCollapse);
    }
    if metrics.yearly_aging_ratios.values().any(|ratio| *ratio > 20.0) {
        anomalies.push(Anomaly::SuperAged);
    }

    anomalies
}

/// Message text for an anomaly, without its code.
#[must_use]
pub const fn message(anomaly: Anomaly, language: Language) -> &'static str {
    match (language, anomaly) {
        (Language::Ko, Anomaly::AccelerationSpike) => "후기고령 증가 가속화 감지",
        (Language::Ko, Anomaly::RapidAging) => "초고속 고령화 진행 중",
        (Language::Ko, Anomaly::PopulationCliff) => "급격한 인구 감소",
        (Language::Ko, Anomaly::YouthCollapse) => "아동·청소년 인구 급감",
        (Language::Ko, Anomaly::SuperAged) => "초고령사회 진입 (고령화율 20% 초과)",
        (Language::En, Anomaly::AccelerationSpike) => "Accelerating old-old growth detected",
        (Language::En, Anomaly::RapidAging) => "Very rapid aging under way",
        (Language::En, Anomaly::PopulationCliff) => "Sharp population decline",
        (Language::En, Anomaly::YouthCollapse) => "Child and youth population collapsing",
        (Language::En, Anomaly::SuperAged) => "Super-aged society (aging ratio above 20%)",
    }
}

/// Formats an anomaly as `CODE: message`.
#[must_use]
pub fn describe(anomaly: Anomaly, language: Language) -> String {
    format!("{anomaly}: {}", message(anomaly, language))
}

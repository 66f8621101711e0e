//! Improvement advice derived from normalized metrics.
//!
//! The same rules apply to a single device and to the global means of a set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AggregateResult, EvaluationResult, MetricCode, MetricMap};

/// Normalized metric scores below this value trigger advice.
pub const METRIC_ADVICE_THRESHOLD: f64 = 5.0;

/// Indices below this value trigger a general review.
pub const INDEX_ADVICE_THRESHOLD: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseRenewableEnergy,
    ImproveDurability,
    ReduceMaintenanceImpact,
    ImproveEnergyEfficiency,
    ReviewCriticalMetrics,
}

/// Metric-specific advice, in the order it is reported.
const METRIC_RULES: [(MetricCode, Recommendation); 4] = [
    (MetricCode::RenewableEnergy, Recommendation::IncreaseRenewableEnergy),
    (MetricCode::Durability, Recommendation::ImproveDurability),
    (MetricCode::Maintenance, Recommendation::ReduceMaintenanceImpact),
    (MetricCode::EnergyEfficiency, Recommendation::ImproveEnergyEfficiency),
];

impl Recommendation {
    /// The metric this advice targets, if any.
    pub fn metric(&self) -> Option<MetricCode> {
        METRIC_RULES
            .iter()
            .find(|(_, rec)| rec == self)
            .map(|(code, _)| *code)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Recommendation::IncreaseRenewableEnergy => "Increase the share of renewable energy.",
            Recommendation::ImproveDurability => "Extend hardware durability.",
            Recommendation::ReduceMaintenanceImpact => "Reduce the impact of maintenance.",
            Recommendation::ImproveEnergyEfficiency => "Improve energy efficiency.",
            Recommendation::ReviewCriticalMetrics => {
                "Review the weakest metrics to raise the overall index."
            }
        })
    }
}

/// Advice for normalized metrics and the index computed from them. Metrics
/// absent from `normalized` yield no advice.
pub fn recommendations(normalized: &MetricMap, index: f64) -> Vec<Recommendation> {
    let mut advice: Vec<Recommendation> = METRIC_RULES
        .iter()
        .filter(|(code, _)| {
            normalized
                .get(code)
                .is_some_and(|v| *v < METRIC_ADVICE_THRESHOLD)
        })
        .map(|(_, rec)| *rec)
        .collect();
    if index < INDEX_ADVICE_THRESHOLD {
        advice.push(Recommendation::ReviewCriticalMetrics);
    }
    advice
}

impl EvaluationResult {
    pub fn recommendations(&self) -> Vec<Recommendation> {
        recommendations(&self.normalized_metrics, self.sustainability_index)
    }
}

impl AggregateResult {
    /// Advice from the global metric means and global index.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        recommendations(&self.global_metric_mean, self.global_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(value: f64) -> MetricMap {
        MetricCode::ALL.iter().map(|c| (*c, value)).collect()
    }

    #[test]
    fn healthy_metrics_need_no_advice() {
        assert!(recommendations(&all(7.0), 7.0).is_empty());
    }

    #[test]
    fn weak_metrics_get_advice_in_rule_order() {
        let mut normalized = all(9.0);
        normalized.insert(MetricCode::EnergyEfficiency, 0.45);
        normalized.insert(MetricCode::RenewableEnergy, 3.0);
        assert_eq!(
            recommendations(&normalized, 8.0),
            vec![
                Recommendation::IncreaseRenewableEnergy,
                Recommendation::ImproveEnergyEfficiency
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let mut normalized = all(9.0);
        normalized.insert(MetricCode::Durability, METRIC_ADVICE_THRESHOLD);
        assert!(recommendations(&normalized, INDEX_ADVICE_THRESHOLD).is_empty());
        assert_eq!(
            recommendations(&normalized, 5.99),
            vec![Recommendation::ReviewCriticalMetrics]
        );
    }

    #[test]
    fn unweighted_metrics_never_trigger_advice() {
        let mut normalized = all(9.0);
        normalized.insert(MetricCode::CarbonFootprint, 0.0);
        normalized.insert(MetricCode::Recyclability, 0.0);
        assert!(recommendations(&normalized, 9.0).is_empty());
    }

    #[test]
    fn missing_metrics_are_skipped() {
        let mut normalized = all(1.0);
        normalized.remove(&MetricCode::Maintenance);
        let advice = recommendations(&normalized, 1.0);
        assert!(!advice.contains(&Recommendation::ReduceMaintenanceImpact));
        assert_eq!(advice.len(), 4);
    }

    #[test]
    fn advice_names_its_metric() {
        assert_eq!(
            Recommendation::ImproveDurability.metric(),
            Some(MetricCode::Durability)
        );
        assert_eq!(Recommendation::ReviewCriticalMetrics.metric(), None);
        assert_eq!(
            serde_json::to_value(Recommendation::ReduceMaintenanceImpact).unwrap(),
            "reduce_maintenance_impact"
        );
    }
}

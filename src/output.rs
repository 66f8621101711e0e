//! Serializable command outputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::recommend::Recommendation;
use crate::types::{AggregateResult, EvaluationResult, Importance, MetricCode, WeightProvenance, WeightVector};
use crate::weights::{Consistency, WeightOutcome};

pub const ISI_OUTPUT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IsiOutput {
    Evaluate(EvaluateOutput),
    Weights(WeightsOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateOutput {
    pub version: String,
    /// Weight configurations used, one per distinct profile.
    pub weights: Vec<WeightReport>,
    pub devices: Vec<DeviceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateResult>,
    /// Advice from the aggregate's global means; empty without an aggregate.
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_index: Option<f64>,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceReport {
    pub included: bool,
    pub result: EvaluationResult,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl DeviceReport {
    pub fn new(result: EvaluationResult, included: bool) -> Self {
        Self {
            included,
            recommendations: result.recommendations(),
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsOutput {
    pub version: String,
    pub weights: WeightReport,
}

/// Presentation view of a [`WeightOutcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightReport {
    pub label: String,
    pub provenance: WeightProvenance,
    pub weights: WeightVector,
    pub importance: BTreeMap<MetricCode, Importance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<&WeightOutcome> for WeightReport {
    fn from(outcome: &WeightOutcome) -> Self {
        Self {
            label: outcome.label(),
            provenance: outcome.provenance.clone(),
            weights: outcome.weights.clone(),
            importance: outcome
                .weights
                .iter()
                .map(|(code, w)| (code, Importance::from_weight(w)))
                .collect(),
            consistency: outcome.consistency,
            warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::{FixedWeights, WeightSource};

    #[test]
    fn weights_output_is_tagged_by_mode() {
        let outcome = FixedWeights::default().weights().unwrap();
        let body = IsiOutput::Weights(WeightsOutput {
            version: ISI_OUTPUT_VERSION.to_string(),
            weights: WeightReport::from(&outcome),
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["mode"], "weights");
        assert_eq!(json["weights"]["label"], "Recommended Weights");
        assert_eq!(json["weights"]["importance"]["CE"], "high");
        assert!(json["weights"]["weights"]["IM"].is_number());
        assert!(json["weights"]["consistency"]["cr"].is_number());
    }
}

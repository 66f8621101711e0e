//! Evaluation result types.
//!
//! Both result types are plain export mappings: their serialized keys
//! (`raw_metrics`, `normalized_metrics`, `sustainability_index` and the metric
//! codes) are stable.

use serde::{Deserialize, Serialize};

use crate::types::metric::{MetricCode, MetricMap};
use crate::types::weights::WeightVector;

/// Score of one evaluated entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub entity: String,
    pub raw_metrics: MetricMap,
    /// Each value in `[0, 10]`.
    pub normalized_metrics: MetricMap,
    /// Weighted index in `[0, 10]`.
    pub sustainability_index: f64,
    pub weights: WeightVector,
    /// Human-readable provenance of `weights`.
    pub weights_label: String,
}

impl EvaluationResult {
    pub fn normalized(&self, code: MetricCode) -> Option<f64> {
        self.normalized_metrics.get(&code).copied()
    }

    pub fn raw(&self, code: MetricCode) -> Option<f64> {
        self.raw_metrics.get(&code).copied()
    }
}

/// Global statistics over a set of evaluation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub count: usize,
    pub global_index: f64,
    pub global_metric_mean: MetricMap,
    /// Population standard deviation of the indices; `None` when `count == 1`.
    pub index_std_dev: Option<f64>,
    pub comparability: Comparability,
    pub entities: Vec<IndexEntry>,
}

impl AggregateResult {
    pub fn is_comparable(&self) -> bool {
        matches!(self.comparability, Comparability::Uniform { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub entity: String,
    pub sustainability_index: f64,
}

/// Whether the aggregated results were all scored under one weight vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Comparability {
    Uniform { label: String, weights: WeightVector },
    Mixed { labels: Vec<String> },
}

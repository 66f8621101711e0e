use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IsiError, Result};
use crate::types::metric::{MetricCode, MetricMap};

/// Allowed deviation of a weight vector's sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Validated mapping from metric code to weight.
///
/// Weights are finite, non-negative and sum to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`]. A vector may cover fewer than eight codes; the
/// scoring engine rejects such vectors when computing an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetricMap", into = "MetricMap")]
pub struct WeightVector {
    weights: MetricMap,
}

impl WeightVector {
    pub fn new(weights: MetricMap) -> Result<Self> {
        check_entries(&weights)?;
        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(IsiError::invalid_weights(format!(
                "weights sum to {sum:.4}, expected 1.0 ± {WEIGHT_SUM_TOLERANCE}"
            )));
        }
        Ok(Self { weights })
    }

    /// Divides every weight by the total so the vector sums to exactly 1.
    pub fn normalized_from(weights: MetricMap) -> Result<Self> {
        check_entries(&weights)?;
        let sum: f64 = weights.values().sum();
        if sum <= 0.0 {
            return Err(IsiError::invalid_weights("weights must have a positive sum"));
        }
        let weights = weights.into_iter().map(|(k, v)| (k, v / sum)).collect();
        Ok(Self { weights })
    }

    /// Builds a vector from weights in [`MetricCode::ALL`] order.
    pub fn from_ordered(values: &[f64]) -> Result<Self> {
        if values.len() != MetricCode::COUNT {
            return Err(IsiError::invalid_weights(format!(
                "expected {} weights, got {}",
                MetricCode::COUNT,
                values.len()
            )));
        }
        Self::new(MetricCode::ALL.iter().copied().zip(values.iter().copied()).collect())
    }

    pub fn get(&self, code: MetricCode) -> Option<f64> {
        self.weights.get(&code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricCode, f64)> + '_ {
        self.weights.iter().map(|(k, v)| (*k, *v))
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Metric codes with no weight entry.
    pub fn missing(&self) -> Vec<MetricCode> {
        MetricCode::ALL
            .iter()
            .copied()
            .filter(|c| !self.weights.contains_key(c))
            .collect()
    }

    pub fn as_map(&self) -> &MetricMap {
        &self.weights
    }

    pub fn importance(&self, code: MetricCode) -> Option<Importance> {
        self.get(code).map(Importance::from_weight)
    }

    /// True when both vectors cover the same codes with the same weights.
    pub fn same_as(&self, other: &WeightVector) -> bool {
        self.weights.len() == other.weights.len()
            && self
                .weights
                .iter()
                .zip(other.weights.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && (va - vb).abs() <= 1e-9)
    }
}

fn check_entries(weights: &MetricMap) -> Result<()> {
    if weights.is_empty() {
        return Err(IsiError::invalid_weights("no weights given"));
    }
    for (code, w) in weights {
        if !w.is_finite() || *w < 0.0 {
            return Err(IsiError::invalid_weights(format!(
                "weight for {code} must be finite and non-negative, got {w}"
            )));
        }
    }
    Ok(())
}

impl TryFrom<MetricMap> for WeightVector {
    type Error = IsiError;

    fn try_from(weights: MetricMap) -> Result<Self> {
        WeightVector::new(weights)
    }
}

impl From<WeightVector> for MetricMap {
    fn from(vector: WeightVector) -> Self {
        vector.weights
    }
}

/// Where a weight vector came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightProvenance {
    Recommended,
    Manual,
    ManualProfile(String),
    Computed,
    ComputedProfile(String),
}

impl WeightProvenance {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WeightProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightProvenance::Recommended => f.write_str("Recommended Weights"),
            WeightProvenance::Manual => f.write_str("Custom Manual Weights"),
            WeightProvenance::ManualProfile(name) => write!(f, "Manual Configuration: {name}"),
            WeightProvenance::Computed => f.write_str("Computed Weights"),
            WeightProvenance::ComputedProfile(name) => {
                write!(f, "Computed Configuration: {name}")
            }
        }
    }
}

/// Relative importance class of a single weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn from_weight(weight: f64) -> Self {
        if weight >= 0.20 {
            Importance::High
        } else if weight > 0.10 {
            Importance::Medium
        } else {
            Importance::Low
        }
    }
}

//! Weight derivation.
//!
//! A [`WeightSource`] produces the weight vector used to score entities. The
//! three sources are a fixed reference vector, user-entered weights, and
//! weights computed from a pairwise comparison matrix via AHP. Recoverable
//! issues (renormalized manual weights, inconsistent judgments) are returned
//! as [`WeightWarning`]s alongside the vector.

pub mod ahp;
pub mod sources;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{WeightProvenance, WeightVector};

pub use ahp::{
    random_index, saaty_step, AhpResult, AhpSolver, ComparisonMatrix, Consistency,
    CONSISTENCY_THRESHOLD,
};
pub use sources::{
    validate_manual_weights, ComputedWeights, FixedWeights, ManualWeights, WeightSelection,
    DEFAULT_IMPORTANCE_SCORES,
};

pub trait WeightSource {
    fn weights(&self) -> Result<WeightOutcome>;
}

/// A weight vector together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightOutcome {
    pub weights: WeightVector,
    pub provenance: WeightProvenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WeightWarning>,
}

impl WeightOutcome {
    pub fn label(&self) -> String {
        self.provenance.label()
    }
}

/// Non-fatal condition raised while deriving weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightWarning {
    /// Manual weights did not sum to 1 and were divided by their sum.
    Normalized { original_sum: f64 },
    /// The judgment matrix's consistency ratio is at or above the threshold.
    Inconsistent { cr: f64 },
}

impl fmt::Display for WeightWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightWarning::Normalized { original_sum } => write!(
                f,
                "manual weights summed to {original_sum:.3} and were normalized to 1"
            ),
            WeightWarning::Inconsistent { cr } => write!(
                f,
                "comparison matrix is inconsistent (CR {cr:.3} >= {CONSISTENCY_THRESHOLD:.2}); revise the judgments"
            ),
        }
    }
}

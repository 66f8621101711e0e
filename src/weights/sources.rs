use crate::error::{IsiError, Result};
use crate::types::{MetricCode, MetricMap, WeightProvenance, WeightVector, WEIGHT_SUM_TOLERANCE};
use crate::weights::ahp::{AhpSolver, ComparisonMatrix, Consistency};
use crate::weights::{WeightOutcome, WeightSource, WeightWarning};

/// Hand-assigned importance of each metric, in [`MetricCode::ALL`] order.
pub const DEFAULT_IMPORTANCE_SCORES: [u32; MetricCode::COUNT] = [12, 11, 9, 11, 9, 8, 8, 5];

/// Reference weights derived from importance scores through AHP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWeights {
    scores: [u32; MetricCode::COUNT],
}

impl Default for FixedWeights {
    fn default() -> Self {
        Self {
            scores: DEFAULT_IMPORTANCE_SCORES,
        }
    }
}

impl FixedWeights {
    pub fn with_scores(scores: [u32; MetricCode::COUNT]) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &[u32; MetricCode::COUNT] {
        &self.scores
    }

    pub fn matrix(&self) -> Result<ComparisonMatrix> {
        ComparisonMatrix::from_importance_scores(&self.scores)
    }
}

impl WeightSource for FixedWeights {
    fn weights(&self) -> Result<WeightOutcome> {
        let (weights, consistency) = AhpSolver.solve_for_metrics(&self.matrix()?)?;
        Ok(WeightOutcome {
            weights,
            provenance: WeightProvenance::Recommended,
            consistency: Some(consistency),
            warnings: consistency_warning(&consistency).into_iter().collect(),
        })
    }
}

/// Weights entered directly by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualWeights {
    values: MetricMap,
    profile: Option<String>,
}

impl ManualWeights {
    pub fn new(values: MetricMap) -> Self {
        Self {
            values,
            profile: None,
        }
    }

    pub fn named(name: impl Into<String>, values: MetricMap) -> Self {
        Self {
            values,
            profile: Some(name.into()),
        }
    }

    pub fn values(&self) -> &MetricMap {
        &self.values
    }
}

impl WeightSource for ManualWeights {
    fn weights(&self) -> Result<WeightOutcome> {
        let total: f64 = self.values.values().sum();
        let (weights, already_normalized) = validate_manual_weights(self.values.clone())?;
        let warnings = if already_normalized {
            Vec::new()
        } else {
            vec![WeightWarning::Normalized {
                original_sum: total,
            }]
        };
        let provenance = match &self.profile {
            Some(name) => WeightProvenance::ManualProfile(name.clone()),
            None => WeightProvenance::Manual,
        };
        Ok(WeightOutcome {
            weights,
            provenance,
            consistency: None,
            warnings,
        })
    }
}

/// Returns the weights and whether they already summed to 1 within
/// tolerance. Weights outside the tolerance are divided by their sum.
pub fn validate_manual_weights(values: MetricMap) -> Result<(WeightVector, bool)> {
    let total: f64 = values.values().sum();
    if total.is_finite() && (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
        Ok((WeightVector::new(values)?, true))
    } else {
        Ok((WeightVector::normalized_from(values)?, false))
    }
}

/// Weights computed from a pairwise comparison matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedWeights {
    matrix: ComparisonMatrix,
    profile: Option<String>,
}

impl ComputedWeights {
    pub fn new(matrix: ComparisonMatrix) -> Self {
        Self {
            matrix,
            profile: None,
        }
    }

    pub fn named(name: impl Into<String>, matrix: ComparisonMatrix) -> Self {
        Self {
            matrix,
            profile: Some(name.into()),
        }
    }

    pub fn matrix(&self) -> &ComparisonMatrix {
        &self.matrix
    }
}

impl WeightSource for ComputedWeights {
    fn weights(&self) -> Result<WeightOutcome> {
        let (weights, consistency) = AhpSolver.solve_for_metrics(&self.matrix)?;
        let provenance = match &self.profile {
            Some(name) => WeightProvenance::ComputedProfile(name.clone()),
            None => WeightProvenance::Computed,
        };
        Ok(WeightOutcome {
            weights,
            provenance,
            consistency: Some(consistency),
            warnings: consistency_warning(&consistency).into_iter().collect(),
        })
    }
}

fn consistency_warning(consistency: &Consistency) -> Option<WeightWarning> {
    (!consistency.is_acceptable()).then_some(WeightWarning::Inconsistent {
        cr: consistency.cr,
    })
}

/// One of the three weight sources, selected at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightSelection {
    Fixed(FixedWeights),
    Manual(ManualWeights),
    Computed(ComputedWeights),
}

impl Default for WeightSelection {
    fn default() -> Self {
        WeightSelection::Fixed(FixedWeights::default())
    }
}

impl WeightSource for WeightSelection {
    fn weights(&self) -> Result<WeightOutcome> {
        match self {
            WeightSelection::Fixed(source) => source.weights(),
            WeightSelection::Manual(source) => source.weights(),
            WeightSelection::Computed(source) => source.weights(),
        }
    }
}

impl TryFrom<&[(MetricCode, f64)]> for ManualWeights {
    type Error = IsiError;

    fn try_from(pairs: &[(MetricCode, f64)]) -> Result<Self> {
        let mut values = MetricMap::new();
        for (code, w) in pairs {
            if values.insert(*code, *w).is_some() {
                return Err(IsiError::invalid_weights(format!("duplicate weight for {code}")));
            }
        }
        Ok(Self::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Importance;

    fn manual(values: [f64; 8]) -> MetricMap {
        MetricCode::ALL.iter().copied().zip(values).collect()
    }

    #[test]
    fn recommended_weights_follow_importance_order() {
        let outcome = FixedWeights::default().weights().unwrap();
        assert_eq!(outcome.provenance, WeightProvenance::Recommended);
        assert!((outcome.weights.sum() - 1.0).abs() < 1e-9);
        let w = |c| outcome.weights.get(c).unwrap();
        assert!(w(MetricCode::EnergyConsumption) > w(MetricCode::CarbonFootprint));
        assert!((w(MetricCode::CarbonFootprint) - w(MetricCode::RenewableEnergy)).abs() < 1e-12);
        assert!((w(MetricCode::EWaste) - w(MetricCode::EnergyEfficiency)).abs() < 1e-12);
        assert!(w(MetricCode::Recyclability) > w(MetricCode::Maintenance));
        assert_eq!(
            outcome.weights.importance(MetricCode::EnergyConsumption),
            Some(Importance::High)
        );
        assert!(outcome.consistency.is_some());
    }

    #[test]
    fn equal_scores_give_uniform_reference_weights() {
        let outcome = FixedWeights::with_scores([7; 8]).weights().unwrap();
        for (_, w) in outcome.weights.iter() {
            assert!((w - 0.125).abs() < 1e-12);
        }
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn manual_weights_under_one_are_normalized_with_warning() {
        let values = manual([0.3, 0.3, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let (weights, normalized) = validate_manual_weights(values.clone()).unwrap();
        assert!(!normalized);
        assert!((weights.sum() - 1.0).abs() < 1e-6);
        assert!((weights.get(MetricCode::EnergyConsumption).unwrap() - 0.375).abs() < 1e-12);

        let outcome = ManualWeights::new(values).weights().unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        match outcome.warnings[0] {
            WeightWarning::Normalized { original_sum } => {
                assert!((original_sum - 0.8).abs() < 1e-12)
            }
            other => panic!("unexpected warning {other:?}"),
        }
    }

    #[test]
    fn manual_weights_within_tolerance_pass_through() {
        let values = manual([0.22, 0.18, 0.18, 0.12, 0.14, 0.08, 0.05, 0.03]);
        let (weights, normalized) = validate_manual_weights(values.clone()).unwrap();
        assert!(normalized);
        assert_eq!(weights.as_map(), &values);
        let outcome = ManualWeights::named("office", values).weights().unwrap();
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.label(), "Manual Configuration: office");
    }

    #[test]
    fn manual_weights_with_zero_sum_fail() {
        assert!(validate_manual_weights(manual([0.0; 8])).is_err());
    }

    #[test]
    fn duplicate_manual_pairs_are_rejected() {
        let pairs = [
            (MetricCode::EnergyConsumption, 0.5),
            (MetricCode::EnergyConsumption, 0.5),
        ];
        assert!(ManualWeights::try_from(&pairs[..]).is_err());
    }

    #[test]
    fn computed_weights_warn_on_inconsistent_matrix() {
        // CE > HC > EW > CE, everything else neutral.
        let mut upper = vec![1.0; 28];
        upper[0] = 9.0; // CE vs HC
        upper[1] = 1.0 / 9.0; // CE vs EW
        upper[7] = 9.0; // HC vs EW
        let matrix = ComparisonMatrix::from_upper_triangle(8, &upper).unwrap();
        let outcome = ComputedWeights::named("cycle", matrix).weights().unwrap();
        assert!(matches!(
            outcome.warnings.as_slice(),
            [WeightWarning::Inconsistent { .. }]
        ));
        assert!((outcome.weights.sum() - 1.0).abs() < 1e-9);
        assert_eq!(outcome.label(), "Computed Configuration: cycle");
    }

    #[test]
    fn computed_weights_reject_wrong_order() {
        let source = ComputedWeights::new(ComparisonMatrix::identity(4).unwrap());
        assert!(matches!(
            source.weights(),
            Err(IsiError::MatrixShape { expected: 8, .. })
        ));
    }

    #[test]
    fn selection_defaults_to_recommended() {
        let outcome = WeightSelection::default().weights().unwrap();
        assert_eq!(outcome.label(), "Recommended Weights");
    }
}

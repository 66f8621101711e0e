use crate::error::{IsiError, Result};
use crate::metrics::calculator::{ensure_finite, DeviceAttributes, MetricCalculator};
use crate::metrics::normalize::normalize_all;
use crate::types::{EvaluationResult, MetricCode, MetricMap, WeightVector};
use crate::weights::{WeightOutcome, WeightSource, WeightWarning};

/// Weighted sum of normalized metrics.
///
/// Every metric code needs both a normalized value and a weight. The result
/// is clamped to `[0, 10]`, which only bites when the weights sum slightly
/// above 1 within tolerance.
pub fn sustainability_index(normalized: &MetricMap, weights: &WeightVector) -> Result<f64> {
    let missing: Vec<MetricCode> = MetricCode::ALL
        .iter()
        .copied()
        .filter(|code| !normalized.contains_key(code) || weights.get(*code).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(IsiError::IncompleteEvaluation { missing });
    }

    let mut weighted_sum = 0.0f64;
    for (code, weight) in weights.iter() {
        if let Some(value) = normalized.get(&code) {
            weighted_sum += value * weight;
        }
    }
    Ok(weighted_sum.clamp(0.0, 10.0))
}

/// The weight configuration and calculator shared by every entity evaluated
/// together. Results from different contexts are not comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    outcome: WeightOutcome,
    calculator: MetricCalculator,
}

impl EvaluationContext {
    pub fn new(outcome: WeightOutcome, calculator: MetricCalculator) -> Self {
        Self {
            outcome,
            calculator,
        }
    }

    pub fn from_source(source: &dyn WeightSource, calculator: MetricCalculator) -> Result<Self> {
        Ok(Self::new(source.weights()?, calculator))
    }

    pub fn weights(&self) -> &WeightVector {
        &self.outcome.weights
    }

    pub fn outcome(&self) -> &WeightOutcome {
        &self.outcome
    }

    pub fn label(&self) -> String {
        self.outcome.label()
    }

    pub fn warnings(&self) -> &[WeightWarning] {
        &self.outcome.warnings
    }

    pub fn calculator(&self) -> &MetricCalculator {
        &self.calculator
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    /// Computes, normalizes and scores the metrics of one device.
    pub fn evaluate(
        &self,
        ctx: &EvaluationContext,
        attrs: &DeviceAttributes,
    ) -> Result<EvaluationResult> {
        let raw = ctx.calculator.compute(attrs)?;
        self.evaluate_metrics(ctx, &attrs.name, raw)
    }

    /// Scores raw metrics that were computed elsewhere.
    pub fn evaluate_metrics(
        &self,
        ctx: &EvaluationContext,
        entity: &str,
        raw_metrics: MetricMap,
    ) -> Result<EvaluationResult> {
        ensure_finite(&raw_metrics)?;
        let normalized_metrics = normalize_all(&raw_metrics);
        let sustainability_index = sustainability_index(&normalized_metrics, ctx.weights())?;
        tracing::debug!(
            entity,
            index = sustainability_index,
            weights = %ctx.label(),
            "entity evaluated"
        );
        Ok(EvaluationResult {
            entity: entity.to_string(),
            raw_metrics,
            normalized_metrics,
            sustainability_index,
            weights: ctx.weights().clone(),
            weights_label: ctx.label(),
        })
    }
}

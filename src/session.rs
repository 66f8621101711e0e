//! A comparison session's collection of evaluated entities.

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregator;
use crate::error::Result;
use crate::metrics::{DeviceAttributes, EvaluationContext, ScoringEngine};
use crate::types::{AggregateResult, EvaluationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub result: EvaluationResult,
    /// Whether the entry takes part in the global calculation.
    pub included: bool,
}

/// Evaluation results with an inclusion flag each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSet {
    entries: Vec<SetEntry>,
}

impl EvaluationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates `attrs` under `ctx` and appends the result as included.
    pub fn evaluate(
        &mut self,
        ctx: &EvaluationContext,
        attrs: &DeviceAttributes,
    ) -> Result<&EvaluationResult> {
        let result = ScoringEngine.evaluate(ctx, attrs)?;
        Ok(self.push(result, true))
    }

    pub fn push(&mut self, result: EvaluationResult, included: bool) -> &EvaluationResult {
        self.entries.push(SetEntry { result, included });
        let last = self.entries.len() - 1;
        &self.entries[last].result
    }

    pub fn remove(&mut self, index: usize) -> Option<EvaluationResult> {
        (index < self.entries.len()).then(|| self.entries.remove(index).result)
    }

    /// Returns false when `index` is out of range.
    pub fn set_included(&mut self, index: usize, included: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.included = included;
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[SetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn included_count(&self) -> usize {
        self.entries.iter().filter(|e| e.included).count()
    }

    /// Copies of the included results, detached from the set.
    pub fn snapshot(&self) -> Vec<EvaluationResult> {
        self.entries
            .iter()
            .filter(|e| e.included)
            .map(|e| e.result.clone())
            .collect()
    }

    pub fn aggregate(&self) -> Result<AggregateResult> {
        Aggregator.aggregate(&self.snapshot())
    }

    pub fn aggregate_strict(&self) -> Result<AggregateResult> {
        Aggregator.aggregate_strict(&self.snapshot())
    }
}

//! Aggregation of per-entity results into global statistics.

use crate::error::{IsiError, Result};
use crate::types::{
    AggregateResult, Comparability, EvaluationResult, IndexEntry, MetricCode, MetricMap,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Mean index and mean per-metric normalized values over `results`.
    ///
    /// Results scored under different weight vectors are still aggregated,
    /// but the outcome is flagged [`Comparability::Mixed`].
    pub fn aggregate(&self, results: &[EvaluationResult]) -> Result<AggregateResult> {
        let first = results.first().ok_or(IsiError::NoEvaluationsSelected)?;
        let count = results.len();
        let n = count as f64;

        let global_index = mean(results.iter().map(|r| r.sustainability_index), n);

        let mut global_metric_mean = MetricMap::new();
        for code in MetricCode::ALL {
            let values = results
                .iter()
                .map(|r| {
                    r.normalized(code)
                        .ok_or_else(|| IsiError::IncompleteEvaluation { missing: vec![code] })
                })
                .collect::<Result<Vec<f64>>>()?;
            global_metric_mean.insert(code, mean(values.into_iter(), n));
        }

        let index_std_dev = (count > 1).then(|| {
            let variance = results
                .iter()
                .map(|r| (r.sustainability_index - global_index).powi(2))
                .sum::<f64>()
                / n;
            variance.sqrt()
        });

        let comparability = if results.iter().all(|r| r.weights.same_as(&first.weights)) {
            Comparability::Uniform {
                label: first.weights_label.clone(),
                weights: first.weights.clone(),
            }
        } else {
            Comparability::Mixed {
                labels: distinct_labels(results),
            }
        };

        let entities = results
            .iter()
            .map(|r| IndexEntry {
                entity: r.entity.clone(),
                sustainability_index: r.sustainability_index,
            })
            .collect();

        tracing::debug!(count, global_index, "aggregated evaluation results");
        Ok(AggregateResult {
            count,
            global_index,
            global_metric_mean,
            index_std_dev,
            comparability,
            entities,
        })
    }

    /// Like [`Aggregator::aggregate`], but fails when the results were scored
    /// under different weight vectors.
    pub fn aggregate_strict(&self, results: &[EvaluationResult]) -> Result<AggregateResult> {
        let aggregate = self.aggregate(results)?;
        match aggregate.comparability {
            Comparability::Mixed { labels } => Err(IsiError::IncomparableWeights { labels }),
            Comparability::Uniform { .. } => Ok(aggregate),
        }
    }
}

/// Mean that reproduces the input exactly when every value is the same.
fn mean(mut values: impl Iterator<Item = f64>, n: f64) -> f64 {
    let Some(first) = values.next() else {
        return 0.0;
    };
    first + values.map(|v| v - first).sum::<f64>() / n
}

/// One label per distinct weight vector, in order of first appearance.
/// Different vectors sharing a label get a numeric suffix.
fn distinct_labels(results: &[EvaluationResult]) -> Vec<String> {
    let mut seen: Vec<&EvaluationResult> = Vec::new();
    let mut labels = Vec::new();
    for r in results {
        if seen.iter().any(|s| s.weights.same_as(&r.weights)) {
            continue;
        }
        let clashes = seen
            .iter()
            .filter(|s| s.weights_label == r.weights_label)
            .count();
        labels.push(if clashes == 0 {
            r.weights_label.clone()
        } else {
            format!("{} ({})", r.weights_label, clashes + 1)
        });
        seen.push(r);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeightVector;

    fn result(entity: &str, index: f64, metric: f64, weights: &[f64; 8], label: &str) -> EvaluationResult {
        EvaluationResult {
            entity: entity.to_string(),
            raw_metrics: MetricCode::ALL.iter().map(|c| (*c, metric)).collect(),
            normalized_metrics: MetricCode::ALL.iter().map(|c| (*c, metric)).collect(),
            sustainability_index: index,
            weights: WeightVector::from_ordered(weights).unwrap(),
            weights_label: label.to_string(),
        }
    }

    const UNIFORM: [f64; 8] = [0.125; 8];
    const SKEWED: [f64; 8] = [0.3, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1];

    #[test]
    fn empty_selection_fails() {
        assert!(matches!(
            Aggregator.aggregate(&[]),
            Err(IsiError::NoEvaluationsSelected)
        ));
    }

    #[test]
    fn single_result_is_returned_as_is() {
        let r = result("a", 6.5, 3.0, &UNIFORM, "Recommended Weights");
        let agg = Aggregator.aggregate(std::slice::from_ref(&r)).unwrap();
        assert_eq!(agg.count, 1);
        assert_eq!(agg.global_index, 6.5);
        assert_eq!(agg.global_metric_mean, r.normalized_metrics);
        assert_eq!(agg.index_std_dev, None);
        assert!(agg.is_comparable());
    }

    #[test]
    fn identical_results_aggregate_to_the_same_values() {
        let r = result("a", 7.25, 4.5, &UNIFORM, "Recommended Weights");
        let many = vec![r.clone(); 5];
        let agg = Aggregator.aggregate(&many).unwrap();
        assert_eq!(agg.global_index, 7.25);
        for code in MetricCode::ALL {
            assert_eq!(agg.global_metric_mean[&code], 4.5);
        }
        assert_eq!(agg.index_std_dev, Some(0.0));
    }

    #[test]
    fn identical_inexact_values_keep_their_exact_mean() {
        let r = result("a", 0.1, 0.1, &UNIFORM, "Recommended Weights");
        let agg = Aggregator.aggregate(&vec![r; 3]).unwrap();
        assert_eq!(agg.global_index, 0.1);
        assert_eq!(agg.global_metric_mean[&MetricCode::EnergyConsumption], 0.1);
        assert_eq!(agg.index_std_dev, Some(0.0));
    }

    #[test]
    fn distinct_vectors_under_one_label_are_told_apart() {
        let results = vec![
            result("a", 4.0, 2.0, &UNIFORM, "Custom Manual Weights"),
            result("b", 8.0, 6.0, &SKEWED, "Custom Manual Weights"),
            result("c", 5.0, 3.0, &UNIFORM, "Custom Manual Weights"),
        ];
        let agg = Aggregator.aggregate(&results).unwrap();
        assert_eq!(
            agg.comparability,
            Comparability::Mixed {
                labels: vec![
                    "Custom Manual Weights".to_string(),
                    "Custom Manual Weights (2)".to_string()
                ]
            }
        );
    }

    #[test]
    fn mean_and_population_std_dev() {
        let results = vec![
            result("a", 4.0, 2.0, &UNIFORM, "Recommended Weights"),
            result("b", 8.0, 6.0, &UNIFORM, "Recommended Weights"),
        ];
        let agg = Aggregator.aggregate(&results).unwrap();
        assert_eq!(agg.global_index, 6.0);
        assert_eq!(agg.global_metric_mean[&MetricCode::EWaste], 4.0);
        assert_eq!(agg.index_std_dev, Some(2.0));
        assert_eq!(agg.entities[1].entity, "b");
    }

    #[test]
    fn mixed_weights_are_flagged() {
        let results = vec![
            result("a", 4.0, 2.0, &UNIFORM, "Recommended Weights"),
            result("b", 8.0, 6.0, &SKEWED, "Manual Configuration: office"),
        ];
        let agg = Aggregator.aggregate(&results).unwrap();
        assert_eq!(
            agg.comparability,
            Comparability::Mixed {
                labels: vec![
                    "Recommended Weights".to_string(),
                    "Manual Configuration: office".to_string()
                ]
            }
        );
        assert!(matches!(
            Aggregator.aggregate_strict(&results),
            Err(IsiError::IncomparableWeights { .. })
        ));
    }
}

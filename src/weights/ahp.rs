//! Analytic Hierarchy Process.
//!
//! Weights are approximated by the row means of the column-normalized
//! comparison matrix. Consistency is measured against Saaty's random index;
//! the solver never rejects an inconsistent matrix, it reports the ratio so
//! the caller can ask for a revision.

use serde::{Deserialize, Serialize};

use crate::error::{IsiError, Result};
use crate::types::{MetricCode, WeightVector};

/// Consistency ratios below this value are acceptable.
pub const CONSISTENCY_THRESHOLD: f64 = 0.10;

/// Largest matrix order with a tabulated random index.
pub const MAX_ORDER: usize = 20;

const RANDOM_INDEX: [f64; MAX_ORDER] = [
    0.00, 0.00, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
    1.605, 1.61, 1.615, 1.62, 1.625,
];

const MIN_JUDGMENT: f64 = 1.0 / 9.0;
const MAX_JUDGMENT: f64 = 9.0;
// Two-decimal entry of 1/9 is 0.11.
const JUDGMENT_SLACK: f64 = 0.0012;
const RECIPROCAL_TOLERANCE: f64 = 0.05;

/// Random consistency index for a matrix of order `n` (1-based).
pub fn random_index(n: usize) -> Option<f64> {
    n.checked_sub(1).and_then(|i| RANDOM_INDEX.get(i).copied())
}

/// Saaty-scale judgment for an importance score difference.
pub fn saaty_step(diff: u32) -> f64 {
    match diff {
        0 => 1.0,
        1 => 2.0,
        2 => 3.0,
        3 => 5.0,
        4 => 7.0,
        _ => 9.0,
    }
}

/// Square, positive, reciprocal judgment matrix with unit diagonal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ComparisonMatrix {
    order: usize,
    values: Vec<f64>,
}

impl ComparisonMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let order = rows.len();
        if order == 0 || order > MAX_ORDER {
            return Err(IsiError::invalid_matrix(format!(
                "order must be between 1 and {MAX_ORDER}, got {order}"
            )));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != order) {
            return Err(IsiError::invalid_matrix(format!(
                "matrix is not square: row {i} has {} entries, expected {order}",
                row.len()
            )));
        }
        let matrix = Self {
            order,
            values: rows.into_iter().flatten().collect(),
        };
        matrix.check()?;
        Ok(matrix)
    }

    /// Builds the matrix from the judgments above the diagonal, read row by
    /// row; the lower triangle is filled with exact reciprocals.
    pub fn from_upper_triangle(order: usize, upper: &[f64]) -> Result<Self> {
        if order == 0 || order > MAX_ORDER {
            return Err(IsiError::invalid_matrix(format!(
                "order must be between 1 and {MAX_ORDER}, got {order}"
            )));
        }
        let expected = order * (order - 1) / 2;
        if upper.len() != expected {
            return Err(IsiError::invalid_matrix(format!(
                "order {order} needs {expected} upper-triangle judgments, got {}",
                upper.len()
            )));
        }
        let mut values = vec![1.0; order * order];
        let mut judgments = upper.iter();
        for i in 0..order {
            for j in (i + 1)..order {
                if let Some(&v) = judgments.next() {
                    values[i * order + j] = v;
                    values[j * order + i] = 1.0 / v;
                }
            }
        }
        let matrix = Self { order, values };
        matrix.check()?;
        Ok(matrix)
    }

    pub fn identity(order: usize) -> Result<Self> {
        Self::from_upper_triangle(order, &vec![1.0; order * order.saturating_sub(1) / 2])
    }

    /// Derives judgments from hand-assigned importance scores: the Saaty step
    /// of the score difference, inverted when the row scores lower.
    pub fn from_importance_scores(scores: &[u32]) -> Result<Self> {
        let order = scores.len();
        let mut upper = Vec::with_capacity(order * order.saturating_sub(1) / 2);
        for (i, a) in scores.iter().enumerate() {
            for b in scores.iter().skip(i + 1) {
                let step = saaty_step(a.abs_diff(*b));
                upper.push(if a > b { step } else if a < b { 1.0 / step } else { 1.0 });
            }
        }
        Self::from_upper_triangle(order, &upper)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.order && col < self.order {
            self.values.get(row * self.order + col).copied()
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.order)
    }

    fn check(&self) -> Result<()> {
        let n = self.order;
        for i in 0..n {
            for j in 0..n {
                let v = self.values[i * n + j];
                if !v.is_finite() || v <= 0.0 {
                    return Err(IsiError::invalid_matrix(format!(
                        "entry ({i}, {j}) must be positive and finite, got {v}"
                    )));
                }
                if i == j {
                    if (v - 1.0).abs() > 1e-9 {
                        return Err(IsiError::invalid_matrix(format!(
                            "diagonal entry ({i}, {i}) must be 1, got {v}"
                        )));
                    }
                    continue;
                }
                if !(MIN_JUDGMENT - JUDGMENT_SLACK..=MAX_JUDGMENT + 1e-9).contains(&v) {
                    return Err(IsiError::invalid_matrix(format!(
                        "entry ({i}, {j}) = {v} is outside the Saaty range [1/9, 9]"
                    )));
                }
                if j > i {
                    let mirrored = self.values[j * n + i];
                    if (v * mirrored - 1.0).abs() > RECIPROCAL_TOLERANCE {
                        return Err(IsiError::invalid_matrix(format!(
                            "entries ({i}, {j}) = {v} and ({j}, {i}) = {mirrored} are not reciprocal"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<f64>>> for ComparisonMatrix {
    type Error = IsiError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        ComparisonMatrix::new(rows)
    }
}

impl From<ComparisonMatrix> for Vec<Vec<f64>> {
    fn from(matrix: ComparisonMatrix) -> Self {
        matrix.rows().map(<[f64]>::to_vec).collect()
    }
}

/// Consistency figures of a solved matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consistency {
    pub lambda_max: f64,
    /// Consistency index.
    pub ci: f64,
    /// Consistency ratio.
    pub cr: f64,
}

impl Consistency {
    /// The ratio is judged at three decimals, the precision it is reported
    /// with, so 0.0996 counts as 0.100 and fails.
    pub fn is_acceptable(&self) -> bool {
        (self.cr * 1000.0).round() / 1000.0 < CONSISTENCY_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AhpResult {
    /// Weights in matrix row order, summing to 1.
    pub weights: Vec<f64>,
    pub consistency: Consistency,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AhpSolver;

impl AhpSolver {
    pub fn solve(&self, matrix: &ComparisonMatrix) -> AhpResult {
        let n = matrix.order;
        let nf = n as f64;
        let m = &matrix.values;

        let column_sums: Vec<f64> = (0..n)
            .map(|j| (0..n).map(|i| m[i * n + j]).sum())
            .collect();
        let weights: Vec<f64> = (0..n)
            .map(|i| (0..n).map(|j| m[i * n + j] / column_sums[j]).sum::<f64>() / nf)
            .collect();

        let lambda_max = (0..n)
            .map(|i| {
                let row_product: f64 = (0..n).map(|j| m[i * n + j] * weights[j]).sum();
                row_product / weights[i]
            })
            .sum::<f64>()
            / nf;

        let ci = if n > 1 { (lambda_max - nf) / (nf - 1.0) } else { 0.0 };
        let cr = match random_index(n) {
            Some(ri) if ri > 0.0 => ci / ri,
            _ => 0.0,
        };
        let consistency = Consistency { lambda_max, ci, cr };
        tracing::debug!(order = n, lambda_max, ci, cr, "AHP matrix solved");

        AhpResult {
            weights,
            consistency,
        }
    }

    /// Solves an 8x8 matrix indexed by [`MetricCode::ALL`].
    pub fn solve_for_metrics(
        &self,
        matrix: &ComparisonMatrix,
    ) -> Result<(WeightVector, Consistency)> {
        if matrix.order != MetricCode::COUNT {
            return Err(IsiError::MatrixShape {
                expected: MetricCode::COUNT,
                actual: format!("{0}x{0}", matrix.order),
            });
        }
        let result = self.solve(matrix);
        let weights = WeightVector::from_ordered(&result.weights)?;
        Ok((weights, result.consistency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consistent_from(w: &[f64]) -> ComparisonMatrix {
        let rows = w
            .iter()
            .map(|wi| w.iter().map(|wj| wi / wj).collect())
            .collect();
        ComparisonMatrix::new(rows).unwrap()
    }

    #[test]
    fn identity_yields_uniform_weights() {
        let result = AhpSolver.solve(&ComparisonMatrix::identity(8).unwrap());
        for w in &result.weights {
            assert!((w - 0.125).abs() < 1e-12);
        }
        assert!(result.consistency.cr.abs() < 1e-12);
    }

    #[test]
    fn consistent_matrix_recovers_weights_with_zero_cr() {
        let target = [0.3, 0.2, 0.15, 0.1, 0.1, 0.05, 0.05, 0.05];
        let result = AhpSolver.solve(&consistent_from(&target));
        for (got, want) in result.weights.iter().zip(target.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!((result.consistency.lambda_max - 8.0).abs() < 1e-9);
        assert!(result.consistency.cr.abs() < 1e-9);
        assert!(result.consistency.is_acceptable());
    }

    #[test]
    fn solving_twice_is_identical() {
        let m = ComparisonMatrix::from_importance_scores(&[12, 11, 9, 11, 9, 8, 8, 5]).unwrap();
        let a = AhpSolver.solve(&m);
        let b = AhpSolver.solve(&m);
        assert_eq!(a, b);
    }

    #[test]
    fn three_by_three_textbook_matrix() {
        let m = ComparisonMatrix::new(vec![
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 3.0],
            vec![1.0 / 5.0, 1.0 / 3.0, 1.0],
        ])
        .unwrap();
        let result = AhpSolver.solve(&m);
        let sum: f64 = result.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(result.weights[0] > result.weights[1] && result.weights[1] > result.weights[2]);
        assert!(result.consistency.cr > 0.0 && result.consistency.is_acceptable());
    }

    #[test]
    fn intransitive_judgments_are_reported_not_rejected() {
        // A > B, B > C, C > A
        let m = ComparisonMatrix::from_upper_triangle(3, &[9.0, 1.0 / 9.0, 9.0]).unwrap();
        let result = AhpSolver.solve(&m);
        assert!(!result.consistency.is_acceptable());
        let sum: f64 = result.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn small_orders_have_zero_ratio() {
        let m = ComparisonMatrix::from_upper_triangle(2, &[4.0]).unwrap();
        let result = AhpSolver.solve(&m);
        assert_eq!(result.consistency.cr, 0.0);
        assert!((result.weights[0] - 0.8).abs() < 1e-12);
        let single = AhpSolver.solve(&ComparisonMatrix::identity(1).unwrap());
        assert_eq!(single.weights, vec![1.0]);
    }

    #[test]
    fn metric_solver_requires_order_eight() {
        let m = ComparisonMatrix::identity(5).unwrap();
        let err = AhpSolver.solve_for_metrics(&m).unwrap_err();
        assert!(matches!(err, IsiError::MatrixShape { expected: 8, .. }));
    }

    #[test]
    fn rejects_non_reciprocal_matrix() {
        let err = ComparisonMatrix::new(vec![vec![1.0, 3.0], vec![3.0, 1.0]]).unwrap_err();
        assert!(err.to_string().contains("not reciprocal"));
    }

    #[test]
    fn rejects_bad_diagonal_and_range() {
        assert!(ComparisonMatrix::new(vec![vec![2.0, 1.0], vec![1.0, 1.0]]).is_err());
        assert!(ComparisonMatrix::new(vec![vec![1.0, 12.0], vec![1.0 / 12.0, 1.0]]).is_err());
        assert!(ComparisonMatrix::new(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]).is_err());
        assert!(ComparisonMatrix::new(vec![vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn accepts_two_decimal_reciprocals() {
        let m = ComparisonMatrix::new(vec![
            vec![1.0, 9.0, 3.0],
            vec![0.11, 1.0, 0.33],
            vec![0.33, 3.0, 1.0],
        ]);
        assert!(m.is_ok());
    }

    #[test]
    fn importance_scores_use_saaty_steps() {
        let m = ComparisonMatrix::from_importance_scores(&[12, 11, 5]).unwrap();
        assert_eq!(m.get(0, 1), Some(2.0));
        assert_eq!(m.get(1, 0), Some(0.5));
        assert_eq!(m.get(0, 2), Some(9.0));
        assert_eq!(m.get(2, 1), Some(1.0 / 9.0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn random_index_table() {
        assert_eq!(random_index(8), Some(1.41));
        assert_eq!(random_index(20), Some(1.625));
        assert_eq!(random_index(0), None);
        assert_eq!(random_index(21), None);
    }

    #[test]
    fn matrix_serializes_as_nested_rows() {
        let m = ComparisonMatrix::from_upper_triangle(2, &[2.0]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[1.0,2.0],[0.5,1.0]]");
        let back: ComparisonMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn acceptability_is_judged_at_three_decimals() {
        let at = |cr| Consistency {
            lambda_max: 8.0,
            ci: 0.0,
            cr,
        };
        assert!(at(0.0994).is_acceptable());
        assert!(!at(0.0996).is_acceptable());
        assert!(!at(0.10).is_acceptable());
    }
}

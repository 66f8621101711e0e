//! Data types used throughout the ISI library.
//!
//! This module is organized by domain:
//! - [`metric`] - Metric codes, directionality and calibration bounds
//! - [`weights`] - Weight vectors and their provenance
//! - [`results`] - Per-entity and aggregate evaluation results

pub mod metric;
pub mod results;
pub mod weights;

pub use metric::{Calibration, Direction, Metric, MetricCode, MetricMap};
pub use results::{AggregateResult, Comparability, EvaluationResult, IndexEntry};
pub use weights::{Importance, WeightProvenance, WeightVector, WEIGHT_SUM_TOLERANCE};

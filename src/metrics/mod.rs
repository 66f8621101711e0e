pub mod calculator;
pub mod normalize;
pub mod scoring;

pub use calculator::{DeviceAttributes, MaintenanceInputs, MetricCalculator, DEFAULT_EMISSION_FACTOR};
pub use normalize::{normalize, normalize_metric, normalize_all};
pub use scoring::{sustainability_index, EvaluationContext, ScoringEngine};

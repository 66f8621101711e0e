pub mod aggregate;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod recommend;
pub mod session;
pub mod types;
pub mod weights;

pub use aggregate::Aggregator;
pub use config::{Config, ConfigError, WeightProfile};
pub use error::{ErrorCategory, ErrorPayload, IsiError, Result};
pub use metrics::{
    normalize, normalize_metric, sustainability_index, DeviceAttributes, EvaluationContext,
    MaintenanceInputs, MetricCalculator, ScoringEngine,
};
pub use output::{
    DeviceReport, ErrorOutput, EvaluateOutput, IsiOutput, WeightReport, WeightsOutput,
    ISI_OUTPUT_VERSION,
};
pub use recommend::{recommendations, Recommendation};
pub use session::{EvaluationSet, SetEntry};
pub use types::{
    AggregateResult, Calibration, Comparability, Direction, EvaluationResult, Importance, Metric,
    MetricCode, MetricMap, WeightProvenance, WeightVector,
};
pub use weights::{
    validate_manual_weights, AhpSolver, ComparisonMatrix, ComputedWeights, Consistency,
    FixedWeights, ManualWeights, WeightOutcome, WeightSelection, WeightSource, WeightWarning,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::types::MetricCode;

#[derive(Debug, Error)]
pub enum IsiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Incomplete evaluation: missing {}", format_codes(.missing))]
    IncompleteEvaluation { missing: Vec<MetricCode> },

    #[error("No evaluations selected for aggregation")]
    NoEvaluationsSelected,

    #[error("Comparison matrix shape mismatch: expected {expected}x{expected}, got {actual}")]
    MatrixShape { expected: usize, actual: String },

    #[error("Invalid comparison matrix: {0}")]
    InvalidMatrix(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Results were computed under different weight vectors: {}", .labels.join(", "))]
    IncomparableWeights { labels: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_codes(codes: &[MetricCode]) -> String {
    codes
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl IsiError {
    pub fn domain(message: impl Into<String>) -> Self {
        IsiError::Domain(message.into())
    }

    pub fn missing_dependency(message: impl Into<String>) -> Self {
        IsiError::MissingDependency(message.into())
    }

    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        IsiError::InvalidMatrix(message.into())
    }

    pub fn invalid_weights(message: impl Into<String>) -> Self {
        IsiError::InvalidWeights(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            IsiError::Io(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            IsiError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check the JSON input against the device attribute fields.",
            ),
            IsiError::Domain(msg) => ErrorPayload::new(
                ErrorCategory::Domain,
                msg.to_string(),
                "Check device attributes (e.g., life_years and initial_weight_g must be non-zero).",
            ),
            IsiError::MissingDependency(msg) => ErrorPayload::new(
                ErrorCategory::Domain,
                msg.to_string(),
                "Compute energy consumption before carbon footprint or efficiency.",
            ),
            IsiError::IncompleteEvaluation { .. } => ErrorPayload::new(
                ErrorCategory::Evaluation,
                self.to_string(),
                "Provide all eight metrics and a weight for each metric code.",
            ),
            IsiError::NoEvaluationsSelected => ErrorPayload::new(
                ErrorCategory::Evaluation,
                self.to_string(),
                "Mark at least one device as included before aggregating.",
            ),
            IsiError::MatrixShape { .. } | IsiError::InvalidMatrix(_) => ErrorPayload::new(
                ErrorCategory::Weights,
                self.to_string(),
                "Use an 8x8 reciprocal matrix with unit diagonal and entries in [1/9, 9].",
            ),
            IsiError::InvalidWeights(msg) => ErrorPayload::new(
                ErrorCategory::Weights,
                msg.to_string(),
                "Weights must be finite, non-negative and have a positive sum.",
            ),
            IsiError::IncomparableWeights { .. } => ErrorPayload::new(
                ErrorCategory::Evaluation,
                self.to_string(),
                "Re-evaluate all devices under one weight configuration, or drop --strict.",
            ),
            IsiError::Config(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.to_string(),
                "Check the config file (emission_factor, [importance], [profiles.*]).",
            ),
        }
    }
}

impl From<ConfigError> for IsiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => IsiError::Io(e),
            other => IsiError::Config(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, IsiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Input,
    Domain,
    Weights,
    Evaluation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_evaluation_lists_missing_codes() {
        let err = IsiError::IncompleteEvaluation {
            missing: vec![MetricCode::Recyclability, MetricCode::Maintenance],
        };
        assert_eq!(err.to_string(), "Incomplete evaluation: missing RC, IM");
        assert_eq!(err.to_payload().category, ErrorCategory::Evaluation);
    }

    #[test]
    fn config_error_maps_to_config_category() {
        let err = IsiError::from(ConfigError::Invalid("emission_factor must be >= 0".into()));
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Config);
        assert!(payload.message.contains("emission_factor"));
    }
}

//! TOML configuration: emission factor, importance scores for the
//! recommended weights, and named weight profiles.
//!
//! ```toml
//! emission_factor = 0.45
//!
//! [importance]
//! CE = 12
//! IM = 6
//!
//! [profiles.office]
//! mode = "manual"
//! weights = { CE = 0.3, HC = 0.3, EW = 0.2, ER = 0.05, EE = 0.05, DP = 0.05, RC = 0.03, IM = 0.02 }
//!
//! [profiles.expert]
//! mode = "pairwise"
//! upper = [2, 3, 1, 3, 5, 5, 9, 2, 1, 2, 3, 3, 7, 1, 1, 2, 2, 5, 1, 3, 3, 7, 2, 2, 5, 1, 3, 3]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{MetricCalculator, DEFAULT_EMISSION_FACTOR};
use crate::types::{MetricCode, MetricMap};
use crate::weights::{
    ComparisonMatrix, ComputedWeights, FixedWeights, ManualWeights, WeightSelection,
    WeightSource, DEFAULT_IMPORTANCE_SCORES,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),

    #[error("unknown weight profile: {0}")]
    UnknownProfile(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// kg CO2eq per kWh.
    pub emission_factor: f64,
    /// Overrides of the importance scores behind the recommended weights,
    /// keyed by metric code.
    pub importance: BTreeMap<String, u32>,
    pub profiles: BTreeMap<String, WeightProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emission_factor: DEFAULT_EMISSION_FACTOR,
            importance: BTreeMap::new(),
            profiles: BTreeMap::new(),
        }
    }
}

/// A named weight configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WeightProfile {
    Manual {
        weights: BTreeMap<String, f64>,
    },
    Pairwise {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matrix: Option<Vec<Vec<f64>>>,
        /// Upper-triangle judgments, row by row.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper: Option<Vec<f64>>,
    },
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.emission_factor.is_finite() || self.emission_factor < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "emission_factor must be a finite, non-negative number, got {}",
                self.emission_factor
            )));
        }
        self.weight_selection(None)?
            .weights()
            .map_err(|e| ConfigError::Invalid(format!("[importance] {e}")))?;
        for name in self.profiles.keys() {
            self.weight_selection(Some(name))?
                .weights()
                .map_err(|e| ConfigError::Invalid(format!("profile {name}: {e}")))?;
        }
        Ok(())
    }

    pub fn calculator(&self) -> MetricCalculator {
        MetricCalculator::new(self.emission_factor)
    }

    /// Default importance scores with the configured overrides applied.
    pub fn importance_scores(&self) -> Result<[u32; MetricCode::COUNT], ConfigError> {
        let mut scores = DEFAULT_IMPORTANCE_SCORES;
        for (key, score) in &self.importance {
            let code = parse_code(key, "importance")?;
            scores[code.index()] = *score;
        }
        Ok(scores)
    }

    /// The weight source for `profile`, or the recommended weights when no
    /// profile is named.
    pub fn weight_selection(&self, profile: Option<&str>) -> Result<WeightSelection, ConfigError> {
        let Some(name) = profile else {
            return Ok(WeightSelection::Fixed(FixedWeights::with_scores(
                self.importance_scores()?,
            )));
        };
        let entry = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
        let invalid = |e: crate::error::IsiError| {
            ConfigError::Invalid(format!("profile {name}: {e}"))
        };

        match entry {
            WeightProfile::Manual { weights } => {
                let mut values = MetricMap::new();
                for (key, weight) in weights {
                    let code = parse_code(key, &format!("profiles.{name}.weights"))?;
                    values.insert(code, *weight);
                }
                Ok(WeightSelection::Manual(ManualWeights::named(name, values)))
            }
            WeightProfile::Pairwise { matrix, upper } => {
                let matrix = match (matrix, upper) {
                    (Some(rows), None) => ComparisonMatrix::new(rows.clone()).map_err(invalid)?,
                    (None, Some(upper)) => {
                        ComparisonMatrix::from_upper_triangle(MetricCode::COUNT, upper)
                            .map_err(invalid)?
                    }
                    _ => {
                        return Err(ConfigError::Invalid(format!(
                            "profile {name}: pairwise profiles need exactly one of `matrix` or `upper`"
                        )))
                    }
                };
                if matrix.order() != MetricCode::COUNT {
                    return Err(ConfigError::Invalid(format!(
                        "profile {name}: matrix must be {0}x{0}, got {1}x{1}",
                        MetricCode::COUNT,
                        matrix.order()
                    )));
                }
                Ok(WeightSelection::Computed(ComputedWeights::named(name, matrix)))
            }
        }
    }
}

fn parse_code(key: &str, section: &str) -> Result<MetricCode, ConfigError> {
    key.parse::<MetricCode>()
        .map_err(|e| ConfigError::Invalid(format!("[{section}] {e}")))
}

//! Metric identity types.
//!
//! Every evaluated entity is described by the same eight metrics. Each code
//! carries a fixed direction and a fixed calibration window used to rescale
//! the raw value into a 0-10 desirability score.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::normalize::normalize;

/// Map keyed by metric code, iterated in [`MetricCode::ALL`] order.
pub type MetricMap = BTreeMap<MetricCode, f64>;

/// One of the eight fixed metric identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricCode {
    #[serde(rename = "CE")]
    EnergyConsumption,
    #[serde(rename = "HC")]
    CarbonFootprint,
    #[serde(rename = "EW")]
    EWaste,
    #[serde(rename = "ER")]
    RenewableEnergy,
    #[serde(rename = "EE")]
    EnergyEfficiency,
    #[serde(rename = "DP")]
    Durability,
    #[serde(rename = "RC")]
    Recyclability,
    #[serde(rename = "IM")]
    Maintenance,
}

impl MetricCode {
    pub const COUNT: usize = 8;

    pub const ALL: [MetricCode; MetricCode::COUNT] = [
        MetricCode::EnergyConsumption,
        MetricCode::CarbonFootprint,
        MetricCode::EWaste,
        MetricCode::RenewableEnergy,
        MetricCode::EnergyEfficiency,
        MetricCode::Durability,
        MetricCode::Recyclability,
        MetricCode::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCode::EnergyConsumption => "CE",
            MetricCode::CarbonFootprint => "HC",
            MetricCode::EWaste => "EW",
            MetricCode::RenewableEnergy => "ER",
            MetricCode::EnergyEfficiency => "EE",
            MetricCode::Durability => "DP",
            MetricCode::Recyclability => "RC",
            MetricCode::Maintenance => "IM",
        }
    }

    /// Human-readable metric name.
    pub fn name(&self) -> &'static str {
        match self {
            MetricCode::EnergyConsumption => "Energy Consumption",
            MetricCode::CarbonFootprint => "Carbon Footprint",
            MetricCode::EWaste => "E-waste",
            MetricCode::RenewableEnergy => "Renewable Energy",
            MetricCode::EnergyEfficiency => "Energy Efficiency",
            MetricCode::Durability => "Durability",
            MetricCode::Recyclability => "Recyclability",
            MetricCode::Maintenance => "Maintenance",
        }
    }

    /// Position of this code in [`MetricCode::ALL`]; also the row/column of
    /// the code in a comparison matrix.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn direction(&self) -> Direction {
        match self {
            MetricCode::EnergyConsumption | MetricCode::CarbonFootprint | MetricCode::EWaste => {
                Direction::LowerIsBetter
            }
            _ => Direction::HigherIsBetter,
        }
    }

    pub fn calibration(&self) -> Calibration {
        match self {
            MetricCode::EnergyConsumption => Calibration::new(0.0, 100.0),
            MetricCode::CarbonFootprint => Calibration::new(0.0, 50.0),
            MetricCode::EWaste => Calibration::new(0.0, 2.0),
            MetricCode::RenewableEnergy => Calibration::new(0.0, 100.0),
            MetricCode::EnergyEfficiency => Calibration::new(0.0, 10.0),
            MetricCode::Durability => Calibration::new(1.0, 10.0),
            MetricCode::Recyclability => Calibration::new(0.0, 100.0),
            MetricCode::Maintenance => Calibration::new(0.0, 100.0),
        }
    }
}

impl fmt::Display for MetricCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown metric code: {s}"))
    }
}

/// Polarity of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

/// Calibration window `[min, max]` for rescaling a raw metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub min: f64,
    pub max: f64,
}

impl Calibration {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// A single raw metric value with its scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub code: MetricCode,
    pub raw_value: f64,
    pub direction: Direction,
    pub calibration: Calibration,
}

impl Metric {
    pub fn new(code: MetricCode, raw_value: f64) -> Self {
        Self {
            code,
            raw_value,
            direction: code.direction(),
            calibration: code.calibration(),
        }
    }

    /// Desirability score in `[0, 10]`.
    pub fn normalized(&self) -> f64 {
        normalize(self.raw_value, self.direction, self.calibration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_strings() {
        for code in MetricCode::ALL {
            assert_eq!(code.as_str().parse::<MetricCode>(), Ok(code));
        }
        assert_eq!("ce".parse::<MetricCode>(), Ok(MetricCode::EnergyConsumption));
        assert!("XX".parse::<MetricCode>().is_err());
    }

    #[test]
    fn index_follows_declaration_order() {
        for (i, code) in MetricCode::ALL.iter().enumerate() {
            assert_eq!(code.index(), i);
        }
    }

    #[test]
    fn only_consumption_carbon_and_ewaste_are_lower_is_better() {
        let lower: Vec<_> = MetricCode::ALL
            .iter()
            .filter(|c| c.direction() == Direction::LowerIsBetter)
            .map(|c| c.as_str())
            .collect();
        assert_eq!(lower, vec!["CE", "HC", "EW"]);
    }

    #[test]
    fn codes_serialize_as_map_keys() {
        let mut map = MetricMap::new();
        map.insert(MetricCode::Maintenance, 80.0);
        map.insert(MetricCode::EnergyConsumption, 17.52);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"CE":17.52,"IM":80.0}"#);
        let back: MetricMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}

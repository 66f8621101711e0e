//! Raw metric computation from device attributes.
//!
//! The individual operations are pure. [`MetricCalculator::compute`] runs
//! them as one pipeline: consumption is computed first and handed to the
//! carbon and efficiency steps, so the caller never sees a partially
//! populated metric map.

use serde::{Deserialize, Serialize};

use crate::error::{IsiError, Result};
use crate::types::{MetricCode, MetricMap};

/// kg CO2eq emitted per kWh when no factor is configured.
pub const DEFAULT_EMISSION_FACTOR: f64 = 0.5;

/// Raw, already type-coerced attributes of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    pub name: String,
    /// Electrical power in watts while running.
    pub power_w: f64,
    pub daily_hours: f64,
    pub annual_days: f64,
    pub weight_kg: f64,
    pub life_years: f64,
    pub renewable_pct: f64,
    /// Functionality score, 1-10.
    pub functionality: f64,
    pub recyclability_pct: f64,
    #[serde(flatten)]
    pub maintenance: MaintenanceInputs,
}

/// Inputs of the maintenance index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceInputs {
    /// Batteries needed over the device's life (B).
    #[serde(alias = "B")]
    pub batteries: f64,
    /// Weight of each battery in grams (Wb).
    #[serde(alias = "Wb")]
    pub battery_weight_g: f64,
    /// Number of maintenance interventions (M).
    #[serde(alias = "M")]
    pub maintenance_events: f64,
    /// Components replaced per intervention (C).
    #[serde(alias = "C")]
    pub replaced_components: f64,
    /// Average weight of a replaced component in grams (Wc).
    #[serde(alias = "Wc")]
    pub component_weight_g: f64,
    /// Weight when new, in grams (W0).
    #[serde(alias = "W0")]
    pub initial_weight_g: f64,
    /// Weight after use, in grams (W).
    #[serde(alias = "W")]
    pub final_weight_g: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCalculator {
    emission_factor: f64,
}

impl Default for MetricCalculator {
    fn default() -> Self {
        Self {
            emission_factor: DEFAULT_EMISSION_FACTOR,
        }
    }
}

impl MetricCalculator {
    pub fn new(emission_factor: f64) -> Self {
        Self { emission_factor }
    }

    pub fn emission_factor(&self) -> f64 {
        self.emission_factor
    }

    /// Annual consumption in kWh.
    pub fn energy_consumption(power_w: f64, daily_hours: f64, annual_days: f64) -> f64 {
        power_w * daily_hours * annual_days / 1000.0
    }

    pub fn carbon_footprint(consumption_kwh: Option<f64>, emission_factor: f64) -> Result<f64> {
        let consumption = consumption_kwh.ok_or_else(|| {
            IsiError::missing_dependency(
                "energy consumption must be computed before the carbon footprint",
            )
        })?;
        Ok(consumption * emission_factor)
    }

    /// Electronic waste in kg per year of life.
    pub fn ewaste(weight_kg: f64, life_years: f64) -> Result<f64> {
        if life_years == 0.0 {
            return Err(IsiError::domain("life_years must be non-zero to compute e-waste"));
        }
        Ok(weight_kg / life_years)
    }

    pub fn renewable_energy(pct: f64) -> f64 {
        pct
    }

    pub fn durability(life_years: f64) -> f64 {
        life_years
    }

    pub fn recyclability(pct: f64) -> f64 {
        pct
    }

    /// Functionality scaled down by consumption; consumption saturates at 100 kWh.
    pub fn energy_efficiency(functionality: f64, consumption_kwh: Option<f64>) -> Result<f64> {
        let consumption = consumption_kwh.ok_or_else(|| {
            IsiError::missing_dependency(
                "energy consumption must be computed before energy efficiency",
            )
        })?;
        Ok(functionality * (10.0 - consumption.min(100.0) / 10.0) / 10.0)
    }

    pub fn maintenance_index(m: &MaintenanceInputs) -> Result<f64> {
        if m.initial_weight_g == 0.0 {
            return Err(IsiError::domain(
                "initial_weight_g (W0) must be non-zero to compute the maintenance index",
            ));
        }
        let numerator = m.batteries * m.battery_weight_g
            + m.maintenance_events * m.replaced_components * m.component_weight_g
            + (m.initial_weight_g - m.final_weight_g);
        Ok(numerator / m.initial_weight_g * 100.0)
    }

    /// Computes all eight raw metrics for one device.
    pub fn compute(&self, attrs: &DeviceAttributes) -> Result<MetricMap> {
        check_inputs(attrs)?;
        if !self.emission_factor.is_finite() {
            return Err(IsiError::domain("emission factor must be finite"));
        }

        let consumption =
            Self::energy_consumption(attrs.power_w, attrs.daily_hours, attrs.annual_days);
        let values = [
            (MetricCode::EnergyConsumption, consumption),
            (
                MetricCode::CarbonFootprint,
                Self::carbon_footprint(Some(consumption), self.emission_factor)?,
            ),
            (MetricCode::EWaste, Self::ewaste(attrs.weight_kg, attrs.life_years)?),
            (MetricCode::RenewableEnergy, Self::renewable_energy(attrs.renewable_pct)),
            (
                MetricCode::EnergyEfficiency,
                Self::energy_efficiency(attrs.functionality, Some(consumption))?,
            ),
            (MetricCode::Durability, Self::durability(attrs.life_years)),
            (MetricCode::Recyclability, Self::recyclability(attrs.recyclability_pct)),
            (MetricCode::Maintenance, Self::maintenance_index(&attrs.maintenance)?),
        ];

        let metrics: MetricMap = values.into_iter().collect();
        ensure_finite(&metrics)?;
        tracing::trace!(device = %attrs.name, ?metrics, "raw metrics computed");
        Ok(metrics)
    }
}

/// Fails on the first NaN or infinite metric value.
pub(crate) fn ensure_finite(metrics: &MetricMap) -> Result<()> {
    match metrics.iter().find(|(_, v)| !v.is_finite()) {
        Some((code, value)) => Err(IsiError::domain(format!(
            "{} ({code}) must be finite, got {value}",
            code.name()
        ))),
        None => Ok(()),
    }
}

fn check_inputs(attrs: &DeviceAttributes) -> Result<()> {
    let m = &attrs.maintenance;
    let fields = [
        ("power_w", attrs.power_w),
        ("daily_hours", attrs.daily_hours),
        ("annual_days", attrs.annual_days),
        ("weight_kg", attrs.weight_kg),
        ("life_years", attrs.life_years),
        ("renewable_pct", attrs.renewable_pct),
        ("functionality", attrs.functionality),
        ("recyclability_pct", attrs.recyclability_pct),
        ("batteries", m.batteries),
        ("battery_weight_g", m.battery_weight_g),
        ("maintenance_events", m.maintenance_events),
        ("replaced_components", m.replaced_components),
        ("component_weight_g", m.component_weight_g),
        ("initial_weight_g", m.initial_weight_g),
        ("final_weight_g", m.final_weight_g),
    ];
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some((field, value)) => Err(IsiError::domain(format!(
            "{field} must be a finite number, got {value}"
        ))),
        None => Ok(()),
    }
}

use crate::types::{Calibration, Direction, Metric, MetricCode, MetricMap};

/// Maps a raw value onto the `[0, 10]` desirability scale.
///
/// Values outside the calibration window are clipped to the end of the scale
/// instead of failing. `value` must be finite; the scoring engine rejects
/// non-finite raw metrics before normalizing.
pub fn normalize(value: f64, direction: Direction, calibration: Calibration) -> f64 {
    let Calibration { min, max } = calibration;
    let score = match direction {
        Direction::LowerIsBetter => {
            if value <= min {
                10.0
            } else if value >= max {
                0.0
            } else {
                10.0 - 10.0 * (value - min) / (max - min)
            }
        }
        Direction::HigherIsBetter => {
            if value <= min {
                0.0
            } else if value >= max {
                10.0
            } else {
                10.0 * (value - min) / (max - min)
            }
        }
    };
    score.clamp(0.0, 10.0)
}

/// Normalizes `value` with the fixed bounds and polarity of `code`.
pub fn normalize_metric(code: MetricCode, value: f64) -> f64 {
    Metric::new(code, value).normalized()
}

pub fn normalize_all(raw: &MetricMap) -> MetricMap {
    raw.iter()
        .map(|(code, value)| (*code, normalize_metric(*code, *value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumption_scenario() {
        let score = normalize_metric(MetricCode::EnergyConsumption, 17.52);
        assert!((score - 8.248).abs() < 1e-9);
    }

    #[test]
    fn bounds_map_to_scale_ends() {
        for code in MetricCode::ALL {
            let Calibration { min, max } = code.calibration();
            let (at_min, at_max) = match code.direction() {
                Direction::LowerIsBetter => (10.0, 0.0),
                Direction::HigherIsBetter => (0.0, 10.0),
            };
            assert_eq!(normalize_metric(code, min), at_min, "{code} at min");
            assert_eq!(normalize_metric(code, max), at_max, "{code} at max");
        }
    }

    #[test]
    fn out_of_range_values_are_clipped() {
        assert_eq!(normalize_metric(MetricCode::EWaste, -3.0), 10.0);
        assert_eq!(normalize_metric(MetricCode::EWaste, 40.0), 0.0);
        assert_eq!(normalize_metric(MetricCode::Recyclability, 140.0), 10.0);
        assert_eq!(normalize_metric(MetricCode::Durability, 0.0), 0.0);
    }

    #[test]
    fn monotonic_in_metric_polarity() {
        for code in MetricCode::ALL {
            let Calibration { min, max } = code.calibration();
            let span = max - min;
            let mut previous = normalize_metric(code, min - span);
            for step in 1..=60 {
                let v = min - span + span * 3.0 * f64::from(step) / 60.0;
                let current = normalize_metric(code, v);
                match code.direction() {
                    Direction::LowerIsBetter => assert!(current <= previous, "{code} at {v}"),
                    Direction::HigherIsBetter => assert!(current >= previous, "{code} at {v}"),
                }
                assert!((0.0..=10.0).contains(&current));
                previous = current;
            }
        }
    }

    #[test]
    fn durability_uses_offset_window() {
        assert!((normalize_metric(MetricCode::Durability, 5.5) - 5.0).abs() < 1e-12);
    }
}

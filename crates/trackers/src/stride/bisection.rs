use pvtrack_core::{History, Measurement};

use crate::config::StrideConfig;

/// Secant-driven stride.
///
/// Below the noise floor (either `|ΔV|` or `|ΔP|` too small for a meaningful
/// secant) the minimum stride is returned. On a negative slope the stride is
/// half the last voltage change; on a positive slope it is proportional to
/// the slope. History advances on every call.
#[derive(Debug, Clone)]
pub(super) struct BisectionStride {
    history: History,
    slope_multiplier: f64,
    min_voltage_change: f64,
    min_power_change: f64,
}

impl BisectionStride {
    pub(super) fn new(config: &StrideConfig) -> Self {
        Self {
            history: History::new(),
            slope_multiplier: config.slope_multiplier,
            min_voltage_change: config.min_voltage_change,
            min_power_change: config.min_power_change,
        }
    }

    pub(super) fn stride(&mut self, measurement: &Measurement, min_stride: f64) -> f64 {
        let delta = self.history.delta(measurement);
        let v_old = self.history.voltage;

        let stride = if delta.voltage.abs() < self.min_voltage_change
            || delta.power.abs() < self.min_power_change
        {
            min_stride
        } else {
            let slope = delta.power / delta.voltage;
            if slope < 0.0 {
                (measurement.voltage + v_old) / 2.0 - v_old
            } else {
                slope * self.slope_multiplier
            }
        };

        self.history.record(measurement);
        stride.abs().max(min_stride)
    }

    pub(super) fn prime(&mut self, measurement: &Measurement) {
        self.history.record(measurement);
    }

    pub(super) fn reset(&mut self) {
        self.history = History::new();
    }
}

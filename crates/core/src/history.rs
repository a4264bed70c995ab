use crate::Measurement;

/// An algorithm's memory of the previous cycle's sample.
///
/// Owned by exactly one algorithm instance and overwritten every cycle.
/// A fresh history is all zeros, matching a source that has not been sampled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct History {
    /// Previous array voltage in V.
    pub voltage: f64,

    /// Previous array current in A.
    pub current: f64,

    /// Previous array power in W.
    pub power: f64,

    /// Previous irradiance in W/m².
    pub irradiance: f64,

    /// Previous cell temperature in °C.
    pub temperature: f64,
}

/// Cycle-to-cycle change between a measurement and the recorded history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    /// Change in voltage, `v - v_old`.
    pub voltage: f64,

    /// Change in current, `i - i_old`.
    pub current: f64,

    /// Change in power, `p - p_old`.
    pub power: f64,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the history with `measurement`.
    pub fn record(&mut self, measurement: &Measurement) {
        self.voltage = measurement.voltage;
        self.current = measurement.current;
        self.power = measurement.power();
        self.irradiance = measurement.irradiance;
        self.temperature = measurement.temperature;
    }

    /// Returns the change from the recorded sample to `measurement`.
    #[must_use]
    pub fn delta(&self, measurement: &Measurement) -> Delta {
        Delta {
            voltage: measurement.voltage - self.voltage,
            current: measurement.current - self.current,
            power: measurement.power() - self.power,
        }
    }
}

impl Delta {
    /// Returns `dP/dV`, or `None` when the voltage did not move.
    ///
    /// A zero voltage change carries no slope information, so callers treat
    /// `None` as "no movement" rather than dividing by zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn power_slope(&self) -> Option<f64> {
        if self.voltage == 0.0 {
            None
        } else {
            Some(self.power / self.voltage)
        }
    }
}

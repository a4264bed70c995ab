//! Shared fixtures for the pvtrack integration tests.
//!
//! Provides synthetic P-V curves, a simulated array that scales a curve by
//! irradiance, and a scenario file format that wraps a tracker configuration.

use log::LevelFilter;
use pvtrack_core::Measurement;
use pvtrack_trackers::TrackerConfig;
use serde::Deserialize;
use simplelog::{Config, TestLogger};

/// Irradiance at which the curves below are defined, in W/m².
pub const STANDARD_IRRADIANCE: f64 = 1000.0;

pub const TEMPERATURE: f64 = 25.0;

/// A single 3600 W peak at 60 V.
pub fn parabola(v: f64) -> f64 {
    (3600.0 - (v - 60.0).powi(2)).max(0.0)
}

/// Partial shading: a 10 W peak at 20 V and a 15 W peak at 70 V.
pub fn two_peaks(v: f64) -> f64 {
    10.0 * (-((v - 20.0) / 8.0).powi(2)).exp() + 15.0 * (-((v - 70.0) / 8.0).powi(2)).exp()
}

/// A simulated array whose output scales linearly with irradiance.
#[derive(Debug, Clone, Copy)]
pub struct Array {
    curve: fn(f64) -> f64,
    irradiance: f64,
}

impl Array {
    /// An array under standard irradiance.
    pub fn new(curve: fn(f64) -> f64) -> Self {
        Self {
            curve,
            irradiance: STANDARD_IRRADIANCE,
        }
    }

    /// The same array under a different irradiance.
    #[must_use]
    pub fn under(self, irradiance: f64) -> Self {
        Self { irradiance, ..self }
    }

    pub fn power(&self, v: f64) -> f64 {
        (self.curve)(v) * self.irradiance / STANDARD_IRRADIANCE
    }

    /// Samples the array at `v`.
    pub fn measure(&self, v: f64) -> Measurement {
        let power = self.power(v);
        let current = if v > 0.0 { power / v } else { 0.0 };
        Measurement::new(v, current, self.irradiance, TEMPERATURE)
    }

    /// Operates the array at each emitted reference voltage in turn.
    ///
    /// Returns the emitted voltages, one per cycle.
    pub fn run<F>(&self, start: f64, cycles: usize, mut step: F) -> Vec<f64>
    where
        F: FnMut(&Measurement) -> f64,
    {
        let mut v = start;
        (0..cycles)
            .map(|_| {
                v = step(&self.measure(v));
                v
            })
            .collect()
    }
}

/// A tracker configuration plus how long to run it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub cycles: usize,
    pub tracker: TrackerConfig,
}

/// Routes `log` output through the test harness.
pub fn init_logging() {
    // Only the first call in a test binary installs the logger.
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

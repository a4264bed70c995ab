use log::error;
use pvtrack_core::{History, Measurement, SearchInterval, VoltageDomain};

use crate::StrideModel;

use super::LocalSearch;

/// Incremental conductance.
///
/// At the maximum power point `dI/dV = -I/V`, so `ΔI·V + I·ΔV` vanishes.
/// The quantity is oriented by the sign of `ΔV`, making it positive whenever
/// power rises to the right of the operating point. Within `tolerance` the
/// array is held; otherwise it steps one stride toward rising power.
#[derive(Debug, Clone)]
pub struct IncrementalConductance {
    domain: VoltageDomain,
    interval: SearchInterval,
    history: History,
    stride: StrideModel,
    tolerance: f64,
}

impl IncrementalConductance {
    #[must_use]
    pub fn new(domain: VoltageDomain, stride: StrideModel, tolerance: f64) -> Self {
        Self {
            domain,
            interval: SearchInterval::full(&domain),
            history: History::new(),
            stride,
            tolerance,
        }
    }
}

impl LocalSearch for IncrementalConductance {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        let delta = self.history.delta(measurement);
        let stride = self.stride.stride(measurement);
        self.history.record(measurement);

        let v = measurement.voltage;
        let conductance = delta.current * v + measurement.current * delta.voltage;
        let oriented = if delta.voltage < 0.0 {
            -conductance
        } else {
            conductance
        };

        if oriented.abs() <= self.tolerance {
            v
        } else if oriented > self.tolerance {
            v + stride
        } else if oriented < -self.tolerance {
            v - stride
        } else {
            error!("incremental conductance is unclassifiable at {measurement:?}, holding");
            v
        }
    }

    fn setup(&mut self, vmpp: f64, interval: SearchInterval) {
        self.interval = interval;
        let error = self.stride.target().error;
        self.stride.setup(vmpp, error);
    }

    fn prime(&mut self, measurement: &Measurement) {
        self.history.record(measurement);
        self.stride.prime(measurement);
    }

    fn reset(&mut self) {
        self.interval = SearchInterval::full(&self.domain);
        self.history = History::new();
        self.stride.restore();
    }

    fn interval(&self) -> SearchInterval {
        self.interval
    }
}

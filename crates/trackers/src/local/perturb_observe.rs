use pvtrack_core::{History, Measurement, SearchInterval, VoltageDomain};

use crate::StrideModel;

use super::LocalSearch;

/// Perturb and observe hill climbing.
///
/// Keeps moving in the direction of the last voltage change while power
/// rises and reverses when it falls. An unchanged voltage carries no
/// direction, so the array is held.
#[derive(Debug, Clone)]
pub struct PerturbAndObserve {
    domain: VoltageDomain,
    interval: SearchInterval,
    history: History,
    stride: StrideModel,
}

impl PerturbAndObserve {
    #[must_use]
    pub fn new(domain: VoltageDomain, stride: StrideModel) -> Self {
        Self {
            domain,
            interval: SearchInterval::full(&domain),
            history: History::new(),
            stride,
        }
    }
}

impl LocalSearch for PerturbAndObserve {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        let delta = self.history.delta(measurement);
        let stride = self.stride.stride(measurement);
        self.history.record(measurement);

        let heading = if delta.voltage > 0.0 {
            1.0
        } else if delta.voltage < 0.0 {
            -1.0
        } else {
            0.0
        };
        let direction = if delta.power > 0.0 { heading } else { -heading };

        measurement.voltage + direction * stride
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

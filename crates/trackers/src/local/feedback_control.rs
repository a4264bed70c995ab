use pvtrack_core::{History, Measurement, SearchInterval, VoltageDomain};

use crate::StrideModel;

use super::LocalSearch;

/// Feedback control on `dP/dV`.
///
/// Steps one stride in the direction of the slope sign; holds when the slope
/// is within `tolerance` or undefined (no voltage change).
#[derive(Debug, Clone)]
pub struct FeedbackControl {
    domain: VoltageDomain,
    interval: SearchInterval,
    history: History,
    stride: StrideModel,
    tolerance: f64,
}

impl FeedbackControl {
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

impl LocalSearch for FeedbackControl {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        let delta = self.history.delta(measurement);
        let stride = self.stride.stride(measurement);
        self.history.record(measurement);

        let v = measurement.voltage;
        match delta.power_slope() {
            Some(slope) if slope > self.tolerance => v + stride,
            Some(slope) if slope < -self.tolerance => v - stride,
            _ => v,
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

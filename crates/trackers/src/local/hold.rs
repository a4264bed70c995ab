use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};

use super::LocalSearch;

/// The `Default` local strategy: re-emits the measured voltage.
#[derive(Debug, Clone)]
pub struct Hold {
    domain: VoltageDomain,
    interval: SearchInterval,
}

impl Hold {
    #[must_use]
    pub fn new(domain: VoltageDomain) -> Self {
        Self {
            domain,
            interval: SearchInterval::full(&domain),
        }
    }
}

impl LocalSearch for Hold {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        measurement.voltage
    }

    fn setup(&mut self, _vmpp: f64, interval: SearchInterval) {
        self.interval = interval;
    }

    fn prime(&mut self, _measurement: &Measurement) {}

    fn reset(&mut self) {
        self.interval = SearchInterval::full(&self.domain);
    }

    fn interval(&self) -> SearchInterval {
        self.interval
    }
}

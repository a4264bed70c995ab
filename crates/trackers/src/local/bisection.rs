use pvtrack_core::{History, Measurement, SearchInterval, VoltageDomain};

use super::LocalSearch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    /// Emit the first midpoint.
    Init,

    /// Narrow on the sign of `dP/dV` and emit the new midpoint.
    Tracking,
}

/// Bisection on the sign of `dP/dV`.
///
/// The first cycle emits the interval midpoint and records the left bound as
/// the previous voltage. Every later cycle moves the bound on the side the
/// secant slope points away from up to the measured voltage, then emits the
/// new midpoint. A slope within `tolerance` holds position. The search never
/// terminates; the interval converges on the peak asymptotically.
#[derive(Debug, Clone)]
pub struct Bisection {
    domain: VoltageDomain,
    interval: SearchInterval,
    history: History,
    cycle: Cycle,
    tolerance: f64,
}

impl Bisection {
    #[must_use]
    pub fn new(domain: VoltageDomain, tolerance: f64) -> Self {
        Self {
            domain,
            interval: SearchInterval::full(&domain),
            history: History::new(),
            cycle: Cycle::Init,
            tolerance,
        }
    }
}

impl LocalSearch for Bisection {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        match self.cycle {
            Cycle::Init => {
                self.history.record(measurement);
                self.history.voltage = self.interval.left();
                self.cycle = Cycle::Tracking;
                self.interval.midpoint()
            }
            Cycle::Tracking => {
                let slope = self.history.delta(measurement).power_slope().unwrap_or(0.0);
                self.history.record(measurement);

                let v = measurement.voltage;
                if slope.is_nan() || slope.abs() <= self.tolerance {
                    return v;
                }
                if slope > 0.0 {
                    self.interval.raise_left(v);
                } else {
                    self.interval.lower_right(v);
                }
                self.interval.midpoint()
            }
        }
    }

    fn setup(&mut self, _vmpp: f64, interval: SearchInterval) {
        self.interval = interval;
        self.cycle = Cycle::Init;
    }

    fn prime(&mut self, measurement: &Measurement) {
        self.history.record(measurement);
    }

    fn reset(&mut self) {
        self.interval = SearchInterval::full(&self.domain);
        self.history = History::new();
        self.cycle = Cycle::Init;
    }

    fn interval(&self) -> SearchInterval {
        self.interval
    }
}

use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};

use super::LocalSearch;

/// Offset of each probe from its nearer bound, as a fraction of the width.
const Q: f64 = 1.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    /// Emit the first probe.
    Start,

    /// Record the first probe's power and emit the second probe.
    AwaitFirst,

    /// Record the second probe's power, discard the outer third beyond the
    /// lower probe, and emit the new first probe.
    AwaitSecond,
}

/// Ternary search, maximizing power.
///
/// Probes at one and two thirds of the interval; every two cycles the third
/// beyond the lower-power probe is discarded, leaving 2/3 of the width. Ties
/// discard the left third.
#[derive(Debug, Clone)]
pub struct Ternary {
    domain: VoltageDomain,
    interval: SearchInterval,
    power_first: f64,
    cycle: Cycle,
}

impl Ternary {
    #[must_use]
    pub fn new(domain: VoltageDomain) -> Self {
        Self {
            domain,
            interval: SearchInterval::full(&domain),
            power_first: 0.0,
            cycle: Cycle::Start,
        }
    }

    fn first(&self) -> f64 {
        self.interval.left() + Q * self.interval.width()
    }

    fn second(&self) -> f64 {
        self.interval.right() - Q * self.interval.width()
    }
}

impl LocalSearch for Ternary {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        match self.cycle {
            Cycle::Start => {
                self.cycle = Cycle::AwaitFirst;
                self.first()
            }
            Cycle::AwaitFirst => {
                self.power_first = measurement.power();
                self.cycle = Cycle::AwaitSecond;
                self.second()
            }
            Cycle::AwaitSecond => {
                let (first, second) = (self.first(), self.second());
                if self.power_first > measurement.power() {
                    self.interval.lower_right(second);
                } else {
                    self.interval.raise_left(first);
                }
                self.cycle = Cycle::AwaitFirst;
                self.first()
            }
        }
    }

    fn setup(&mut self, _vmpp: f64, interval: SearchInterval) {
        self.interval = interval;
        self.power_first = 0.0;
        self.cycle = Cycle::Start;
    }

    fn prime(&mut self, _measurement: &Measurement) {}

    fn reset(&mut self) {
        self.setup(0.0, SearchInterval::full(&self.domain));
    }

    fn interval(&self) -> SearchInterval {
        self.interval
    }
}

mod bracket;

use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};

use super::LocalSearch;

use bracket::GoldenBracket;

/// Which interior point the last emitted voltage probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    InnerLeft,
    InnerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    /// Emit the inner-left point.
    Start,

    /// Record the inner-left power and emit the inner-right point.
    Bootstrap,

    /// Record the probed power, shrink toward the higher side, emit the
    /// vacated interior point.
    Compare(Probe),
}

/// Golden section search, maximizing power.
///
/// After a two-cycle bootstrap each cycle evaluates exactly one new interior
/// point and shrinks the interval by the inverse golden ratio, reusing the
/// surviving interior point and its power. Ties shrink from the left.
#[derive(Debug, Clone)]
pub struct Golden {
    domain: VoltageDomain,
    bracket: GoldenBracket,
    power_left: f64,
    power_right: f64,
    cycle: Cycle,
}

impl Golden {
    #[must_use]
    pub fn new(domain: VoltageDomain) -> Self {
        Self {
            domain,
            bracket: GoldenBracket::new(SearchInterval::full(&domain)),
            power_left: 0.0,
            power_right: 0.0,
            cycle: Cycle::Start,
        }
    }

    fn restart(&mut self, interval: SearchInterval) {
        self.bracket = GoldenBracket::new(interval);
        self.power_left = 0.0;
        self.power_right = 0.0;
        self.cycle = Cycle::Start;
    }
}

impl LocalSearch for Golden {
    fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        let power = measurement.power();
        match self.cycle {
            Cycle::Start => {
                self.cycle = Cycle::Bootstrap;
                self.bracket.inner_left()
            }
            Cycle::Bootstrap => {
                self.power_left = power;
                self.cycle = Cycle::Compare(Probe::InnerRight);
                self.bracket.inner_right()
            }
            Cycle::Compare(probe) => {
                match probe {
                    Probe::InnerLeft => self.power_left = power,
                    Probe::InnerRight => self.power_right = power,
                }

                if self.power_left > self.power_right {
                    self.bracket.shrink_right();
                    self.power_right = self.power_left;
                    self.cycle = Cycle::Compare(Probe::InnerLeft);
                    self.bracket.inner_left()
                } else {
                    self.bracket.shrink_left();
                    self.power_left = self.power_right;
                    self.cycle = Cycle::Compare(Probe::InnerRight);
                    self.bracket.inner_right()
                }
            }
        }
    }

    fn setup(&mut self, _vmpp: f64, interval: SearchInterval) {
        self.restart(interval);
    }

    fn prime(&mut self, _measurement: &Measurement) {}

    fn reset(&mut self) {
        self.restart(SearchInterval::full(&self.domain));
    }

    fn interval(&self) -> SearchInterval {
        self.bracket.interval()
    }
}

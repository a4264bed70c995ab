mod ledger;

use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};

use crate::config::SweepConfig;

use super::{
    Exploration, Explorer, Handoff,
    explorer::{Sample, brighter},
};

use ledger::Ledger;

/// Fixed-stride sweep of the whole domain.
///
/// Probes `0, s, 2s, …` up to the domain maximum while tracking the peaks and
/// troughs of the measured power. The bound around the highest peak runs
/// from the midpoint with the previous peak (or half the peak voltage) to the
/// midpoint with the next peak (or the domain maximum).
#[derive(Debug, Clone)]
pub struct VoltageSweep {
    domain: VoltageDomain,
    stride: f64,
    cursor: Option<usize>,
    ledger: Ledger,
}

impl VoltageSweep {
    #[must_use]
    pub fn new(domain: VoltageDomain, config: &SweepConfig) -> Self {
        Self {
            domain,
            stride: config.stride,
            cursor: None,
            ledger: Ledger::new(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn voltage_at(&self, index: usize) -> f64 {
        index as f64 * self.stride
    }

    fn bound(&self) -> Handoff {
        let full = SearchInterval::full(&self.domain);
        let peaks = self.ledger.peaks();
        let Some(i) = self.ledger.highest_peak() else {
            let vmpp = self
                .ledger
                .best()
                .map_or(self.domain.max_voltage() / 2.0, |s| s.voltage);
            return Handoff {
                vmpp: full.clamp(vmpp),
                interval: full,
            };
        };

        let peak = peaks[i].voltage;
        let left = i
            .checked_sub(1)
            .map_or(peak / 2.0, |j| (peaks[j].voltage + peak) / 2.0);
        let right = peaks
            .get(i + 1)
            .map_or(self.domain.max_voltage(), |next| (peak + next.voltage) / 2.0);
        let interval = SearchInterval::clamped(left, right, &self.domain);

        Handoff {
            vmpp: interval.clamp(peak),
            interval,
        }
    }

    /// Number of peaks recorded so far.
    #[must_use]
    pub fn peak_count(&self) -> usize {
        self.ledger.peaks().len()
    }

    /// Number of troughs recorded so far.
    #[must_use]
    pub fn trough_count(&self) -> usize {
        self.ledger.troughs().len()
    }
}

impl Explorer for VoltageSweep {
    fn explore(&mut self, measurement: &Measurement) -> Exploration {
        let Some(index) = self.cursor else {
            self.cursor = Some(0);
            return Exploration::Continue(0.0);
        };
        self.ledger.record(Sample::from(measurement));

        let next = index + 1;
        let voltage = self.voltage_at(next);
        if voltage > self.domain.max_voltage() {
            self.ledger.finish();
            return Exploration::Complete(self.bound());
        }
        self.cursor = Some(next);
        Exploration::Continue(voltage)
    }

    fn restart(&mut self) {
        self.cursor = None;
        self.ledger = Ledger::new();
    }

    fn reset(&mut self) {
        self.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{complete, parabola, two_peaks};

    fn sweep() -> VoltageSweep {
        let domain = VoltageDomain::from_cells(125).unwrap();
        VoltageSweep::new(domain, &SweepConfig::default())
    }

    #[test]
    fn bound_favors_the_higher_of_two_peaks() {
        let mut sweep = sweep();
        let (handoff, probes) = complete(&mut sweep, two_peaks, 20_000);

        assert_eq!(probes[0], 0.0);
        assert!(probes.windows(2).all(|w| w[1] > w[0]));
        assert!(probes.iter().all(|&v| v <= 100.0));
        assert_eq!(sweep.peak_count(), 2);
        assert_eq!(sweep.trough_count(), 1);

        assert_relative_eq!(handoff.vmpp, 70.0, epsilon = 0.011);
        assert_relative_eq!(handoff.interval.left(), 45.0, epsilon = 0.011);
        assert_relative_eq!(handoff.interval.right(), 100.0);
        assert!(!handoff.interval.contains(20.0));
    }

    #[test]
    fn single_peak_bound_reaches_from_half_the_peak_to_the_maximum() {
        let mut sweep = sweep();
        let (handoff, _) = complete(&mut sweep, parabola, 20_000);

        assert_relative_eq!(handoff.vmpp, 60.0, epsilon = 0.011);
        assert_relative_eq!(handoff.interval.left(), 30.0, epsilon = 0.006);
        assert_relative_eq!(handoff.interval.right(), 100.0);
    }

    #[test]
    fn flat_curve_hands_off_the_full_domain() {
        let mut sweep = sweep();
        let (handoff, _) = complete(&mut sweep, |_| 0.0, 20_000);

        assert_relative_eq!(handoff.interval.left(), 0.0);
        assert_relative_eq!(handoff.interval.right(), 100.0);
        assert!(handoff.interval.contains(handoff.vmpp));
    }

    #[test]
    fn restart_sweeps_again_from_zero() {
        let mut sweep = sweep();
        let (first, _) = complete(&mut sweep, two_peaks, 20_000);

        sweep.restart();
        let (second, probes) = complete(&mut sweep, two_peaks, 20_000);
        assert_eq!(probes[0], 0.0);
        assert_eq!(first, second);
    }
}

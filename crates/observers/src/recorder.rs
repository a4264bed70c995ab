use pvtrack_core::{Measurement, Observer};
use pvtrack_trackers::{Event, Handoff, Phase};

/// One recorded control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle {
    pub measurement: Measurement,
    pub reference: f64,
    pub phase: Phase,
}

/// An observer that keeps every tracker event in memory.
///
/// Pass `&mut Recorder` as the observer of
/// [`GlobalTracker::step_observed`](pvtrack_trackers::GlobalTracker::step_observed)
/// and inspect the run afterwards. The recorder never requests an action.
///
/// # Example
///
/// ```
/// use pvtrack_core::Measurement;
/// use pvtrack_observers::Recorder;
/// use pvtrack_trackers::{GlobalKind, GlobalTracker, TrackerConfig};
///
/// let config = TrackerConfig {
///     global: GlobalKind::VoltageSweep,
///     ..TrackerConfig::with_cells(10)
/// };
/// let mut tracker = GlobalTracker::new(&config).unwrap();
/// let mut recorder = Recorder::new();
///
/// let mut v = 0.0;
/// for _ in 0..5 {
///     let m = Measurement::new(v, 2.0, 1000.0, 25.0);
///     v = tracker.step_observed(&m, &mut recorder);
/// }
/// assert_eq!(recorder.cycles().len(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    cycles: Vec<Cycle>,
    transitions: Vec<(Phase, Phase)>,
    handoffs: Vec<Handoff>,
    changes: Vec<Measurement>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a single event.
    pub fn record(&mut self, event: &Event) {
        match *event {
            Event::Reference {
                measurement,
                voltage,
                phase,
            } => self.cycles.push(Cycle {
                measurement,
                reference: voltage,
                phase,
            }),
            Event::PhaseChanged { from, to } => self.transitions.push((from, to)),
            Event::HandedOff { vmpp, interval } => self.handoffs.push(Handoff { vmpp, interval }),
            Event::EnvironmentChanged { measurement } => self.changes.push(measurement),
        }
    }

    /// Every control cycle, in order.
    #[must_use]
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Every phase transition, in order.
    #[must_use]
    pub fn transitions(&self) -> &[(Phase, Phase)] {
        &self.transitions
    }

    /// Every bound handed to the local strategy, in order.
    #[must_use]
    pub fn handoffs(&self) -> &[Handoff] {
        &self.handoffs
    }

    /// Measurements at which an environment change was detected.
    #[must_use]
    pub fn changes(&self) -> &[Measurement] {
        &self.changes
    }

    /// Measured operating points as `[voltage, power]` pairs.
    pub fn trace(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.cycles
            .iter()
            .map(|c| [c.measurement.voltage, c.measurement.power()])
    }

    /// Energy harvested over the recorded cycles, each lasting `period`.
    #[must_use]
    pub fn energy(&self, period: f64) -> f64 {
        self.cycles
            .iter()
            .map(|c| c.measurement.power() * period)
            .sum()
    }

    /// Number of cycles recorded before the first steady-state cycle.
    #[must_use]
    pub fn cycles_to_steady_state(&self) -> Option<usize> {
        self.cycles
            .iter()
            .position(|c| c.phase == Phase::SteadyState)
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.cycles.clear();
        self.transitions.clear();
        self.handoffs.clear();
        self.changes.clear();
    }
}

impl<A> Observer<Event, A> for Recorder {
    fn observe(&mut self, event: &Event) -> Option<A> {
        self.record(event);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use pvtrack_trackers::{GlobalKind, GlobalTracker, LocalKind, TrackerConfig};

    fn curve(v: f64) -> f64 {
        (400.0 - (v - 20.0).powi(2)).max(0.0)
    }

    fn run(tracker: &mut GlobalTracker, recorder: &mut Recorder, cycles: usize) {
        let mut v = 0.0;
        for _ in 0..cycles {
            let current = if v > 0.0 { curve(v) / v } else { 0.0 };
            let m = Measurement::new(v, current, 1000.0, 25.0);
            v = tracker.step_observed(&m, recorder);
        }
    }

    #[test]
    fn records_a_full_lifecycle() {
        let mut config = TrackerConfig {
            global: GlobalKind::VoltageSweep,
            local: LocalKind::PerturbAndObserve,
            ..TrackerConfig::with_cells(50)
        };
        config.sweep.stride = 0.5;

        let mut tracker = GlobalTracker::new(&config).unwrap();
        let mut recorder = Recorder::new();
        run(&mut tracker, &mut recorder, 120);

        assert_eq!(recorder.cycles().len(), 120);
        assert_eq!(recorder.handoffs().len(), 1);
        assert_relative_eq!(recorder.handoffs()[0].vmpp, 20.0);
        assert_eq!(
            recorder.transitions(),
            [
                (Phase::Exploring, Phase::BoundEstablished),
                (Phase::BoundEstablished, Phase::LocalConverging),
                (Phase::LocalConverging, Phase::SteadyState),
            ]
        );
        assert!(recorder.changes().is_empty());

        // 81 probes, the handoff and the kick, then the tenth settling cycle
        // is the first to report steady state.
        assert_eq!(recorder.cycles_to_steady_state(), Some(92));
        assert_eq!(recorder.trace().count(), 120);
    }

    #[test]
    fn energy_sums_power_over_cycles() {
        let mut recorder = Recorder::new();
        for v in [10.0, 20.0] {
            let m = Measurement::new(v, 2.0, 1000.0, 25.0);
            Observer::<Event, ()>::observe(
                &mut recorder,
                &Event::Reference {
                    measurement: m,
                    voltage: v,
                    phase: Phase::Exploring,
                },
            );
        }
        assert_relative_eq!(recorder.energy(0.5), 30.0);

        recorder.clear();
        assert!(recorder.cycles().is_empty());
    }
}

use pvtrack_core::{Measurement, SearchInterval};

use super::Phase;

/// Events emitted by a [`GlobalTracker`](super::GlobalTracker) during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The tracker moved between lifecycle phases.
    PhaseChanged { from: Phase, to: Phase },

    /// Exploration finished and the local strategy received a bound.
    HandedOff { vmpp: f64, interval: SearchInterval },

    /// The change detector fired; exploration restarts this cycle.
    EnvironmentChanged { measurement: Measurement },

    /// The reference voltage chosen for `measurement`, emitted once per step.
    Reference {
        measurement: Measurement,
        voltage: f64,
        phase: Phase,
    },
}

/// Actions an observer can return to steer the tracker.
///
/// Actions take effect from the next step; the voltage already chosen for
/// the current step is still returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Discard the current bound and explore again.
    Reexplore,
}

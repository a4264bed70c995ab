//! Capability traits for tracker-agnostic observers.
//!
//! These traits abstract over tracker event and action types, so an observer
//! written against them works with any tracker whose events expose the
//! capability.
//!
//! # Event traits
//!
//! - [`HasPower`]: events that carry a measured power
//! - [`HasPhase`]: events that report a lifecycle phase
//! - [`PerCycle`]: events that tell per-cycle reports from lifecycle changes
//!
//! # Action traits
//!
//! - [`CanReexplore`]: actions that can force a fresh exploration
//!
//! # Example
//!
//! ```rust
//! use pvtrack_core::Observer;
//! use pvtrack_observers::traits::{CanReexplore, HasPower};
//!
//! /// Re-explores as soon as power drops below a fixed floor.
//! struct Floor(f64);
//!
//! impl<E: HasPower, A: CanReexplore> Observer<E, A> for Floor {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.power() < self.0).then(A::reexplore)
//!     }
//! }
//! ```

use pvtrack_trackers::{Action, Event, Phase};

/// An event that carries a measured power.
pub trait HasPower {
    /// Returns the measured power for this event.
    ///
    /// Returns `f64::NAN` when the event carries no measurement.
    fn power(&self) -> f64;
}

/// An event that reports a lifecycle phase.
pub trait HasPhase {
    /// Returns the phase in force after this event, if the event reports one.
    fn phase(&self) -> Option<Phase>;
}

/// An event stream that mixes per-cycle reports with lifecycle changes.
pub trait PerCycle {
    /// Returns true for events emitted once per control cycle.
    fn per_cycle(&self) -> bool;
}

/// An action type that can force a fresh exploration.
pub trait CanReexplore {
    /// Returns the action that discards the current bound.
    fn reexplore() -> Self;
}

// --- Tracker events ---

impl HasPower for Event {
    fn power(&self) -> f64 {
        match self {
            Event::Reference { measurement, .. } | Event::EnvironmentChanged { measurement } => {
                measurement.power()
            }
            Event::PhaseChanged { .. } | Event::HandedOff { .. } => f64::NAN,
        }
    }
}

impl HasPhase for Event {
    fn phase(&self) -> Option<Phase> {
        match self {
            Event::Reference { phase, .. } => Some(*phase),
            Event::PhaseChanged { to, .. } => Some(*to),
            Event::HandedOff { .. } | Event::EnvironmentChanged { .. } => None,
        }
    }
}

impl PerCycle for Event {
    fn per_cycle(&self) -> bool {
        matches!(self, Event::Reference { .. })
    }
}

impl CanReexplore for Action {
    fn reexplore() -> Self {
        Self::Reexplore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};

    fn reference() -> Event {
        Event::Reference {
            measurement: Measurement::new(30.0, 2.0, 1000.0, 25.0),
            voltage: 30.5,
            phase: Phase::SteadyState,
        }
    }

    #[test]
    fn reference_exposes_every_capability() {
        let event = reference();
        assert_relative_eq!(event.power(), 60.0);
        assert_eq!(event.phase(), Some(Phase::SteadyState));
    }

    #[test]
    fn missing_capabilities_are_nan_or_none() {
        let domain = VoltageDomain::new(50.0).unwrap();
        let handoff = Event::HandedOff {
            vmpp: 25.0,
            interval: SearchInterval::full(&domain),
        };
        assert!(handoff.power().is_nan());
        assert_eq!(handoff.phase(), None);

        let change = Event::PhaseChanged {
            from: Phase::Exploring,
            to: Phase::BoundEstablished,
        };
        assert!(change.power().is_nan());
        assert_eq!(change.phase(), Some(Phase::BoundEstablished));
    }

    #[test]
    fn action_can_reexplore() {
        assert_eq!(Action::reexplore(), Action::Reexplore);
    }
}

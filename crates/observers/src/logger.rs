use std::fmt::Debug;

use log::{Level, log};
use pvtrack_core::Observer;

use crate::traits::PerCycle;

/// An observer that writes events to the [`log`] facade.
///
/// Per-cycle events are logged at `cycle_level`, lifecycle events at
/// `level`. The observer never requests an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogObserver {
    level: Level,
    cycle_level: Level,
    target: &'static str,
}

impl LogObserver {
    /// Logs lifecycle events at `info` and per-cycle events at `trace`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            cycle_level: Level::Trace,
            target: "pvtrack",
        }
    }

    /// Sets the level for lifecycle events.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the level for per-cycle events.
    #[must_use]
    pub fn cycle_level(mut self, level: Level) -> Self {
        self.cycle_level = level;
        self
    }

    /// Sets the log target.
    #[must_use]
    pub fn target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    fn level_for<E: PerCycle>(&self, event: &E) -> Level {
        if event.per_cycle() {
            self.cycle_level
        } else {
            self.level
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, A> Observer<E, A> for LogObserver
where
    E: Debug + PerCycle,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let level = self.level_for(event);
        log!(target: self.target, level, "{event:?}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pvtrack_core::{Measurement, Observer};
    use pvtrack_trackers::{Action, Event, Phase};

    #[test]
    fn levels_split_cycle_and_lifecycle_events() {
        let observer = LogObserver::new().level(Level::Debug);

        let reference = Event::Reference {
            measurement: Measurement::new(30.0, 2.0, 1000.0, 25.0),
            voltage: 30.5,
            phase: Phase::SteadyState,
        };
        let change = Event::PhaseChanged {
            from: Phase::Exploring,
            to: Phase::BoundEstablished,
        };

        assert_eq!(observer.level_for(&reference), Level::Trace);
        assert_eq!(observer.level_for(&change), Level::Debug);
    }

    #[test]
    fn never_requests_an_action() {
        let mut observer = LogObserver::new();
        let event = Event::EnvironmentChanged {
            measurement: Measurement::default(),
        };
        let action: Option<Action> = observer.observe(&event);
        assert_eq!(action, None);
    }
}

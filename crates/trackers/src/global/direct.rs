use pvtrack_core::{Measurement, Observer};

use crate::local::LocalTracker;

use super::{Action, Event, Phase};

/// Forwards every cycle to the local strategy over the full domain.
#[derive(Debug)]
pub(crate) struct Direct {
    local: LocalTracker,
}

impl Direct {
    pub(crate) fn new(local: LocalTracker) -> Self {
        Self { local }
    }

    pub(crate) fn step<O>(&mut self, measurement: &Measurement, observer: &mut O) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        let voltage = self.local.next_reference(measurement);
        let event = Event::Reference {
            measurement: *measurement,
            voltage,
            phase: Phase::LocalConverging,
        };
        if matches!(observer.observe(&event), Some(Action::Reexplore)) {
            self.local.reset();
        }
        voltage
    }

    pub(crate) fn reset(&mut self) {
        self.local.reset();
    }

    pub(crate) fn local(&self) -> &LocalTracker {
        &self.local
    }
}

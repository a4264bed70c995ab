use std::{fmt, mem};

use log::{debug, info, trace};
use pvtrack_core::{ChangeDetector, Measurement, Observer, VoltageDomain};

use crate::{config::HandoffConfig, local::LocalTracker};

use super::{Action, Event, Exploration, Explorer, Handoff};

/// Lifecycle phase of an exploring tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Phase {
    /// The explorer is probing the domain.
    Exploring,

    /// A bound was handed off; the next cycle kicks the local strategy.
    BoundEstablished,

    /// The local strategy runs while the change detector is held off.
    LocalConverging,

    /// The local strategy runs and every sample feeds the change detector.
    SteadyState,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exploring => "exploring",
            Self::BoundEstablished => "bound established",
            Self::LocalConverging => "local converging",
            Self::SteadyState => "steady state",
        })
    }
}

/// Forwards events to an observer and remembers requested actions.
struct Outbox<'a, O: ?Sized> {
    observer: &'a mut O,
    reexplore: bool,
}

impl<O> Outbox<'_, O>
where
    O: Observer<Event, Action> + ?Sized,
{
    fn send(&mut self, event: Event) {
        if matches!(self.observer.observe(&event), Some(Action::Reexplore)) {
            self.reexplore = true;
        }
    }
}

/// Drives an explorer, a local strategy and a change detector through the
/// four-phase lifecycle.
pub(crate) struct Orchestrator {
    domain: VoltageDomain,
    explorer: Box<dyn Explorer>,
    local: LocalTracker,
    detector: Box<dyn ChangeDetector>,
    phase: Phase,
    handoff: Option<Handoff>,
    kick: f64,
    settle_cycles: usize,
    converging: usize,
}

impl Orchestrator {
    pub(crate) fn new(
        domain: VoltageDomain,
        explorer: Box<dyn Explorer>,
        local: LocalTracker,
        detector: Box<dyn ChangeDetector>,
        config: &HandoffConfig,
    ) -> Self {
        Self {
            domain,
            explorer,
            local,
            detector,
            phase: Phase::Exploring,
            handoff: None,
            kick: config.kick,
            settle_cycles: config.settle_cycles,
            converging: 0,
        }
    }

    pub(crate) fn step<O>(&mut self, measurement: &Measurement, observer: &mut O) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        let mut outbox = Outbox {
            observer,
            reexplore: false,
        };

        let voltage = match self.phase {
            Phase::Exploring => self.explore(measurement, &mut outbox),
            Phase::BoundEstablished => self.kick(measurement, &mut outbox),
            Phase::LocalConverging => self.converge(measurement, &mut outbox),
            Phase::SteadyState => self.monitor(measurement, &mut outbox),
        };
        let voltage = self.domain.clamp(voltage);

        trace!(
            "{}: {:.3} V / {:.3} W -> {voltage:.3} V",
            self.phase,
            measurement.voltage,
            measurement.power(),
        );
        outbox.send(Event::Reference {
            measurement: *measurement,
            voltage,
            phase: self.phase,
        });

        if outbox.reexplore {
            self.request_reexploration();
        }
        voltage
    }

    fn explore<O>(&mut self, measurement: &Measurement, outbox: &mut Outbox<'_, O>) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        match self.explorer.explore(measurement) {
            Exploration::Continue(voltage) => voltage,
            Exploration::Complete(handoff) => {
                let Handoff { vmpp, interval } = handoff;
                debug!(
                    "bound established: VMPP {vmpp:.3} V in [{:.3}, {:.3}] V",
                    interval.left(),
                    interval.right(),
                );
                self.local.reset();
                self.local.setup(vmpp, interval);
                self.handoff = Some(handoff);
                outbox.send(Event::HandedOff { vmpp, interval });
                self.enter(Phase::BoundEstablished, outbox);
                vmpp
            }
        }
    }

    /// Primes the local strategy and nudges the operating point so its first
    /// delegated cycle sees a voltage change.
    fn kick<O>(&mut self, measurement: &Measurement, outbox: &mut Outbox<'_, O>) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        self.local.prime(measurement);
        self.converging = 0;
        self.enter(Phase::LocalConverging, outbox);

        // Nudge downward when the bound leaves no room above.
        let up = measurement.voltage + self.kick;
        if up > self.local.interval().right() {
            measurement.voltage - self.kick
        } else {
            up
        }
    }

    fn converge<O>(&mut self, measurement: &Measurement, outbox: &mut Outbox<'_, O>) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        let voltage = self.delegate(measurement);
        self.converging += 1;
        if self.converging >= self.settle_cycles {
            self.detector.reset();
            self.enter(Phase::SteadyState, outbox);
        }
        voltage
    }

    fn monitor<O>(&mut self, measurement: &Measurement, outbox: &mut Outbox<'_, O>) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        if !self.detector.observe(measurement) {
            return self.delegate(measurement);
        }

        info!(
            "environment changed at {:.3} V ({:.1} W/m², {:.1} °C), re-exploring",
            measurement.voltage, measurement.irradiance, measurement.temperature,
        );
        outbox.send(Event::EnvironmentChanged {
            measurement: *measurement,
        });
        self.explorer.restart();
        self.discard();
        self.enter(Phase::Exploring, outbox);
        self.explore(measurement, outbox)
    }

    /// Runs the local strategy, keeping its output inside the handed-off bound.
    fn delegate(&mut self, measurement: &Measurement) -> f64 {
        let voltage = self.local.next_reference(measurement);
        self.local.interval().clamp(voltage)
    }

    fn enter<O>(&mut self, to: Phase, outbox: &mut Outbox<'_, O>)
    where
        O: Observer<Event, Action> + ?Sized,
    {
        let from = mem::replace(&mut self.phase, to);
        debug!("phase {from} -> {to}");
        outbox.send(Event::PhaseChanged { from, to });
    }

    fn discard(&mut self) {
        self.local.reset();
        self.detector.reset();
        self.handoff = None;
        self.converging = 0;
    }

    /// Abandons the current bound; a no-op while already exploring.
    pub(crate) fn request_reexploration(&mut self) {
        if self.phase == Phase::Exploring {
            return;
        }
        debug!("re-exploration requested during {}", self.phase);
        self.explorer.restart();
        self.discard();
        self.phase = Phase::Exploring;
    }

    pub(crate) fn reset(&mut self) {
        self.explorer.reset();
        self.discard();
        self.phase = Phase::Exploring;
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn handoff(&self) -> Option<Handoff> {
        self.handoff
    }

    pub(crate) fn local(&self) -> &LocalTracker {
        &self.local
    }

    pub(crate) fn domain(&self) -> VoltageDomain {
        self.domain
    }
}

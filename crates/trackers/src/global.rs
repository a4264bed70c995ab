//! Global search and the tracker lifecycle.
//!
//! A [`GlobalTracker`] owns one local strategy. With [`GlobalKind::Direct`]
//! it forwards every cycle to that strategy over the full domain. Every other
//! kind pairs an [`Explorer`] with the local strategy and moves through the
//! [`Phase`]s: the explorer probes the domain until it can hand off a bound,
//! the local strategy is kicked and converges inside that bound, and a change
//! detector watches the steady state for shifts that call for a fresh
//! exploration.

mod annealing;
mod direct;
mod event;
mod explorer;
mod firefly;
mod orchestrator;
mod swarm;
mod sweep;
mod trapezium;

use std::fmt;

use pvtrack_core::{ChangeDetector, Measurement, Observer, VoltageDomain};

use crate::{
    EnvironmentMonitor, LocalKind, StrideKind,
    config::{ConfigError, TrackerConfig},
    local::LocalTracker,
    names,
};

pub use annealing::SimulatedAnnealing;
pub use event::{Action, Event};
pub use explorer::{Exploration, Explorer, Handoff, Sample};
pub use firefly::{Firefly, Glow};
pub use orchestrator::Phase;
pub use swarm::{Particle, ParticleSwarm};
pub use sweep::VoltageSweep;
pub use trapezium::Trapezium;

use direct::Direct;
use orchestrator::Orchestrator;

/// The available global strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum GlobalKind {
    /// The `Default` strategy: no exploration, local search over the domain.
    #[default]
    Direct,
    VoltageSweep,
    ParticleSwarm,
    SimulatedAnnealing,
    Firefly,
    Trapezium,
}

impl GlobalKind {
    const NAMES: &[(Self, &[&str])] = &[
        (Self::Direct, &["Default", "Direct"]),
        (Self::VoltageSweep, &["VoltageSweep", "Voltage Sweep", "Sweep"]),
        (
            Self::ParticleSwarm,
            &["ParticleSwarm", "Particle Swarm", "PSO"],
        ),
        (
            Self::SimulatedAnnealing,
            &["SimulatedAnnealing", "Simulated Annealing", "SA"],
        ),
        (Self::Firefly, &["Firefly"]),
        (
            Self::Trapezium,
            &["Trapezium", "TrapeziumMethod", "Trapezium Method"],
        ),
    ];

    /// All variants, in configuration order.
    pub const ALL: [Self; 6] = [
        Self::Direct,
        Self::VoltageSweep,
        Self::ParticleSwarm,
        Self::SimulatedAnnealing,
        Self::Firefly,
        Self::Trapezium,
    ];

    /// Resolves a global strategy by name, falling back to
    /// [`GlobalKind::Direct`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        names::resolve("global", name, Self::NAMES, Self::Direct)
    }

    /// Returns the canonical configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "Default",
            Self::VoltageSweep => "VoltageSweep",
            Self::ParticleSwarm => "ParticleSwarm",
            Self::SimulatedAnnealing => "SimulatedAnnealing",
            Self::Firefly => "Firefly",
            Self::Trapezium => "Trapezium",
        }
    }
}

impl fmt::Display for GlobalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for GlobalKind {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for GlobalKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<GlobalKind> for String {
    fn from(kind: GlobalKind) -> Self {
        kind.name().to_owned()
    }
}

enum Engine {
    Direct(Direct),
    Search(Orchestrator),
}

/// A configured global strategy and the local strategy it hands off to.
///
/// Every returned reference voltage lies in `[0, MAX_VOLTAGE]`.
pub struct GlobalTracker {
    kind: GlobalKind,
    engine: Engine,
}

impl GlobalTracker {
    /// Creates the strategies named by `config`.
    ///
    /// Steady-state monitoring uses an [`EnvironmentMonitor`] when
    /// `config.environment.enabled` is set and never re-explores otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: &TrackerConfig) -> Result<Self, ConfigError> {
        let detector: Box<dyn ChangeDetector> = if config.environment.enabled {
            Box::new(EnvironmentMonitor::new(&config.environment))
        } else {
            Box::new(())
        };
        Self::with_detector(config, detector)
    }

    /// Creates the strategies named by `config` with a custom change detector.
    ///
    /// The detector is ignored by [`GlobalKind::Direct`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn with_detector(
        config: &TrackerConfig,
        detector: Box<dyn ChangeDetector>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let domain = config.domain()?;
        let local = LocalTracker::build(config, domain);

        let explorer: Box<dyn Explorer> = match config.global {
            GlobalKind::Direct => {
                return Ok(Self {
                    kind: config.global,
                    engine: Engine::Direct(Direct::new(local)),
                });
            }
            GlobalKind::VoltageSweep => Box::new(VoltageSweep::new(domain, &config.sweep)),
            GlobalKind::ParticleSwarm => {
                Box::new(ParticleSwarm::new(domain, &config.swarm, config.seed))
            }
            GlobalKind::SimulatedAnnealing => Box::new(SimulatedAnnealing::new(
                domain,
                &config.annealing,
                config.seed,
            )),
            GlobalKind::Firefly => Box::new(Firefly::new(domain, &config.firefly, config.seed)),
            GlobalKind::Trapezium => Box::new(Trapezium::new(domain, &config.trapezium)),
        };

        Ok(Self {
            kind: config.global,
            engine: Engine::Search(Orchestrator::new(
                domain,
                explorer,
                local,
                detector,
                &config.handoff,
            )),
        })
    }

    /// Consumes one measurement and returns the next reference voltage.
    pub fn step(&mut self, measurement: &Measurement) -> f64 {
        self.step_observed(measurement, &mut ())
    }

    /// Like [`step`](Self::step), reporting [`Event`]s to `observer`.
    ///
    /// An [`Action`] returned for any event takes effect from the next step.
    pub fn step_observed<O>(&mut self, measurement: &Measurement, observer: &mut O) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        match &mut self.engine {
            Engine::Direct(direct) => direct.step(measurement, observer),
            Engine::Search(search) => search.step(measurement, observer),
        }
    }

    /// Restores the construction-time state, including random seeds.
    pub fn reset(&mut self) {
        match &mut self.engine {
            Engine::Direct(direct) => direct.reset(),
            Engine::Search(search) => search.reset(),
        }
    }

    /// Abandons the current bound so the next step starts a fresh exploration.
    ///
    /// A no-op while exploring. With [`GlobalKind::Direct`] the local strategy
    /// restarts over the full domain.
    pub fn request_reexploration(&mut self) {
        match &mut self.engine {
            Engine::Direct(direct) => direct.reset(),
            Engine::Search(search) => search.request_reexploration(),
        }
    }

    /// Returns the global strategy kind.
    #[must_use]
    pub fn kind(&self) -> GlobalKind {
        self.kind
    }

    /// Returns the local strategy kind.
    #[must_use]
    pub fn local_kind(&self) -> LocalKind {
        self.local().kind()
    }

    /// Returns the stride model kind.
    #[must_use]
    pub fn stride_kind(&self) -> StrideKind {
        self.local().stride_kind()
    }

    /// Returns the current lifecycle phase.
    ///
    /// [`GlobalKind::Direct`] is always [`Phase::LocalConverging`].
    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.engine {
            Engine::Direct(_) => Phase::LocalConverging,
            Engine::Search(search) => search.phase(),
        }
    }

    /// Returns the bound handed to the local strategy, if one is in force.
    #[must_use]
    pub fn handoff(&self) -> Option<Handoff> {
        match &self.engine {
            Engine::Direct(_) => None,
            Engine::Search(search) => search.handoff(),
        }
    }

    /// Returns the local strategy.
    #[must_use]
    pub fn local(&self) -> &LocalTracker {
        match &self.engine {
            Engine::Direct(direct) => direct.local(),
            Engine::Search(search) => search.local(),
        }
    }

    /// Returns the voltage domain.
    #[must_use]
    pub fn domain(&self) -> VoltageDomain {
        match &self.engine {
            Engine::Direct(direct) => direct.local().domain(),
            Engine::Search(search) => search.domain(),
        }
    }
}

impl fmt::Debug for GlobalTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalTracker")
            .field("kind", &self.kind)
            .field("local", self.local())
            .field("phase", &self.phase())
            .field("handoff", &self.handoff())
            .finish()
    }
}

#[cfg(test)]
mod tests;

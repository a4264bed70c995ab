use log::info;
use pvtrack_core::{Measurement, Observer, VoltageDomain};

use crate::{
    Action, ConfigError, Event, GlobalKind, GlobalTracker, LocalKind, Phase, StrideKind,
    TrackerConfig,
};

/// A maximum power point tracker driven one measurement per cycle.
///
/// Owns exactly one [`GlobalTracker`] built from a [`TrackerConfig`];
/// [`reconfigure`](Self::reconfigure) swaps strategies between cycles.
///
/// # Example
///
/// ```
/// use pvtrack_core::Measurement;
/// use pvtrack_trackers::{GlobalKind, LocalKind, Mppt, TrackerConfig};
///
/// let config = TrackerConfig {
///     global: GlobalKind::VoltageSweep,
///     local: LocalKind::PerturbAndObserve,
///     ..TrackerConfig::with_cells(60)
/// };
/// let mut mppt = Mppt::new(config).unwrap();
///
/// let v = mppt.step(&Measurement::new(0.0, 0.0, 1000.0, 25.0));
/// assert_eq!(v, 0.0);
/// ```
#[derive(Debug)]
pub struct Mppt {
    config: TrackerConfig,
    tracker: GlobalTracker,
}

impl Mppt {
    /// Builds the tracker described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        let tracker = GlobalTracker::new(&config)?;
        announce(&tracker);
        Ok(Self { config, tracker })
    }

    /// Consumes one measurement and returns the next reference voltage.
    pub fn step(&mut self, measurement: &Measurement) -> f64 {
        self.tracker.step(measurement)
    }

    /// Like [`step`](Self::step), reporting [`Event`]s to `observer`.
    pub fn step_observed<O>(&mut self, measurement: &Measurement, observer: &mut O) -> f64
    where
        O: Observer<Event, Action> + ?Sized,
    {
        self.tracker.step_observed(measurement, observer)
    }

    /// Restores the construction-time state.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    /// Abandons the current bound; see [`GlobalTracker::request_reexploration`].
    pub fn request_reexploration(&mut self) {
        self.tracker.request_reexploration();
    }

    /// Replaces the strategies with those described by `config`.
    ///
    /// The current tracker is reset before it is replaced. On error nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn reconfigure(&mut self, config: TrackerConfig) -> Result<(), ConfigError> {
        let tracker = GlobalTracker::new(&config)?;
        self.tracker.reset();
        self.tracker = tracker;
        self.config = config;
        announce(&self.tracker);
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[must_use]
    pub fn tracker(&self) -> &GlobalTracker {
        &self.tracker
    }

    #[must_use]
    pub fn global_kind(&self) -> GlobalKind {
        self.tracker.kind()
    }

    #[must_use]
    pub fn local_kind(&self) -> LocalKind {
        self.tracker.local_kind()
    }

    #[must_use]
    pub fn stride_kind(&self) -> StrideKind {
        self.tracker.stride_kind()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.tracker.phase()
    }

    #[must_use]
    pub fn domain(&self) -> VoltageDomain {
        self.tracker.domain()
    }
}

fn announce(tracker: &GlobalTracker) {
    info!(
        "tracking with {} / {} / {} stride over [0, {}] V",
        tracker.kind(),
        tracker.local_kind(),
        tracker.stride_kind(),
        tracker.domain().max_voltage(),
    );
}

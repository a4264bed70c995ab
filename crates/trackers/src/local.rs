//! Local convergence strategies.
//!
//! Each strategy assumes the P-V curve is unimodal inside its
//! [`SearchInterval`] and advances a closed per-cycle state machine, consuming
//! one measurement and emitting one reference voltage per call.

mod bisection;
mod feedback_control;
mod fuzzy;
mod golden;
mod hold;
mod incremental_conductance;
mod perturb_observe;
mod ternary;

use std::fmt;

use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};

use crate::{
    StrideKind, StrideModel,
    config::{ConfigError, TrackerConfig},
    names,
};

pub use bisection::Bisection;
pub use feedback_control::FeedbackControl;
pub use fuzzy::FuzzyLogic;
pub use golden::Golden;
pub use hold::Hold;
pub use incremental_conductance::IncrementalConductance;
pub use perturb_observe::PerturbAndObserve;
pub use ternary::Ternary;

/// A per-cycle local search algorithm.
pub trait LocalSearch {
    /// Consumes one measurement and returns the next reference voltage.
    fn next_reference(&mut self, measurement: &Measurement) -> f64;

    /// Installs a new VMPP estimate and search interval.
    ///
    /// Called by the global layer after [`reset`](LocalSearch::reset) when a
    /// bound is handed off.
    fn setup(&mut self, vmpp: f64, interval: SearchInterval);

    /// Records `measurement` as the previous sample without emitting a voltage.
    ///
    /// Used for the kick cycle so the first delegated cycle has a gradient.
    fn prime(&mut self, measurement: &Measurement);

    /// Restores the construction-time state.
    fn reset(&mut self);

    /// Returns the interval currently trusted to be unimodal.
    fn interval(&self) -> SearchInterval;
}

/// The available local strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum LocalKind {
    /// The `Default` strategy: hold the measured voltage.
    #[default]
    Hold,
    Bisection,
    Golden,
    Ternary,
    PerturbAndObserve,
    IncrementalConductance,
    FeedbackControl,
    FuzzyLogic,
}

impl LocalKind {
    const NAMES: &[(Self, &[&str])] = &[
        (Self::Hold, &["Default", "Hold"]),
        (Self::Bisection, &["Bisection"]),
        (Self::Golden, &["Golden", "GoldenSection"]),
        (Self::Ternary, &["Ternary"]),
        (Self::PerturbAndObserve, &["PandO", "PerturbAndObserve"]),
        (Self::IncrementalConductance, &["IC", "IncrementalConductance"]),
        (Self::FeedbackControl, &["FC", "FeedbackControl"]),
        (Self::FuzzyLogic, &["FuzzyLogic", "Fuzzy", "Fuzzy Logic"]),
    ];

    /// All variants, in configuration order.
    pub const ALL: [Self; 8] = [
        Self::Hold,
        Self::Bisection,
        Self::FeedbackControl,
        Self::Golden,
        Self::IncrementalConductance,
        Self::PerturbAndObserve,
        Self::Ternary,
        Self::FuzzyLogic,
    ];

    /// Resolves a local strategy by name, falling back to [`LocalKind::Hold`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        names::resolve("local", name, Self::NAMES, Self::Hold)
    }

    /// Returns the canonical configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hold => "Default",
            Self::Bisection => "Bisection",
            Self::Golden => "Golden",
            Self::Ternary => "Ternary",
            Self::PerturbAndObserve => "PandO",
            Self::IncrementalConductance => "IC",
            Self::FeedbackControl => "FC",
            Self::FuzzyLogic => "FuzzyLogic",
        }
    }
}

impl fmt::Display for LocalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for LocalKind {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for LocalKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<LocalKind> for String {
    fn from(kind: LocalKind) -> Self {
        kind.name().to_owned()
    }
}

/// A configured local strategy bound to a voltage domain.
///
/// Every emitted reference voltage is clamped to `[0, MAX_VOLTAGE]`.
pub struct LocalTracker {
    kind: LocalKind,
    stride_kind: StrideKind,
    domain: VoltageDomain,
    search: Box<dyn LocalSearch>,
}

impl LocalTracker {
    /// Creates the local strategy named by `config.local`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: &TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, config.domain()?))
    }

    /// Builds from an already validated configuration.
    pub(crate) fn build(config: &TrackerConfig, domain: VoltageDomain) -> Self {
        let stride = StrideModel::new(config.stride, &config.strides, config.num_cells);
        let locals = &config.locals;

        let search: Box<dyn LocalSearch> = match config.local {
            LocalKind::Hold => Box::new(Hold::new(domain)),
            LocalKind::Bisection => Box::new(Bisection::new(domain, locals.bisection_tolerance)),
            LocalKind::Golden => Box::new(Golden::new(domain)),
            LocalKind::Ternary => Box::new(Ternary::new(domain)),
            LocalKind::PerturbAndObserve => Box::new(PerturbAndObserve::new(domain, stride)),
            LocalKind::IncrementalConductance => Box::new(IncrementalConductance::new(
                domain,
                stride,
                locals.incremental_conductance_tolerance,
            )),
            LocalKind::FeedbackControl => Box::new(FeedbackControl::new(
                domain,
                stride,
                locals.feedback_control_tolerance,
            )),
            LocalKind::FuzzyLogic => Box::new(FuzzyLogic::new(
                domain,
                &locals.fuzzy,
                config.num_cells,
            )),
        };

        Self {
            kind: config.local,
            stride_kind: config.stride,
            domain,
            search,
        }
    }

    /// Consumes one measurement and returns the next reference voltage.
    pub fn next_reference(&mut self, measurement: &Measurement) -> f64 {
        self.domain.clamp(self.search.next_reference(measurement))
    }

    /// Installs a new VMPP estimate and search interval.
    pub fn setup(&mut self, vmpp: f64, interval: SearchInterval) {
        self.search.setup(vmpp, interval);
    }

    /// Records `measurement` as the previous sample.
    pub fn prime(&mut self, measurement: &Measurement) {
        self.search.prime(measurement);
    }

    /// Restores the construction-time state.
    pub fn reset(&mut self) {
        self.search.reset();
    }

    /// Returns the interval currently trusted to be unimodal.
    #[must_use]
    pub fn interval(&self) -> SearchInterval {
        self.search.interval()
    }

    /// Returns the strategy kind.
    #[must_use]
    pub fn kind(&self) -> LocalKind {
        self.kind
    }

    /// Returns the configured stride model kind.
    #[must_use]
    pub fn stride_kind(&self) -> StrideKind {
        self.stride_kind
    }

    /// Returns the voltage domain.
    #[must_use]
    pub fn domain(&self) -> VoltageDomain {
        self.domain
    }
}

impl fmt::Debug for LocalTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTracker")
            .field("kind", &self.kind)
            .field("stride_kind", &self.stride_kind)
            .field("domain", &self.domain)
            .field("interval", &self.interval())
            .finish_non_exhaustive()
    }
}

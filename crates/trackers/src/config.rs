//! Tracker configuration.
//!
//! Every section has defaults matching the reference tuning, so a partial
//! configuration file only needs to name what it changes. Numeric values are
//! checked once by [`TrackerConfig::validate`]; algorithm names never fail and
//! instead resolve to a documented default variant.

use pvtrack_core::{DomainError, VoltageDomain};
use thiserror::Error;

use crate::{GlobalKind, LocalKind, StrideKind};

/// Errors that can occur when validating a [`TrackerConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0} must be finite and positive")]
    NotPositive(&'static str),

    #[error("{0} must be finite and non-negative")]
    Negative(&'static str),

    #[error("{0} must lie in [0, 1)")]
    NotFraction(&'static str),

    #[error("{0} must be at least one")]
    Empty(&'static str),

    #[error("{0}")]
    Inconsistent(&'static str),
}

/// Complete configuration of one tracking instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TrackerConfig {
    /// Number of series cells; sets `MAX_VOLTAGE`.
    pub num_cells: u32,

    /// Global search strategy.
    pub global: GlobalKind,

    /// Local convergence strategy.
    pub local: LocalKind,

    /// Step-size model used by the hill-climbing local strategies.
    pub stride: StrideKind,

    /// Seed for the stochastic global strategies.
    pub seed: u64,

    pub strides: StrideConfig,
    pub locals: LocalConfig,
    pub handoff: HandoffConfig,
    pub environment: EnvironmentConfig,
    pub sweep: SweepConfig,
    pub swarm: SwarmConfig,
    pub annealing: AnnealingConfig,
    pub firefly: FireflyConfig,
    pub trapezium: TrapeziumConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            num_cells: 1,
            global: GlobalKind::default(),
            local: LocalKind::default(),
            stride: StrideKind::default(),
            seed: 0,
            strides: StrideConfig::default(),
            locals: LocalConfig::default(),
            handoff: HandoffConfig::default(),
            environment: EnvironmentConfig::default(),
            sweep: SweepConfig::default(),
            swarm: SwarmConfig::default(),
            annealing: AnnealingConfig::default(),
            firefly: FireflyConfig::default(),
            trapezium: TrapeziumConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Creates a default configuration for `num_cells` series cells.
    #[must_use]
    pub fn with_cells(num_cells: u32) -> Self {
        Self {
            num_cells,
            ..Self::default()
        }
    }

    /// Returns the voltage domain implied by `num_cells`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Domain`] if `num_cells` is zero.
    pub fn domain(&self) -> Result<VoltageDomain, ConfigError> {
        Ok(VoltageDomain::from_cells(self.num_cells)?)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.domain()?;
        self.strides.validate()?;
        self.locals.validate()?;
        self.handoff.validate()?;
        self.environment.validate()?;
        self.sweep.validate()?;
        self.swarm.validate()?;
        self.annealing.validate()?;
        self.firefly.validate()?;
        self.trapezium.validate()
    }
}

/// Stride model tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct StrideConfig {
    /// Smallest step any model returns, in V.
    pub min_stride: f64,

    /// Initial VMPP estimate per cell, in V.
    pub vmpp_per_cell: f64,

    /// Fractional error bound `k` of the VMPP estimate.
    pub error: f64,

    /// Gain applied to a positive `dP/dV` by the bisection stride.
    pub slope_multiplier: f64,

    /// Voltage change below which the bisection stride treats a sample as noise.
    pub min_voltage_change: f64,

    /// Power change below which the bisection stride treats a sample as noise.
    pub min_power_change: f64,
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self {
            min_stride: 0.01,
            vmpp_per_cell: 0.621,
            error: 0.05,
            slope_multiplier: 0.01,
            min_voltage_change: 0.001,
            min_power_change: 0.01,
        }
    }
}

impl StrideConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("strides.min_stride", self.min_stride)?;
        positive("strides.vmpp_per_cell", self.vmpp_per_cell)?;
        fraction("strides.error", self.error)?;
        non_negative("strides.slope_multiplier", self.slope_multiplier)?;
        non_negative("strides.min_voltage_change", self.min_voltage_change)?;
        non_negative("strides.min_power_change", self.min_power_change)
    }
}

/// Local strategy tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LocalConfig {
    /// `|dP/dV|` at or below which Bisection holds position.
    pub bisection_tolerance: f64,

    /// `|ΔI·V + I·ΔV|` at or below which Incremental Conductance holds.
    pub incremental_conductance_tolerance: f64,

    /// `|dP/dV|` below which Feedback Control holds.
    pub feedback_control_tolerance: f64,

    pub fuzzy: FuzzyConfig,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            bisection_tolerance: 0.01,
            incremental_conductance_tolerance: 0.01,
            feedback_control_tolerance: 0.05,
            fuzzy: FuzzyConfig::default(),
        }
    }
}

impl LocalConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("locals.bisection_tolerance", self.bisection_tolerance)?;
        non_negative(
            "locals.incremental_conductance_tolerance",
            self.incremental_conductance_tolerance,
        )?;
        non_negative(
            "locals.feedback_control_tolerance",
            self.feedback_control_tolerance,
        )?;
        self.fuzzy.validate()
    }
}

/// Normalization limits of the fuzzy controller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FuzzyConfig {
    /// Probe voltage emitted on the first cycle, in V.
    pub min_voltage: f64,

    /// Upper output limit per cell, in V.
    pub max_voltage_per_cell: f64,

    /// Rated power per cell used to normalize `ΔP`, in W.
    pub max_power_per_cell: f64,

    /// Rated current used to normalize `ΔI`, in A.
    pub max_current: f64,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            min_voltage: 0.05,
            max_voltage_per_cell: 0.721,
            max_power_per_cell: 3.63,
            max_current: 6.15,
        }
    }
}

impl FuzzyConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("locals.fuzzy.min_voltage", self.min_voltage)?;
        positive(
            "locals.fuzzy.max_voltage_per_cell",
            self.max_voltage_per_cell,
        )?;
        positive("locals.fuzzy.max_power_per_cell", self.max_power_per_cell)?;
        positive("locals.fuzzy.max_current", self.max_current)
    }
}

/// Global-to-local handoff tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HandoffConfig {
    /// Perturbation applied once after the bound is established, in V.
    pub kick: f64,

    /// Local cycles after the kick before steady-state monitoring begins.
    pub settle_cycles: usize,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            kick: 0.02,
            settle_cycles: 10,
        }
    }
}

impl HandoffConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("handoff.kick", self.kick)
    }
}

/// Environmental change detection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EnvironmentConfig {
    /// Whether steady-state trackers watch for environment changes.
    pub enabled: bool,

    /// Power samples per rolling average.
    pub window: usize,

    /// Rolling averages kept for comparison.
    pub averages: usize,

    /// Relative change in average power that signals a new environment.
    pub power_change: f64,

    /// Relative irradiance shift from lock-in that signals a new environment.
    pub irradiance_change: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: 10,
            averages: 10,
            power_change: 0.3,
            irradiance_change: 0.2,
        }
    }
}

impl EnvironmentConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least_one("environment.window", self.window)?;
        at_least_one("environment.averages", self.averages)?;
        positive("environment.power_change", self.power_change)?;
        positive("environment.irradiance_change", self.irradiance_change)
    }
}

/// Voltage sweep tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SweepConfig {
    /// Voltage increment between sweep samples, in V.
    pub stride: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { stride: 0.01 }
    }
}

impl SweepConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sweep.stride", self.stride)
    }
}

/// Particle swarm tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SwarmConfig {
    /// Population size.
    pub agents: usize,

    /// Velocity inertia `w`.
    pub inertia: f64,

    /// Personal-best attraction `c1`.
    pub cognitive: f64,

    /// Global-best attraction `c2`.
    pub social: f64,

    /// Total exploration cycles before handoff.
    pub budget: usize,

    /// Fraction of the seeding gap each agent is randomly offset by.
    pub jitter: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            agents: 4,
            inertia: 0.4,
            cognitive: 0.02,
            social: 0.5,
            budget: 45,
            jitter: 1.0,
        }
    }
}

impl SwarmConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least_one("swarm.agents", self.agents)?;
        non_negative("swarm.inertia", self.inertia)?;
        non_negative("swarm.cognitive", self.cognitive)?;
        non_negative("swarm.social", self.social)?;
        at_least_one("swarm.budget", self.budget)?;
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(ConfigError::Inconsistent("swarm.jitter must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Simulated annealing tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temperature: f64,

    /// Temperature at which exploration ends.
    pub min_temperature: f64,

    /// Multiplicative cooling factor applied after each temperature stage.
    pub cooling: f64,

    /// Candidate samples evaluated per temperature stage.
    pub samples_per_temperature: usize,

    /// Half-width of the handed-off interval as a fraction of `MAX_VOLTAGE`.
    pub window: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 25.0,
            min_temperature: 0.3,
            cooling: 0.8,
            samples_per_temperature: 4,
            window: 0.1,
        }
    }
}

impl AnnealingConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("annealing.initial_temperature", self.initial_temperature)?;
        positive("annealing.min_temperature", self.min_temperature)?;
        if self.min_temperature >= self.initial_temperature {
            return Err(ConfigError::Inconsistent(
                "annealing.min_temperature must be below annealing.initial_temperature",
            ));
        }
        if !(self.cooling > 0.0 && self.cooling < 1.0) {
            return Err(ConfigError::Inconsistent(
                "annealing.cooling must lie in (0, 1)",
            ));
        }
        at_least_one(
            "annealing.samples_per_temperature",
            self.samples_per_temperature,
        )?;
        positive("annealing.window", self.window)
    }
}

/// Firefly tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FireflyConfig {
    /// Population size.
    pub fireflies: usize,

    /// Attractiveness `β0` at zero distance.
    pub attraction: f64,

    /// Light absorption `γ` on distances normalized by `MAX_VOLTAGE`.
    pub absorption: f64,

    /// Random step amplitude as a fraction of `MAX_VOLTAGE`.
    pub randomness: f64,

    /// Factor applied to the random step after every generation.
    pub randomness_decay: f64,

    /// Generations evaluated before handoff.
    pub generations: usize,

    /// Half-width of the handed-off interval as a fraction of `MAX_VOLTAGE`.
    pub window: f64,
}

impl Default for FireflyConfig {
    fn default() -> Self {
        Self {
            fireflies: 6,
            attraction: 1.0,
            absorption: 2.0,
            randomness: 0.05,
            randomness_decay: 0.9,
            generations: 8,
            window: 0.1,
        }
    }
}

impl FireflyConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least_one("firefly.fireflies", self.fireflies)?;
        non_negative("firefly.attraction", self.attraction)?;
        non_negative("firefly.absorption", self.absorption)?;
        non_negative("firefly.randomness", self.randomness)?;
        non_negative("firefly.randomness_decay", self.randomness_decay)?;
        at_least_one("firefly.generations", self.generations)?;
        positive("firefly.window", self.window)
    }
}

/// Trapezium method tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TrapeziumConfig {
    /// Voltage increment between samples, in V.
    pub stride: f64,
}

impl Default for TrapeziumConfig {
    fn default() -> Self {
        Self { stride: 0.05 }
    }
}

impl TrapeziumConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("trapezium.stride", self.stride)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive(name))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative(name))
    }
}

fn fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotFraction(name))
    }
}

fn at_least_one(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Empty(name))
    } else {
        Ok(())
    }
}

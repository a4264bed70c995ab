//! Step-size models for the hill-climbing local strategies.
//!
//! A [`StrideModel`] turns the latest measurement into a non-negative voltage
//! step. Models that depend on a VMPP estimate are retargeted by the global
//! layer through [`StrideModel::setup`] whenever a new bound is handed off.

mod bisection;

use std::fmt;

use pvtrack_core::Measurement;

use crate::{config::StrideConfig, names};

use bisection::BisectionStride;

/// The available stride models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum StrideKind {
    /// Constant minimum stride.
    #[default]
    Fixed,

    /// Exponential approach toward the VMPP estimate from below.
    Adaptive,

    /// Secant-driven stride that halves back on a negative slope.
    Bisection,

    /// Distance to the VMPP estimate plus an error floor.
    Optimal,
}

impl StrideKind {
    const NAMES: &[(Self, &[&str])] = &[
        (Self::Fixed, &["Fixed"]),
        (Self::Adaptive, &["Adaptive"]),
        (Self::Bisection, &["Bisection"]),
        (Self::Optimal, &["Optimal"]),
    ];

    /// Resolves a stride model by name, falling back to [`StrideKind::Fixed`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        names::resolve("stride", name, Self::NAMES, Self::Fixed)
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Adaptive => "Adaptive",
            Self::Bisection => "Bisection",
            Self::Optimal => "Optimal",
        }
    }
}

impl fmt::Display for StrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for StrideKind {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for StrideKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<StrideKind> for String {
    fn from(kind: StrideKind) -> Self {
        kind.name().to_owned()
    }
}

/// The VMPP estimate a stride model steers toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Estimated maximum power point voltage, in V.
    pub vmpp: f64,

    /// Fractional error bound `k` of the estimate.
    pub error: f64,
}

impl Target {
    /// Returns the error floor `k²·VMPP / (2·(1 − k))`.
    #[must_use]
    pub fn floor(&self) -> f64 {
        let k = self.error;
        k * k * self.vmpp / (2.0 * (1.0 - k))
    }
}

#[derive(Debug, Clone)]
enum Model {
    Fixed,
    Adaptive,
    Bisection(BisectionStride),
    Optimal,
}

/// A configured stride model.
#[derive(Debug, Clone)]
pub struct StrideModel {
    kind: StrideKind,
    model: Model,
    min_stride: f64,
    target: Target,
    initial: Target,
}

impl StrideModel {
    /// Creates a stride model of `kind` for an array of `num_cells` cells.
    #[must_use]
    pub fn new(kind: StrideKind, config: &StrideConfig, num_cells: u32) -> Self {
        let model = match kind {
            StrideKind::Fixed => Model::Fixed,
            StrideKind::Adaptive => Model::Adaptive,
            StrideKind::Bisection => Model::Bisection(BisectionStride::new(config)),
            StrideKind::Optimal => Model::Optimal,
        };
        let initial = Target {
            vmpp: config.vmpp_per_cell * f64::from(num_cells),
            error: config.error,
        };
        Self {
            kind,
            model,
            min_stride: config.min_stride,
            target: initial,
            initial,
        }
    }

    /// Returns the step size for `measurement`.
    ///
    /// The result is always finite and non-negative; a degenerate computation
    /// falls back to the minimum stride.
    pub fn stride(&mut self, measurement: &Measurement) -> f64 {
        let v = measurement.voltage;
        let stride = match &mut self.model {
            Model::Fixed => self.min_stride,
            Model::Adaptive => {
                let distance = self.target.vmpp - v;
                // Never step past the target.
                let approach = if distance > 0.0 {
                    (distance / 3.0).exp_m1().min(distance)
                } else {
                    0.0
                };
                approach + self.target.floor()
            }
            Model::Bisection(model) => model.stride(measurement, self.min_stride),
            Model::Optimal => (self.target.vmpp - v).abs() + self.target.floor(),
        };

        if stride.is_finite() && stride >= 0.0 {
            stride
        } else {
            self.min_stride
        }
    }

    /// Retargets the model at a new VMPP estimate and error bound.
    pub fn setup(&mut self, vmpp: f64, error: f64) {
        self.target = Target { vmpp, error };
    }

    /// Seeds the model's history with `measurement` without producing a step.
    pub fn prime(&mut self, measurement: &Measurement) {
        if let Model::Bisection(model) = &mut self.model {
            model.prime(measurement);
        }
    }

    /// Clears history; the current target is kept.
    pub fn reset(&mut self) {
        if let Model::Bisection(model) = &mut self.model {
            model.reset();
        }
    }

    /// Clears history and restores the construction-time target.
    pub fn restore(&mut self) {
        self.reset();
        self.target = self.initial;
    }

    /// Returns the model kind.
    #[must_use]
    pub fn kind(&self) -> StrideKind {
        self.kind
    }

    /// Returns the current target.
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    /// Returns the minimum stride.
    #[must_use]
    pub fn min_stride(&self) -> f64 {
        self.min_stride
    }
}

//! Maximum power point tracking for photovoltaic arrays.
//!
//! A tracker consumes one [`Measurement`](pvtrack_core::Measurement) per
//! control cycle and returns the reference voltage the array should operate at
//! next. Tracking is layered:
//!
//! - [`stride`]: step-size models for the hill-climbing local strategies
//! - [`local`]: strategies that converge on the peak of a unimodal interval
//! - [`global`]: explorers that locate the global peak of a shaded curve and
//!   hand a bound to the local strategy, plus the lifecycle that ties the two
//!   together with a change detector
//!
//! [`Mppt`] is the single entry point a driver needs: build it from a
//! [`TrackerConfig`], call [`Mppt::step`] each cycle, and swap strategies with
//! [`Mppt::reconfigure`].

pub mod config;
pub mod global;
pub mod local;
pub mod stride;

mod environment;
mod mppt;
mod names;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, TrackerConfig};
pub use environment::EnvironmentMonitor;
pub use global::{Action, Event, GlobalKind, GlobalTracker, Handoff, Phase};
pub use local::{LocalKind, LocalTracker};
pub use mppt::Mppt;
pub use stride::{StrideKind, StrideModel};

//! Core types for photovoltaic maximum power point tracking.
//!
//! This crate defines the shared vocabulary that stride models, local search
//! algorithms and global search algorithms build on:
//!
//! - [`Measurement`]: one sample of array voltage, current, irradiance and
//!   temperature, supplied by the driver each control cycle
//! - [`History`]: an algorithm's memory of the previous cycle's sample
//! - [`VoltageDomain`]: the universal voltage range `[0, MAX_VOLTAGE]`
//!   derived from the cell count
//! - [`SearchInterval`]: the sub-range a local algorithm trusts to be unimodal
//! - [`Observer`]: receives tracker events and optionally returns actions
//! - [`ChangeDetector`]: decides when the environment has shifted enough to
//!   invalidate the current maximum power point estimate

mod detector;
mod domain;
mod history;
mod interval;
mod measurement;
mod observer;

pub use detector::ChangeDetector;
pub use domain::{DomainError, MAX_VOLTAGE_PER_CELL, VoltageDomain};
pub use history::{Delta, History};
pub use interval::{IntervalError, SearchInterval};
pub use measurement::Measurement;
pub use observer::Observer;

//! Reusable observers for pvtrack maximum power point trackers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with any tracker event stream exposing the right capabilities.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for tracker-agnostic observers
//!   ([`HasPower`], [`HasPhase`], [`PerCycle`], [`CanReexplore`])
//!
//! # Observers
//!
//! - [`LogObserver`]: forwards events to the `log` facade
//! - [`Recorder`]: keeps every event in memory for later inspection
//! - [`StallGuard`]: forces re-exploration when steady-state power sags
//!
//! Observers compose as closures:
//!
//! ```
//! use pvtrack_core::{Measurement, Observer};
//! use pvtrack_observers::{LogObserver, Recorder, StallGuard};
//! use pvtrack_trackers::{Action, Event, Mppt, TrackerConfig};
//!
//! let mut mppt = Mppt::new(TrackerConfig::with_cells(60)).unwrap();
//! let mut log = LogObserver::new();
//! let mut recorder = Recorder::new();
//! let mut guard = StallGuard::default();
//!
//! let mut observer = |event: &Event| -> Option<Action> {
//!     Observer::<Event, Action>::observe(&mut log, event);
//!     recorder.record(event);
//!     guard.observe(event)
//! };
//! mppt.step_observed(&Measurement::new(20.0, 3.0, 1000.0, 25.0), &mut observer);
//! assert_eq!(recorder.cycles().len(), 1);
//! ```
//!
//! [`Observer`]: pvtrack_core::Observer
//! [`HasPower`]: traits::HasPower
//! [`HasPhase`]: traits::HasPhase
//! [`PerCycle`]: traits::PerCycle
//! [`CanReexplore`]: traits::CanReexplore

pub mod traits;

mod guard;
mod logger;
mod recorder;

pub use guard::StallGuard;
pub use logger::LogObserver;
pub use recorder::{Cycle, Recorder};

//! Synthetic P-V curves and a closed-loop driver.

use pvtrack_core::Measurement;

use crate::global::{Exploration, Explorer, Handoff};

pub(crate) const IRRADIANCE: f64 = 1000.0;
pub(crate) const TEMPERATURE: f64 = 25.0;

/// A single 3600 W peak at 60 V, zero outside `[0, 120]`.
pub(crate) fn parabola(v: f64) -> f64 {
    (3600.0 - (v - 60.0).powi(2)).max(0.0)
}

/// Partial shading: a 10 W peak at 20 V and a 15 W peak at 70 V.
pub(crate) fn two_peaks(v: f64) -> f64 {
    10.0 * (-((v - 20.0) / 8.0).powi(2)).exp() + 15.0 * (-((v - 70.0) / 8.0).powi(2)).exp()
}

/// Samples `curve` at `v`, deriving current from power.
pub(crate) fn measure(curve: fn(f64) -> f64, v: f64) -> Measurement {
    let power = curve(v);
    let current = if v > 0.0 { power / v } else { 0.0 };
    Measurement::new(v, current, IRRADIANCE, TEMPERATURE)
}

/// Feeds each emitted reference voltage back as the next operating point.
///
/// Returns the emitted voltages, one per cycle.
pub(crate) fn drive<F>(curve: fn(f64) -> f64, start: f64, cycles: usize, mut step: F) -> Vec<f64>
where
    F: FnMut(&Measurement) -> f64,
{
    let mut v = start;
    (0..cycles)
        .map(|_| {
            v = step(&measure(curve, v));
            v
        })
        .collect()
}

/// Runs `explorer` in closed loop on `curve` until it hands off a bound.
///
/// Returns the handoff and every probe emitted before it.
///
/// # Panics
///
/// Panics if no handoff arrives within `limit` cycles.
pub(crate) fn complete<X>(explorer: &mut X, curve: fn(f64) -> f64, limit: usize) -> (Handoff, Vec<f64>)
where
    X: Explorer + ?Sized,
{
    let mut probes = Vec::new();
    let mut v = 0.0;
    for _ in 0..limit {
        match explorer.explore(&measure(curve, v)) {
            Exploration::Continue(next) => {
                probes.push(next);
                v = next;
            }
            Exploration::Complete(handoff) => return (handoff, probes),
        }
    }
    panic!("no handoff within {limit} cycles");
}

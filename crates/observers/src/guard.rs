use pvtrack_core::Observer;

use crate::traits::{CanReexplore, HasPhase, HasPower, PerCycle};
use pvtrack_trackers::Phase;

/// An observer that forces re-exploration when steady-state power sags.
///
/// While the tracker reports [`Phase::SteadyState`], the guard remembers the
/// best power seen. If power stays below `fraction` of that best for
/// `patience` consecutive cycles, the guard returns the re-explore action.
/// Any other phase clears the guard.
///
/// This complements the environment monitor for drifts too slow to trip its
/// relative thresholds.
#[derive(Debug, Clone)]
pub struct StallGuard {
    fraction: f64,
    patience: usize,
    best: f64,
    low: usize,
}

impl StallGuard {
    /// Creates a guard that fires after `patience` cycles below
    /// `fraction × best`.
    ///
    /// `fraction` is clamped to `[0, 1]` and `patience` to at least one.
    #[must_use]
    pub fn new(fraction: f64, patience: usize) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            patience: patience.max(1),
            best: 0.0,
            low: 0,
        }
    }

    /// Best steady-state power seen since the guard was last cleared.
    #[must_use]
    pub fn best(&self) -> f64 {
        self.best
    }

    fn clear(&mut self) {
        self.best = 0.0;
        self.low = 0;
    }
}

impl Default for StallGuard {
    fn default() -> Self {
        Self::new(0.8, 20)
    }
}

impl<E, A> Observer<E, A> for StallGuard
where
    E: HasPower + HasPhase + PerCycle,
    A: CanReexplore,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if !event.per_cycle() {
            return None;
        }
        if event.phase() != Some(Phase::SteadyState) {
            self.clear();
            return None;
        }

        let power = event.power();
        if power.is_nan() {
            return None;
        }
        if power > self.best {
            self.best = power;
        }

        if power < self.fraction * self.best {
            self.low += 1;
        } else {
            self.low = 0;
        }

        if self.low >= self.patience {
            self.clear();
            return Some(A::reexplore());
        }
        None
    }
}

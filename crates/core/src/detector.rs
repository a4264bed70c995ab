use crate::Measurement;

/// Decides when the operating environment has shifted enough to invalidate
/// the current maximum power point estimate.
///
/// A global tracker feeds every steady-state measurement to its detector and
/// restarts exploration when [`observe`](ChangeDetector::observe) returns
/// true. The detector owns whatever rolling history it needs; the tracker
/// calls [`reset`](ChangeDetector::reset) whenever it discards its own state.
///
/// The unit type `()` implements this trait as a detector that never fires,
/// which pins a tracker to its first estimate.
pub trait ChangeDetector {
    /// Records `measurement` and returns true if a change was detected.
    fn observe(&mut self, measurement: &Measurement) -> bool;

    /// Clears all accumulated history.
    fn reset(&mut self);
}

impl ChangeDetector for () {
    fn observe(&mut self, _measurement: &Measurement) -> bool {
        false
    }

    fn reset(&mut self) {}
}

impl<D: ChangeDetector + ?Sized> ChangeDetector for Box<D> {
    fn observe(&mut self, measurement: &Measurement) -> bool {
        (**self).observe(measurement)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

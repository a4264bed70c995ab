use pvtrack_core::{Measurement, SearchInterval};

/// A global exploration algorithm.
///
/// An explorer probes the whole voltage domain, one reference voltage per
/// cycle, until it can name a bound: an interval around the global maximum
/// that it trusts to be unimodal. The first call after construction,
/// [`restart`](Explorer::restart) or [`reset`](Explorer::reset) emits the
/// first probe and ignores the measurement; every later call attributes the
/// measurement to the previously emitted probe.
pub trait Explorer {
    /// Consumes one measurement and either continues probing or completes.
    fn explore(&mut self, measurement: &Measurement) -> Exploration;

    /// Discards exploration progress, keeping any random stream running.
    ///
    /// Used when the environment changes so a re-exploration draws fresh
    /// random samples.
    fn restart(&mut self);

    /// Restores the construction-time state, reseeding any random stream.
    fn reset(&mut self);
}

impl<X: Explorer + ?Sized> Explorer for Box<X> {
    fn explore(&mut self, measurement: &Measurement) -> Exploration {
        (**self).explore(measurement)
    }

    fn restart(&mut self) {
        (**self).restart();
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// The outcome of one exploration cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exploration {
    /// Exploration continues; apply this reference voltage next.
    Continue(f64),

    /// Exploration finished with a bound for the local strategy.
    Complete(Handoff),
}

/// A bound handed from an explorer to a local strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handoff {
    /// Estimated maximum power point voltage.
    pub vmpp: f64,

    /// Interval around `vmpp` trusted to contain only the global peak.
    pub interval: SearchInterval,
}

/// One probed operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub voltage: f64,
    pub power: f64,
}

impl Sample {
    #[must_use]
    pub fn new(voltage: f64, power: f64) -> Self {
        Self { voltage, power }
    }
}

impl From<&Measurement> for Sample {
    fn from(measurement: &Measurement) -> Self {
        Self::new(measurement.voltage, measurement.power())
    }
}

/// Keeps the higher-power sample; ties and NaN keep the incumbent.
pub(crate) fn brighter(best: Option<Sample>, candidate: Sample) -> Option<Sample> {
    match best {
        Some(best) if best.power >= candidate.power || candidate.power.is_nan() => Some(best),
        _ => Some(candidate),
    }
}

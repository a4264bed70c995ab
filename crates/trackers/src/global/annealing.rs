use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::AnnealingConfig;

use super::{
    Exploration, Explorer, Handoff,
    explorer::{Sample, brighter},
};

/// Simulated annealing over the voltage domain.
///
/// Each candidate is drawn uniformly from a neighborhood of the accepted
/// voltage whose half-width shrinks with the temperature, from the whole
/// domain down to nothing. A candidate with more power is always accepted,
/// one with less power with probability `exp(ΔP / T)`. The temperature cools
/// geometrically after a fixed number of samples; once it reaches the floor
/// the best voltage seen is handed off with a window around it.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    domain: VoltageDomain,
    config: AnnealingConfig,
    seed: u64,
    rng: StdRng,
    started: bool,
    temperature: f64,
    drawn: usize,
    accepted: Option<Sample>,
    best: Option<Sample>,
}

impl SimulatedAnnealing {
    #[must_use]
    pub fn new(domain: VoltageDomain, config: &AnnealingConfig, seed: u64) -> Self {
        Self {
            domain,
            config: *config,
            seed,
            rng: StdRng::seed_from_u64(seed),
            started: false,
            temperature: config.initial_temperature,
            drawn: 0,
            accepted: None,
            best: None,
        }
    }

    fn accepts(&mut self, candidate: Sample) -> bool {
        if candidate.power.is_nan() {
            return false;
        }
        let Some(current) = self.accepted else {
            return true;
        };
        let gain = candidate.power - current.power;
        gain > 0.0 || self.rng.gen_range(0.0..1.0) < (gain / self.temperature).exp()
    }

    /// Draws uniformly from `[lo, hi]` intersected with the domain.
    fn draw(&mut self, lo: f64, hi: f64) -> f64 {
        let lo = self.domain.clamp(lo);
        let hi = self.domain.clamp(hi);
        if hi > lo {
            self.rng.gen_range(lo..=hi)
        } else {
            lo
        }
    }

    fn handoff(&self) -> Handoff {
        let max = self.domain.max_voltage();
        let vmpp = self.best.map_or(max / 2.0, |s| s.voltage);
        let half = self.config.window * max;
        let interval = SearchInterval::clamped(vmpp - half, vmpp + half, &self.domain);
        Handoff {
            vmpp: interval.clamp(vmpp),
            interval,
        }
    }

    /// Current temperature.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Best sample seen since the last restart.
    #[must_use]
    pub fn best(&self) -> Option<Sample> {
        self.best
    }
}

impl Explorer for SimulatedAnnealing {
    fn explore(&mut self, measurement: &Measurement) -> Exploration {
        let max = self.domain.max_voltage();
        if !self.started {
            self.started = true;
            return Exploration::Continue(self.draw(0.0, max));
        }

        let candidate = Sample::from(measurement);
        self.best = brighter(self.best, candidate);
        if self.accepts(candidate) {
            self.accepted = Some(candidate);
        }

        self.drawn += 1;
        if self.drawn >= self.config.samples_per_temperature {
            self.drawn = 0;
            self.temperature *= self.config.cooling;
        }
        if self.temperature <= self.config.min_temperature {
            return Exploration::Complete(self.handoff());
        }

        let center = self
            .domain
            .clamp(self.accepted.map_or(max / 2.0, |s| s.voltage));
        let half = max * self.temperature / self.config.initial_temperature;
        Exploration::Continue(self.draw(center - half, center + half))
    }

    fn restart(&mut self) {
        self.started = false;
        self.temperature = self.config.initial_temperature;
        self.drawn = 0;
        self.accepted = None;
        self.best = None;
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.restart();
    }
}

use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::FireflyConfig;

use super::{
    Exploration, Explorer, Handoff,
    explorer::{Sample, brighter},
};

/// One firefly: a probe voltage and the power last measured there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub position: f64,
    pub brightness: f64,
}

/// Firefly algorithm over the voltage domain.
///
/// Fireflies start evenly spaced inside the domain and are measured one per
/// cycle. After each generation every firefly moves toward each brighter one
/// with attractiveness `β₀·exp(−γr²)`, `r` being their distance as a fraction
/// of the domain, plus a random step that decays between generations. After
/// the last generation the brightest voltage seen is handed off with a window
/// around it.
#[derive(Debug, Clone)]
pub struct Firefly {
    domain: VoltageDomain,
    config: FireflyConfig,
    seed: u64,
    rng: StdRng,
    swarm: Vec<Glow>,
    cursor: Option<usize>,
    generation: usize,
    randomness: f64,
    best: Option<Sample>,
}

impl Firefly {
    #[must_use]
    pub fn new(domain: VoltageDomain, config: &FireflyConfig, seed: u64) -> Self {
        let mut firefly = Self {
            domain,
            config: *config,
            seed,
            rng: StdRng::seed_from_u64(seed),
            swarm: Vec::new(),
            cursor: None,
            generation: 0,
            randomness: config.randomness,
            best: None,
        };
        firefly.place();
        firefly
    }

    fn place(&mut self) {
        let count = self.config.fireflies.max(1);
        #[allow(clippy::cast_precision_loss)]
        let spacing = self.domain.max_voltage() / (count + 1) as f64;

        #[allow(clippy::cast_precision_loss)]
        let swarm = (1..=count)
            .map(|i| Glow {
                position: spacing * i as f64,
                brightness: 0.0,
            })
            .collect();
        self.swarm = swarm;
        self.cursor = None;
        self.generation = 0;
        self.randomness = self.config.randomness;
        self.best = None;
    }

    /// Moves every firefly toward the brighter ones of the finished generation.
    fn advance(&mut self) {
        let max = self.domain.max_voltage();
        let snapshot = self.swarm.clone();

        for glow in &mut self.swarm {
            let mut x = glow.position;
            for other in snapshot.iter().filter(|o| o.brightness > glow.brightness) {
                let r = (other.position - x) / max;
                let beta = self.config.attraction * (-self.config.absorption * r * r).exp();
                x += beta * (other.position - x);
            }
            let wander = self.randomness * max * (self.rng.gen_range(0.0..1.0) - 0.5);
            glow.position = self.domain.clamp(x + wander);
        }
        self.randomness *= self.config.randomness_decay;
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

    /// The fireflies, in measurement order.
    #[must_use]
    pub fn swarm(&self) -> &[Glow] {
        &self.swarm
    }

    /// Completed generations since the last restart.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }
}

impl Explorer for Firefly {
    fn explore(&mut self, measurement: &Measurement) -> Exploration {
        let Some(index) = self.cursor else {
            self.cursor = Some(0);
            return Exploration::Continue(self.swarm[0].position);
        };

        let sample = Sample::from(measurement);
        self.swarm[index].brightness = sample.power;
        self.best = brighter(self.best, sample);

        let next = index + 1;
        if next < self.swarm.len() {
            self.cursor = Some(next);
            return Exploration::Continue(self.swarm[next].position);
        }

        self.generation += 1;
        if self.generation >= self.config.generations {
            return Exploration::Complete(self.handoff());
        }
        self.advance();
        self.cursor = Some(0);
        Exploration::Continue(self.swarm[0].position)
    }

    fn restart(&mut self) {
        self.place();
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.place();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{complete, measure, two_peaks};

    fn firefly(config: FireflyConfig) -> Firefly {
        let domain = VoltageDomain::from_cells(125).unwrap();
        Firefly::new(domain, &config, 42)
    }

    #[test]
    fn first_generation_is_evenly_spaced() {
        let mut firefly = firefly(FireflyConfig::default());
        let (_, probes) = complete(&mut firefly, two_peaks, 1000);

        for (i, &v) in probes[..6].iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = 100.0 * (i + 1) as f64 / 7.0;
            assert_relative_eq!(v, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn runs_every_generation_then_bounds_the_brightest() {
        let mut firefly = firefly(FireflyConfig::default());
        let (handoff, probes) = complete(&mut firefly, two_peaks, 1000);

        assert_eq!(probes.len(), 6 * 8);
        assert_eq!(firefly.generation(), 8);
        assert!(probes.iter().all(|&v| (0.0..=100.0).contains(&v)));

        // 71.4 V is already brighter than anything on the 20 V hill.
        assert!(handoff.interval.contains(70.0));
        assert!(handoff.interval.width() <= 20.0 + 1e-9);
    }

    #[test]
    fn dimmer_fireflies_move_toward_brighter_ones() {
        let mut firefly = firefly(FireflyConfig {
            randomness: 0.0,
            ..FireflyConfig::default()
        });
        let before: Vec<f64> = firefly.swarm().iter().map(|g| g.position).collect();

        // One generation, measured on a curve brightest at the top.
        let mut v = 0.0;
        for _ in 0..=6 {
            if let Exploration::Continue(next) = firefly.explore(&measure(|v| v, v)) {
                v = next;
            }
        }

        let after: Vec<f64> = firefly.swarm().iter().map(|g| g.position).collect();
        assert_relative_eq!(after[5], before[5]);
        assert!(before.iter().zip(&after).take(5).all(|(b, a)| a > b));
    }

    #[test]
    fn reset_replays() {
        let mut firefly = firefly(FireflyConfig::default());
        let (first, probes) = complete(&mut firefly, two_peaks, 1000);
        firefly.reset();
        let (second, replayed) = complete(&mut firefly, two_peaks, 1000);
        assert_eq!(first, second);
        assert_eq!(probes, replayed);
    }
}

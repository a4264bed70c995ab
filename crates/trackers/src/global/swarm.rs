mod particle;

use pvtrack_core::{Measurement, SearchInterval, VoltageDomain};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::SwarmConfig;

use super::{
    Exploration, Explorer, Handoff,
    explorer::{Sample, brighter},
};

pub use particle::Particle;

use particle::Pull;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Nothing probed yet.
    Seeded,

    /// Evaluating each agent once, in order.
    Bootstrap(usize),

    /// Evaluating and moving agents in a back-and-forth sweep.
    Iterate { index: usize, forward: bool },
}

/// Particle swarm optimization over the voltage domain.
///
/// Agents start spread across the domain, one per equal slice with a random
/// offset inside it. Each cycle measures one agent: the bootstrap pass visits
/// every agent once, then agents are visited back and forth, each one moving
/// under inertia and the pulls of its own and the swarm's best sample. When
/// the cycle budget runs out the swarm's best voltage is handed off with the
/// full domain as its bound.
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    domain: VoltageDomain,
    config: SwarmConfig,
    seed: u64,
    rng: StdRng,
    particles: Vec<Particle>,
    best: Option<Sample>,
    stage: Stage,
    cycles: usize,
}

impl ParticleSwarm {
    #[must_use]
    pub fn new(domain: VoltageDomain, config: &SwarmConfig, seed: u64) -> Self {
        let mut swarm = Self {
            domain,
            config: *config,
            seed,
            rng: StdRng::seed_from_u64(seed),
            particles: Vec::new(),
            best: None,
            stage: Stage::Seeded,
            cycles: 0,
        };
        swarm.scatter();
        swarm
    }

    /// Places a fresh population using the running random stream.
    fn scatter(&mut self) {
        let agents = self.config.agents.max(1);
        #[allow(clippy::cast_precision_loss)]
        let slice = self.domain.max_voltage() / agents as f64;

        let mut particles = Vec::with_capacity(agents);
        for i in 0..agents {
            let offset = self.config.jitter * self.rng.gen_range(0.0..1.0);
            #[allow(clippy::cast_precision_loss)]
            let position = slice * (i as f64 + offset);
            particles.push(Particle::at(self.domain.clamp(position)));
        }

        self.particles = particles;
        self.best = None;
        self.stage = Stage::Seeded;
        self.cycles = 0;
    }

    fn evaluate(&mut self, index: usize, measurement: &Measurement) {
        let sample = Sample::from(measurement);
        self.particles[index].evaluate(sample);
        self.best = brighter(self.best, sample);
    }

    fn fly(&mut self, index: usize) {
        let pull = Pull {
            inertia: self.config.inertia,
            cognitive: self.config.cognitive,
            social: self.config.social,
            r1: self.rng.gen_range(0.0..1.0),
            r2: self.rng.gen_range(0.0..1.0),
        };
        let particle = &mut self.particles[index];
        let leader = self.best.map_or(particle.position, |s| s.voltage);
        particle.fly(leader, &pull, &self.domain);
    }

    /// Next agent of the back-and-forth sweep, turning at either end.
    fn following(&self, index: usize, forward: bool) -> (usize, bool) {
        let last = self.particles.len() - 1;
        match (forward, index) {
            (true, i) if i < last => (i + 1, true),
            (true, i) => (i.saturating_sub(1), false),
            (false, 0) => (last.min(1), true),
            (false, i) => (i - 1, false),
        }
    }

    fn handoff(&self) -> Handoff {
        let interval = SearchInterval::full(&self.domain);
        let vmpp = self
            .best
            .map_or(self.domain.max_voltage() / 2.0, |s| s.voltage);
        Handoff {
            vmpp: interval.clamp(vmpp),
            interval,
        }
    }

    /// The agents, in index order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The best sample seen by any agent.
    #[must_use]
    pub fn best(&self) -> Option<Sample> {
        self.best
    }

    /// Index of the agent whose probe awaits measurement.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        match self.stage {
            Stage::Seeded => None,
            Stage::Bootstrap(index) | Stage::Iterate { index, .. } => Some(index),
        }
    }
}

impl Explorer for ParticleSwarm {
    fn explore(&mut self, measurement: &Measurement) -> Exploration {
        let (next, forward) = match self.stage {
            Stage::Seeded => {
                self.stage = Stage::Bootstrap(0);
                self.cycles = 1;
                return Exploration::Continue(self.particles[0].position);
            }
            Stage::Bootstrap(index) => {
                self.evaluate(index, measurement);
                if index + 1 < self.particles.len() {
                    (index + 1, None)
                } else {
                    (self.particles.len().saturating_sub(2), Some(false))
                }
            }
            Stage::Iterate { index, forward } => {
                self.evaluate(index, measurement);
                self.fly(index);
                let (next, forward) = self.following(index, forward);
                (next, Some(forward))
            }
        };

        if self.cycles >= self.config.budget {
            return Exploration::Complete(self.handoff());
        }
        self.cycles += 1;
        self.stage = match forward {
            None => Stage::Bootstrap(next),
            Some(forward) => Stage::Iterate {
                index: next,
                forward,
            },
        };
        Exploration::Continue(self.particles[next].position)
    }

    fn restart(&mut self) {
        self.scatter();
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.scatter();
    }
}

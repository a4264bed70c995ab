use pvtrack_core::VoltageDomain;

use super::{Sample, brighter};

/// One agent of a [`ParticleSwarm`](super::ParticleSwarm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Voltage this agent probes next.
    pub position: f64,
    pub velocity: f64,

    /// Best sample this agent has seen.
    pub best: Option<Sample>,
}

/// Velocity update weights and their random draws for one move.
pub(super) struct Pull {
    pub(super) inertia: f64,
    pub(super) cognitive: f64,
    pub(super) social: f64,
    pub(super) r1: f64,
    pub(super) r2: f64,
}

impl Particle {
    pub(super) fn at(position: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            best: None,
        }
    }

    pub(super) fn evaluate(&mut self, sample: Sample) {
        self.best = brighter(self.best, sample);
    }

    /// Applies `v ← w·v + c₁r₁(pbest − x) + c₂r₂(gbest − x)` and moves,
    /// staying inside `domain`.
    pub(super) fn fly(&mut self, leader: f64, pull: &Pull, domain: &VoltageDomain) {
        let x = self.position;
        let own = self.best.map_or(x, |s| s.voltage);
        self.velocity = pull.inertia * self.velocity
            + pull.cognitive * pull.r1 * (own - x)
            + pull.social * pull.r2 * (leader - x);
        self.position = domain.clamp(x + self.velocity);
    }
}

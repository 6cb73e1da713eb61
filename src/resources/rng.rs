//! Shared random source for every roll the encounter makes.
//!
//! Tests and the simulator seed it to get reproducible runs.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Debug)]
pub struct EncounterRng(pub fastrand::Rng);

impl Default for EncounterRng {
    fn default() -> Self {
        EncounterRng(fastrand::Rng::new())
    }
}

impl EncounterRng {
    pub fn seeded(seed: u64) -> Self {
        EncounterRng(fastrand::Rng::with_seed(seed))
    }

    /// Inclusive range; the bounds may come in either order.
    pub fn between(&mut self, a: i32, b: i32) -> i32 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.0.i32(lo..=hi)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.0.f64() < p
    }

    /// Uniform in `[lo, hi]`.
    pub fn span(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.0.f64() * (hi - lo)
    }

    /// Uniform in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: u32) -> u32 {
        self.0.u32(0..n)
    }

    pub fn index(&mut self, len: usize) -> usize {
        self.0.usize(0..len)
    }
}

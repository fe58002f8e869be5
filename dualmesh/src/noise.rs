//! Seeded noise source satisfying the noise contract in §6: a function
//! `noise2d(x, y) -> f32` in roughly `[-1, 1]`. Wraps the `noise` crate's
//! `OpenSimplex`, explicitly seeded per instance rather than relying on any
//! process-global seed, so two terrain maps with different seeds cannot
//! interfere with each other.

use noise::{NoiseFn, OpenSimplex, Seedable};

pub struct TerrainNoise {
    source: OpenSimplex,
}

impl TerrainNoise {
    pub fn new(seed: u32) -> Self {
        Self { source: OpenSimplex::new().set_seed(seed) }
    }

    pub fn sample(&self, x: f64, y: f64) -> f32 {
        self.source.get([x, y]) as f32
    }
}

use crate::geometry::Point;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Deterministic random number generator
/// Wraps ChaCha8Rng to ensure reproducible simulations
#[derive(Clone, Serialize, Deserialize)]
pub struct DeterministicRng {
    #[serde(skip, default = "default_rng")]
    rng: ChaCha8Rng,
    seed: u64,
}

fn default_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0)
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate random u32
    pub fn gen_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// Generate random value in range [0, max)
    pub fn gen_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.gen_u32() % max
    }

    /// Uniform float in [0.0, 1.0)
    pub fn gen_f64_unit(&mut self) -> f64 {
        (self.gen_u32() as f64) / (u32::MAX as f64 + 1.0)
    }

    /// Uniform float in [min, max)
    pub fn gen_f64_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.gen_f64_unit() * (max - min)
    }

    /// Uniform point within a disk of radius `radius` centered at `center`,
    /// using r = radius * sqrt(U) so area density stays uniform.
    pub fn gen_disk_point(&mut self, center: Point, radius: f64) -> Point {
        let theta = self.gen_f64_unit() * 2.0 * PI;
        let r = radius * self.gen_f64_unit().sqrt();
        center.add(r * theta.cos(), r * theta.sin())
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

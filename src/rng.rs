// src/rng.rs
//! Random Number Generation for Simulation Runs
//!
//! # Design
//!
//! Every [`Simulator`](crate::sim::simulator::Simulator) owns exactly one
//! random source. Nothing here is global:
//! 1. **Reproducibility**: same seed → same noise path → same trajectory
//! 2. **Isolation**: independent runs never share generator state, so they can
//!    be executed on separate threads without synchronization
//!
//! [`RngFactory`] derives one seed per run from a base seed, giving a family of
//! reproducible but mutually independent streams.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed factory for families of independent runs
///
/// Run `k` is seeded with a splitmix64 scramble of `base_seed + k`, so adjacent
/// run ids do not produce correlated `StdRng` seeds.
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Seed for a specific run id
    pub fn seed_for(&self, run_id: u64) -> u64 {
        let mut z = self.base_seed.wrapping_add(run_id.wrapping_mul(0x9e3779b97f4a7c15));
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
        z ^ (z >> 31)
    }

    /// Create a standard RNG for a specific run
    pub fn create_std_rng(&self, run_id: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed_for(run_id))
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Build a driver RNG: seeded when a seed is given, OS entropy otherwise
pub fn driver_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

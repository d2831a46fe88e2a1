use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod arena;
pub mod config;
pub mod content;
pub mod describe;
pub mod error;
pub mod forge;
pub mod jobs;
pub mod library;
pub mod llm;
pub mod mesh;
pub mod naming;
pub mod personality;
pub mod stats;
pub mod tracker;

pub use error::{ForgeError, Result};
pub use forge::{BatchRequest, WeaponForge, WeaponParts, WeaponRecord};
pub use personality::{PersonalityPreset, PresetTable};
pub use stats::{Rarity, StatLine};

/// Seeded random source shared by every sampling step of a batch.
pub struct Roller {
    rng: ChaCha8Rng,
}

impl Roller {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    /// Uniform choice; `None` only for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform in `[0, 1)`.
    pub fn chance(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

//! Uniform integer sampling shared by all message handlers.

use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Process-wide source of uniformly distributed integers.
///
/// Seeded exactly once at construction and shared as an `Arc` by everything
/// that needs entropy, so concurrently processed messages draw from the same
/// generator. Range sampling is delegated to `rand`, which is free of modulo
/// bias.
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    /// Seeds the generator from OS entropy. Call once at startup.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeds the generator deterministically. Intended for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draws a value uniformly from `[min_inclusive, max_exclusive)`.
    ///
    /// Callers must guarantee `min_inclusive < max_exclusive`.
    pub fn uniform_int(&self, min_inclusive: u64, max_exclusive: u64) -> u64 {
        debug_assert!(min_inclusive < max_exclusive);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(min_inclusive..max_exclusive)
    }
}

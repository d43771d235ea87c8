//! Injectable randomness for participant generation.
//!
//! Every probabilistic branch in the engine draws through [`RandomSource`], so
//! production runs can use a seeded PRNG while tests script exact sequences.
use hmac::{Hmac, Mac};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;

use crate::numbers::{floor_f64_to_usize, i64_to_usize, usize_to_f64, usize_to_i64};

const PARTICIPANT_STREAM_TAG: &[u8] = b"participants";

/// Source of uniform random numbers consumed by the engine.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// Uniform integer in `[min, max]`. Returns `min` when `max < min`.
    fn next_int(&mut self, min: i64, max: i64) -> i64;

    /// Bernoulli trial succeeding with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_float() < probability
    }

    /// Uniform index into a collection of `len` items.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(i64_to_usize(self.next_int(0, usize_to_i64(len - 1))))
    }

    /// Uniform float in `[min, max)`.
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_float()
    }
}

/// ChaCha-backed random source with a draw counter for instrumentation.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    draws: u64,
}

impl SeededRandom {
    /// Seed the PRNG directly.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Construct from a user-visible seed, domain-separated for participant generation.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self::new(derive_stream_seed(seed, PARTICIPANT_STREAM_TAG))
    }

    /// Unseeded source for production play.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            draws: 0,
        }
    }

    /// Number of draw calls performed against this source.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for SeededRandom {
    fn next_float(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.r#gen::<f64>()
    }

    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.draws = self.draws.saturating_add(1);
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed sequence of floats, cycling when exhausted.
///
/// Integers are derived from the next float, so one script drives both kinds
/// of draw: `next_int(min, max)` maps `f` to `min + floor(f * (max - min + 1))`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(0.0, 0.999_999) } else { 0.0 })
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always yields the same value.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_float(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.saturating_add(1);
        value
    }

    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = i64_to_usize(max - min).saturating_add(1);
        let offset = floor_f64_to_usize(self.next_float() * usize_to_f64(span)).min(span - 1);
        min + usize_to_i64(offset)
    }
}

/// Derive an independent stream seed from a user seed and a domain tag.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

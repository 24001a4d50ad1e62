//! Deterministic random number generation for rollouts.
//!
//! Decision engines draw their randomness through the [`RandomSource`]
//! contract: only `next_u64()` and `seed()` matter to callers, so the
//! generator behind it can be swapped without touching the search.
//!
//! ```
//! use irq_tictactoe::core::{GameRng, RandomSource};
//!
//! let mut rng = GameRng::new(42);
//!
//! // Fork for an independent engine stream
//! let mut engine_rng = rng.fork();
//! assert_ne!(rng.next_u64(), engine_rng.next_u64());
//!
//! // Reseeding restarts the sequence
//! let mut a = GameRng::new(7);
//! let first = a.next_u64();
//! a.seed(7);
//! assert_eq!(a.next_u64(), first);
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed 64-bit words.
pub trait RandomSource: Send {
    /// Next word of the stream.
    fn next_u64(&mut self) -> u64;

    /// Restart the stream from `seed`.
    fn seed(&mut self, seed: u64);

    /// Uniform-ish index in `0..n` (`n` must be non-zero).
    fn gen_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "gen_index on empty range");
        (self.next_u64() % n as u64) as usize
    }
}

/// Deterministic RNG with forking.
///
/// Uses ChaCha8 for speed while maintaining good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// The seed this stream was created (or last reseeded) with.
    #[must_use]
    pub fn current_seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn seed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    fn gen_index(&mut self, n: usize) -> usize {
        self.gen_range_usize(0..n)
    }
}

//! Randomness for `maybe`
//!
//! `maybe` draws from an injected [`RandomSource`] rather than a hidden
//! global so tests can pin the sequence. The C boundary has no way to pass a
//! generator per call, so it uses the process-wide [`SharedRandom`] returned
//! by [`global`], which callers can reseed through the library's init entry.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

/// A source of coin flips
pub trait RandomSource {
    /// Return `true` or `false` with equal probability
    fn next_bool(&mut self) -> bool;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_bool(&mut self) -> bool {
        self.gen_bool(0.5)
    }
}

/// Thread-safe generator that can be reseeded in place
#[derive(Debug)]
pub struct SharedRandom {
    rng: Mutex<StdRng>,
}

impl SharedRandom {
    /// Create a generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Flip a coin
    pub fn flip(&self) -> bool {
        self.lock().gen_bool(0.5)
    }

    /// Switch to a deterministic stream starting at `seed`
    pub fn reseed(&self, seed: u64) {
        debug!(seed, "reseeding shared random source");
        *self.lock() = StdRng::seed_from_u64(seed);
    }

    /// Switch back to a nondeterministic stream
    pub fn reseed_from_entropy(&self) {
        debug!("reseeding shared random source from entropy");
        *self.lock() = StdRng::from_entropy();
    }

    // A panic while holding the lock cannot leave a StdRng half-updated
    fn lock(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SharedRandom {
    fn next_bool(&mut self) -> bool {
        self.flip()
    }
}

impl RandomSource for &SharedRandom {
    fn next_bool(&mut self) -> bool {
        self.flip()
    }
}

/// The process-wide source used by the C boundary
pub fn global() -> &'static SharedRandom {
    static GLOBAL: OnceLock<SharedRandom> = OnceLock::new();
    GLOBAL.get_or_init(SharedRandom::from_entropy)
}

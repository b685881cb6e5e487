//! # Random Provider
//!
//! Bounded random numbers for synthetic authorization data.
//!
//! The provider is injected as `Arc<dyn RandomSource>` rather than reached
//! through a global, so tests can pin the sequence with [`SharedRng::seeded`].
//! Not cryptographically secure; nothing here guards anything.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integers over half-open ranges `[low, high)`.
///
/// Implementations must be callable concurrently from many requests.
pub trait RandomSource: Send + Sync {
    /// Uniform `i32` in `[low, high)`. Returns `low` when the range is empty.
    fn random_int(&self, low: i32, high: i32) -> i32;

    /// Uniform `i64` in `[low, high)`. Returns `low` when the range is empty.
    fn random_long(&self, low: i64, high: i64) -> i64;
}

/// One generator shared by every request, guarded by a mutex.
///
/// Requests draw from a single stream, so concurrent callers never see
/// repeated or correlated sequences the way per-request seeding would.
#[derive(Debug)]
pub struct SharedRng {
    inner: Mutex<StdRng>,
}

impl SharedRng {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        SharedRng {
            inner: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        SharedRng {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SharedRng {
    fn random_int(&self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.inner.lock().gen_range(low..high)
    }

    fn random_long(&self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.inner.lock().gen_range(low..high)
    }
}

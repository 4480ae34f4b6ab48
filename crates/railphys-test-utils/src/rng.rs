//! Deterministic RNG for tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A reproducible RNG for test fixtures.
///
/// Same seed, same stream, on every platform.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

//! Deterministic seed derivation for reproducible failure rolls.
//!
//! Stress and derail rolls draw from `ChaCha8Rng` instances seeded through
//! [`derive_seed`], so an entire session's failure pattern is reproducible
//! from the single root seed in the config.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Derive a child seed from a parent seed and a string key.
///
/// Uses `DefaultHasher` (SipHash-1-3) for fast, deterministic mixing.
///
/// # Example
///
/// ```
/// use railphys_core::seed::derive_seed;
///
/// let stress = derive_seed(42, "stress");
/// let derail = derive_seed(42, "derail");
/// assert_ne!(stress, derail);
/// assert_eq!(stress, derive_seed(42, "stress"));
/// ```
#[must_use]
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

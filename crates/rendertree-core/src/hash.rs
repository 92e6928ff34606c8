//! Hasher selection for structural fingerprints.
//!
//! Both hashers are built from fixed keys rather than per-process random
//! state, so two fingerprints of equal trees always agree within a run.
//! `std-hash` trades speed for the std SipHash implementation.

use std::hash::{Hash, Hasher};

#[cfg(feature = "std-hash")]
pub mod default {
    pub use std::collections::hash_map::DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod default {
    pub use ahash::AHasher as DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::default()
    }
}

/// Feeds an `f64` into `hasher` by bit pattern, folding `-0.0` into `0.0`.
pub fn hash_f64<H: Hasher>(value: f64, hasher: &mut H) {
    let normalized = if value == 0.0 { 0.0f64 } else { value };
    normalized.to_bits().hash(hasher);
}

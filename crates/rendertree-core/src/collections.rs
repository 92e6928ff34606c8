#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashSet;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::FxHashSet as HashSet;
}

/// Sibling keys seen while mounting one child list.
pub type KeySet<'a> = map::HashSet<&'a str>;

//! Error type shared by every fallible map operation

use std::sync::PoisonError;

use thiserror::Error;

/// Errors returned by [`ChainedHashMap`](crate::ChainedHashMap) and
/// [`SharedChainedHashMap`](crate::SharedChainedHashMap).
///
/// A failed operation never mutates the map.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The map was constructed with fewer than one bucket
    #[error("capacity must be at least 1, got {capacity}")]
    InvalidCapacity {
        /// The rejected capacity
        capacity: usize,
    },
    /// `add` was called with a key that is already present
    #[error("the map already contains the key")]
    DuplicateKey,
    /// `get` or `set` was called with a key that is not present
    #[error("the map does not contain the key")]
    KeyNotFound,
    /// A thread panicked while holding the lock of a shared map
    #[error("the shared map lock was poisoned")]
    LockPoisoned,
}

impl<T> From<PoisonError<T>> for MapError {
    fn from(_: PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

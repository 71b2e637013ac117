//! Utility functions for building and inspecting a `ChainedHashMap`

use std::hash::{BuildHasher, Hash};

use crate::{ChainedHashMap, error::MapError};

/// Creates a `ChainedHashMap` with `capacity` buckets from an iterator of key-value pairs.
///
/// # Errors
///
/// Returns [`MapError::InvalidCapacity`] if `capacity` is zero, or
/// [`MapError::DuplicateKey`] at the first key that repeats.
pub fn try_from_iter<K, V, S, I>(
    capacity: usize,
    hasher: S,
    iter: I,
) -> Result<ChainedHashMap<K, V, S>, MapError>
where
    K: Eq + Hash,
    S: BuildHasher,
    I: IntoIterator<Item = (K, V)>,
{
    let mut map = ChainedHashMap::with_capacity_and_hasher(capacity, hasher)?;
    for (key, value) in iter {
        map.add(key, value)?;
    }
    Ok(map)
}

/// Shape of the chains in a map's bucket array
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    /// Number of buckets
    pub buckets: usize,
    /// Buckets holding no entry
    pub empty: usize,
    /// Length of the longest chain
    pub longest: usize,
    /// Mean chain length over non-empty buckets, 0 for an empty map
    pub mean_occupied: f64,
}

impl BucketStats {
    /// Collects the statistics of `map`
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn of<K, V, S>(map: &ChainedHashMap<K, V, S>) -> Self {
        let mut stats = Self { buckets: 0, empty: 0, longest: 0, mean_occupied: 0.0 };
        for length in map.bucket_lengths() {
            stats.buckets = stats.buckets.saturating_add(1);
            if length == 0 {
                stats.empty = stats.empty.saturating_add(1);
            }
            stats.longest = stats.longest.max(length);
        }

        let occupied = stats.buckets.saturating_sub(stats.empty);
        if occupied > 0 {
            stats.mean_occupied = map.len() as f64 / occupied as f64;
        }
        stats
    }

    /// Counts how many buckets have each chain length, indexed by length
    #[must_use]
    pub fn histogram<K, V, S>(map: &ChainedHashMap<K, V, S>) -> Vec<usize> {
        let mut counts: Vec<usize> = Vec::new();
        for length in map.bucket_lengths() {
            if counts.len() <= length {
                counts.resize(length.saturating_add(1), 0);
            }
            if let Some(count) = counts.get_mut(length) {
                *count = count.saturating_add(1);
            }
        }
        counts
    }
}

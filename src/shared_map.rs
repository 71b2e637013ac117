use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{ChainedHashMap, error::MapError, hash::BuildDjb2};

/// A [`ChainedHashMap`] behind a single `RwLock`, for sharing between threads.
///
/// Every operation holds the lock for its whole duration, so a grow is never observed
/// half done. Lookups return clones because no reference may outlive the read guard.
#[derive(Debug)]
pub struct SharedChainedHashMap<K, V, S = BuildDjb2> {
    /// The guarded map
    inner: RwLock<ChainedHashMap<K, V, S>>,
}

impl<K, V> SharedChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates a shared map with the default capacity and the DJB2 hasher
    #[must_use]
    pub fn new() -> Self {
        Self::from_map(ChainedHashMap::new())
    }

    /// Creates a shared map with `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        ChainedHashMap::with_capacity(capacity).map(Self::from_map)
    }
}

impl<K, V> Default for SharedChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> From<ChainedHashMap<K, V, S>> for SharedChainedHashMap<K, V, S> {
    fn from(map: ChainedHashMap<K, V, S>) -> Self {
        Self::from_map(map)
    }
}

impl<K, V, S> SharedChainedHashMap<K, V, S> {
    /// Wraps an existing map
    #[must_use]
    pub fn from_map(map: ChainedHashMap<K, V, S>) -> Self {
        Self { inner: RwLock::new(map) }
    }

    /// Unwraps the guarded map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn into_inner(self) -> Result<ChainedHashMap<K, V, S>, MapError> {
        Ok(self.inner.into_inner()?)
    }

    /// Takes the read lock
    fn read(&self) -> Result<RwLockReadGuard<'_, ChainedHashMap<K, V, S>>, MapError> {
        Ok(self.inner.read()?)
    }

    /// Takes the write lock
    fn write(&self) -> Result<RwLockWriteGuard<'_, ChainedHashMap<K, V, S>>, MapError> {
        Ok(self.inner.write()?)
    }

    /// Returns the number of entries.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn len(&self) -> Result<usize, MapError> {
        Ok(self.read()?.len())
    }

    /// Returns true if the map holds no entries.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn is_empty(&self) -> Result<bool, MapError> {
        Ok(self.read()?.is_empty())
    }

    /// Returns the number of buckets.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn capacity(&self) -> Result<usize, MapError> {
        Ok(self.read()?.capacity())
    }

    /// Removes every entry, keeping the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn clear(&self) -> Result<(), MapError> {
        self.write()?.clear();
        Ok(())
    }
}

impl<K, V, S> SharedChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Inserts a new key-value pair under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::DuplicateKey`] if `key` is present, or
    /// [`MapError::LockPoisoned`] if a writer panicked.
    pub fn add(&self, key: K, value: V) -> Result<(), MapError> {
        self.write()?.add(key, value)
    }

    /// Removes the entry for `key`; `Ok(false)` if it was absent.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn remove<Q>(&self, key: &Q) -> Result<bool, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Ok(self.write()?.remove(key))
    }

    /// Overwrites the value of an existing key.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` is absent, or
    /// [`MapError::LockPoisoned`] if a writer panicked.
    pub fn set<Q>(&self, key: &Q, value: V) -> Result<(), MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.write()?.set(key, value)
    }

    /// Returns true if the map contains `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Ok(self.read()?.contains_key(key))
    }
}

impl<K, V, S> SharedChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    /// Returns a clone of the value for `key`, or `Ok(None)` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::LockPoisoned`] if a writer panicked.
    pub fn try_get<Q>(&self, key: &Q) -> Result<Option<V>, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Ok(self.read()?.try_get(key).cloned())
    }

    /// Returns a clone of the value for a key that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` is absent, or
    /// [`MapError::LockPoisoned`] if a writer panicked.
    pub fn get<Q>(&self, key: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read()?.get(key).cloned()
    }
}

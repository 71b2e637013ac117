use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
    mem,
};

use log::{debug, trace};

use crate::{error::MapError, hash::BuildDjb2};

/// Number of buckets used by [`ChainedHashMap::new`]
pub const DEFAULT_CAPACITY: usize = 1000;

/// A key-value pair stored in a bucket
#[derive(Debug, Clone)]
struct Entry<K, V> {
    /// The key in the key-value pair
    key: K,
    /// The value associated with the key
    value: V,
    /// Hash of the key, kept so a grow never hashes a key twice
    hash: u64,
}

/// Colliding entries of one slot
type Bucket<K, V> = Vec<Entry<K, V>>;

/// Entry count a map of `capacity` buckets may never reach: the `add` that would bring
/// the count to it grows the map first.
///
/// Equals `floor(capacity * 0.75) + 1`.
fn max_before_grow(capacity: usize) -> usize {
    capacity.saturating_sub(capacity.div_ceil(4)).saturating_add(1)
}

/// Maps a hash onto `0..capacity`.
///
/// The hash is read as a signed integer and reduced with a Euclidean remainder, so a
/// negative hash still lands inside the bucket array.
#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    let modulus = i64::try_from(capacity.max(1)).unwrap_or(i64::MAX);
    (hash as i64).rem_euclid(modulus) as usize
}

/// Allocates `capacity` slots, none of which owns a bucket yet
fn empty_buckets<K, V>(capacity: usize) -> Vec<Option<Bucket<K, V>>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// Appends `entry` to the bucket its hash selects, materializing the bucket if needed.
///
/// Does not look for duplicates. `buckets` is never empty: construction rejects a zero
/// capacity and a grow only doubles.
fn place<K, V>(buckets: &mut [Option<Bucket<K, V>>], entry: Entry<K, V>) {
    let index = bucket_index(entry.hash, buckets.len());
    if let Some(slot) = buckets.get_mut(index) {
        slot.get_or_insert_with(Vec::new).push(entry);
    }
}

/// A hash map resolving collisions by separate chaining.
///
/// Every slot of the bucket array holds a chain of entries whose hashes reduce to that
/// slot. Before an `add` would bring the count to `floor(capacity * 0.75) + 1`, the array
/// doubles and every entry is rehashed into it. Capacity never shrinks.
///
/// Insertion and update are separate operations: [`add`](Self::add) only inserts new
/// keys and [`set`](Self::set) only overwrites existing ones.
///
/// Note: This implementation is not thread-safe. For shared access, use
/// [`SharedChainedHashMap`](crate::SharedChainedHashMap).
#[derive(Debug, Clone)]
pub struct ChainedHashMap<K, V, S = BuildDjb2> {
    /// Slots of the table; a slot gets a bucket on its first insert
    buckets: Vec<Option<Bucket<K, V>>>,
    /// Current number of entries across all buckets
    count: usize,
    /// Entry count the table never reaches without growing first
    max_before_grow: usize,
    /// Builds the hasher used for every key
    hasher: S,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates a map with [`DEFAULT_CAPACITY`] buckets and the DJB2 hasher
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, BuildDjb2::default())
    }

    /// Creates a map with `capacity` buckets and the DJB2 hasher.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        Self::with_capacity_and_hasher(capacity, BuildDjb2::default())
    }
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, S::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates a map with `capacity` buckets that hashes keys with `hasher`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, MapError> {
        if capacity < 1 {
            return Err(MapError::InvalidCapacity { capacity });
        }
        Ok(Self::from_parts(capacity, hasher))
    }

    /// Builds the map; `capacity` must already be validated
    fn from_parts(capacity: usize, hasher: S) -> Self {
        trace!("creating chained map with {capacity} buckets");
        Self {
            buckets: empty_buckets(capacity),
            count: 0,
            max_before_grow: max_before_grow(capacity),
            hasher,
        }
    }

    /// Computes the hash for a key
    fn hash<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    /// The bucket `hash` selects, if it has been materialized
    fn bucket(&self, hash: u64) -> Option<&Bucket<K, V>> {
        self.buckets.get(bucket_index(hash, self.buckets.len())).and_then(Option::as_ref)
    }

    /// Mutable access to the bucket `hash` selects, if it has been materialized
    fn bucket_mut(&mut self, hash: u64) -> Option<&mut Bucket<K, V>> {
        let index = bucket_index(hash, self.buckets.len());
        self.buckets.get_mut(index).and_then(Option::as_mut)
    }

    /// Finds the entry for `key` in the bucket `hash` selects
    fn find<Q>(&self, hash: u64, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.bucket(hash)?.iter().find(|entry| entry.hash == hash && entry.key.borrow() == key)
    }

    /// Inserts a new key-value pair.
    ///
    /// If the new entry would bring the count to `max_before_grow`, the bucket array
    /// doubles before the entry is placed.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::DuplicateKey`] if `key` is already present. The map, including
    /// its capacity, is left untouched in that case.
    pub fn add(&mut self, key: K, value: V) -> Result<(), MapError> {
        let hash = self.hash(&key);
        if self.find(hash, &key).is_some() {
            trace!("rejected duplicate key with hash {hash:#x}");
            return Err(MapError::DuplicateKey);
        }

        if self.count.saturating_add(1) >= self.max_before_grow {
            self.grow();
        }

        place(&mut self.buckets, Entry { key, value, hash });
        self.count = self.count.saturating_add(1);
        Ok(())
    }

    /// Removes the entry for `key`. Returns false if the key was not present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        let Some(bucket) = self.bucket_mut(hash) else {
            return false;
        };
        let Some(position) =
            bucket.iter().position(|entry| entry.hash == hash && entry.key.borrow() == key)
        else {
            return false;
        };

        bucket.swap_remove(position);
        self.count = self.count.saturating_sub(1);
        true
    }

    /// Retrieves the value for `key`, or `None` if it is absent
    pub fn try_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(self.hash(key), key).map(|entry| &entry.value)
    }

    /// Get a mutable reference to the value for `key`
    pub fn try_get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        self.bucket_mut(hash)?
            .iter_mut()
            .find(|entry| entry.hash == hash && entry.key.borrow() == key)
            .map(|entry| &mut entry.value)
    }

    /// Retrieves the value for a key that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key).ok_or(MapError::KeyNotFound)
    }

    /// Overwrites the value of an existing key. Never inserts.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if `key` is absent; use [`add`](Self::add) to
    /// insert it.
    pub fn set<Q>(&mut self, key: &Q, value: V) -> Result<(), MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.try_get_mut(key).ok_or(MapError::KeyNotFound)?;
        *slot = value;
        Ok(())
    }

    /// Returns true if the map contains `key`
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key).is_some()
    }

    /// Doubles the bucket array and moves every entry into it.
    ///
    /// Entries are placed by their cached hash, so no key is hashed or compared and the
    /// old array is only dropped once every entry has been moved.
    fn grow(&mut self) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity.saturating_mul(2);
        if new_capacity == old_capacity {
            return;
        }

        let mut buckets = empty_buckets(new_capacity);
        for entry in mem::take(&mut self.buckets).into_iter().flatten().flatten() {
            place(&mut buckets, entry);
        }

        self.buckets = buckets;
        self.max_before_grow = max_before_grow(new_capacity);
        debug!(
            "grew chained map from {old_capacity} to {new_capacity} buckets with {} entries",
            self.count
        );
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Returns the number of entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `floor(capacity * 0.75) + 1`, the count an `add` grows the map to avoid
    #[must_use]
    pub fn max_before_grow(&self) -> usize {
        self.max_before_grow
    }

    /// Returns the ratio of entries to buckets
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.buckets.len() as f64
    }

    /// Removes every entry. The capacity is kept.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = None;
        }
        self.count = 0;
    }

    /// Returns the chain length of every bucket, in bucket order
    pub fn bucket_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(|bucket| bucket.as_ref().map_or(0, Vec::len))
    }

    /// Returns an iterator over the key-value pairs.
    ///
    /// The order is unspecified and changes after a grow.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { buckets: self.buckets.iter(), current: Default::default(), remaining: self.count }
    }

    /// Returns an iterator over the keys
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the key-value pairs of the map
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Slots not yet visited
    buckets: std::slice::Iter<'a, Option<Bucket<K, V>>>,
    /// Entries left in the bucket being visited
    current: std::slice::Iter<'a, Entry<K, V>>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }
            if let Some(bucket) = self.buckets.next()? {
                self.current = bucket.iter();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            current: self.current.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over the keys of the map
#[derive(Debug)]
pub struct Keys<'a, K, V> {
    /// Underlying pair iterator
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over the values of the map
#[derive(Debug)]
pub struct Values<'a, K, V> {
    /// Underlying pair iterator
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

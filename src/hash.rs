//! String hash functions and the `Hasher` implementations built on them.
//!
//! [`Djb2Hasher`] is the default hasher of [`ChainedHashMap`](crate::ChainedHashMap).
//! [`AdditiveHasher`] only sums character codes and is kept around to show how badly a
//! weak hash clusters keys into a few buckets.

use std::hash::{BuildHasherDefault, Hasher};

/// Initial state of the DJB2 hash
pub const DJB2_SEED: i32 = 5381;

/// Hashes the UTF-16 code units of `input` with DJB2 (`hash * 33 + c`), wrapping on
/// overflow. A character outside the Basic Multilingual Plane contributes both halves of
/// its surrogate pair.
///
/// ```rust
/// use chained_map::hash::djb2;
///
/// assert_eq!(djb2(""), 5381);
/// assert_eq!(djb2("a"), 5381 * 33 + 97);
/// ```
#[must_use]
pub fn djb2(input: &str) -> i32 {
    input.encode_utf16().fold(DJB2_SEED, |hash, unit| djb2_step(hash, u32::from(unit)))
}

/// Sums the UTF-16 code units of `input`, wrapping on overflow.
///
/// Anagrams always collide, which is the point of keeping it.
#[must_use]
pub fn additive(input: &str) -> i32 {
    input.encode_utf16().fold(0, |hash, unit| additive_step(hash, u32::from(unit)))
}

/// One round of DJB2: `(hash << 5) + hash + code`
#[allow(clippy::cast_possible_wrap)]
fn djb2_step(hash: i32, code: u32) -> i32 {
    hash.wrapping_mul(33).wrapping_add(code as i32)
}

/// One round of the additive hash
#[allow(clippy::cast_possible_wrap)]
fn additive_step(hash: i32, code: u32) -> i32 {
    hash.wrapping_add(code as i32)
}

/// Sign-extends a 32-bit hash so negative values stay negative in the 64-bit `finish` result
#[allow(clippy::cast_sign_loss)]
fn widen(hash: i32) -> u64 {
    i64::from(hash) as u64
}

/// DJB2 over every byte a key writes.
///
/// The state is a signed 32-bit integer. `finish` sign-extends it, so a key whose hash
/// overflowed into the negative range reaches the bucket index computation as a
/// negative number and is normalized there.
#[derive(Debug, Clone, Copy)]
pub struct Djb2Hasher {
    /// Rolling hash state
    hash: i32,
}

impl Djb2Hasher {
    /// Creates a hasher seeded with [`DJB2_SEED`]
    #[must_use]
    pub const fn new() -> Self {
        Self { hash: DJB2_SEED }
    }
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Djb2Hasher {
    fn finish(&self) -> u64 {
        widen(self.hash)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash = djb2_step(self.hash, u32::from(byte));
        }
    }
}

/// Sum of every byte a key writes
#[derive(Debug, Clone, Copy, Default)]
pub struct AdditiveHasher {
    /// Running sum
    hash: i32,
}

impl Hasher for AdditiveHasher {
    fn finish(&self) -> u64 {
        widen(self.hash)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash = additive_step(self.hash, u32::from(byte));
        }
    }
}

/// Default `BuildHasher` of the map
pub type BuildDjb2 = BuildHasherDefault<Djb2Hasher>;

/// `BuildHasher` for [`AdditiveHasher`]
pub type BuildAdditive = BuildHasherDefault<AdditiveHasher>;

//! # Chained Hash Map
//!
//! A Rust implementation of a hash table that resolves collisions by separate chaining.
//!
//! This crate provides two map types:
//!
//! - `ChainedHashMap`: a single-threaded map that doubles its bucket array whenever an
//!   insertion would push it past a 0.75 load factor
//! - `SharedChainedHashMap`: the same map behind one `RwLock` for use across threads
//!
//! Keys are hashed with DJB2 by default (see [`hash`]). Any `BuildHasher` can be plugged
//! in instead.
//!
//! Unlike `std::collections::HashMap`, inserting and updating are distinct operations:
//! `add` fails on an existing key and `set` fails on a missing one.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chained_map::{ChainedHashMap, MapError};
//!
//! // Create a map with four buckets
//! let mut map = ChainedHashMap::with_capacity(4)?;
//!
//! // Insert values
//! map.add("apple".to_string(), 1)?;
//! map.add("banana".to_string(), 2)?;
//! assert_eq!(map.add("apple".to_string(), 3), Err(MapError::DuplicateKey));
//!
//! // Retrieve values
//! assert_eq!(map.try_get("apple"), Some(&1));
//! assert_eq!(map.get("cherry"), Err(MapError::KeyNotFound));
//!
//! // Update values
//! map.set("apple", 10)?;
//! assert_eq!(map.try_get("apple"), Some(&10));
//!
//! // Remove values
//! assert!(map.remove("apple"));
//! assert_eq!(map.try_get("apple"), None);
//! # Ok::<(), MapError>(())
//! ```
//!
//! ## Shared Usage
//!
//! ```rust
//! use chained_map::SharedChainedHashMap;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map = Arc::new(SharedChainedHashMap::new());
//!
//! let map1 = Arc::clone(&map);
//! let map2 = Arc::clone(&map);
//!
//! let t1 = thread::spawn(move || {
//!     for i in 0..100 {
//!         map1.add(format!("key-{}", i), i).unwrap();
//!     }
//! });
//!
//! let t2 = thread::spawn(move || {
//!     for i in 100..200 {
//!         map2.add(format!("key-{}", i), i).unwrap();
//!     }
//! });
//!
//! t1.join().unwrap();
//! t2.join().unwrap();
//!
//! assert_eq!(map.len().unwrap(), 200);
//! ```

/// Module implementing the single-threaded separate-chaining map
mod chained_hashmap;
/// Error type of the crate
mod error;
pub mod hash;
/// Module wrapping the map in a lock for shared access
mod shared_map;
pub mod utils;

pub use chained_hashmap::{ChainedHashMap, DEFAULT_CAPACITY, Iter, Keys, Values};
pub use error::MapError;
pub use shared_map::SharedChainedHashMap;

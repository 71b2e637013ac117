// ChainedHashMap property tests against std::collections::HashMap as the model.
//
// Property 1: random add/remove/set/get sequences agree with the model.
//  - add succeeds iff the model lacks the key; set/get succeed iff it has it.
//  - After every step: len() matches, len() < max_before_grow(), capacity never drops.
//
// Property 2: inserting N distinct keys keeps every one retrievable across grows.
//
// Property 3: iteration visits exactly the live entries.
#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use std::collections::HashMap;

use chained_map::{ChainedHashMap, MapError, hash::BuildAdditive, utils::try_from_iter};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(u16, i32),
    Remove(u16),
    Set(u16, i32),
    Get(u16),
}

fn op_strategy(keys: u16) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..keys, any::<i32>()).prop_map(|(k, v)| Op::Add(k, v)),
        1 => (0..keys).prop_map(Op::Remove),
        1 => (0..keys, any::<i32>()).prop_map(|(k, v)| Op::Set(k, v)),
        1 => (0..keys).prop_map(Op::Get),
    ]
}

fn key(k: u16) -> String {
    format!("k{k}")
}

proptest! {
    #[test]
    fn prop_matches_std_model(
        capacity in 1usize..16,
        ops in proptest::collection::vec(op_strategy(64), 1..300),
    ) {
        let mut map: ChainedHashMap<String, i32> = ChainedHashMap::with_capacity(capacity).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut last_capacity = map.capacity();

        for op in ops {
            match op {
                Op::Add(k, v) => {
                    let result = map.add(key(k), v);
                    if model.contains_key(&key(k)) {
                        prop_assert_eq!(result, Err(MapError::DuplicateKey));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        model.insert(key(k), v);
                    }
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&key(k)), model.remove(&key(k)).is_some());
                }
                Op::Set(k, v) => {
                    let result = map.set(&key(k), v);
                    if let Some(slot) = model.get_mut(&key(k)) {
                        prop_assert_eq!(result, Ok(()));
                        *slot = v;
                    } else {
                        prop_assert_eq!(result, Err(MapError::KeyNotFound));
                    }
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.try_get(&key(k)), model.get(&key(k)));
                    prop_assert_eq!(map.get(&key(k)).ok(), model.get(&key(k)));
                }
            }

            prop_assert_eq!(map.len(), model.len());
            prop_assert!(map.len() < map.max_before_grow());
            prop_assert!(map.capacity() >= last_capacity);
            last_capacity = map.capacity();
        }

        for (k, v) in &model {
            prop_assert_eq!(map.try_get(k), Some(v));
        }
    }

    #[test]
    fn prop_all_keys_survive_growth(n in 1usize..2_000, capacity in 1usize..8) {
        let mut map = ChainedHashMap::with_capacity(capacity).unwrap();
        let initial_threshold = map.max_before_grow();
        for i in 0..n {
            map.add(i, i * 3).unwrap();
        }

        if n >= initial_threshold {
            prop_assert!(map.capacity() > capacity);
        }
        prop_assert_eq!(map.len(), n);
        prop_assert_eq!(map.bucket_lengths().sum::<usize>(), n);
        for i in 0..n {
            prop_assert_eq!(map.try_get(&i), Some(&(i * 3)));
        }
    }

    #[test]
    fn prop_iteration_visits_live_entries(
        entries in proptest::collection::hash_map("[a-z]{1,6}", any::<u8>(), 0..100),
        removed in proptest::collection::vec("[a-z]{1,6}", 0..20),
    ) {
        // The additive hash collides often, which keeps chains long.
        let mut map = try_from_iter(4, BuildAdditive::default(), entries.clone()).unwrap();
        let mut model = entries;
        for k in &removed {
            prop_assert_eq!(map.remove(k), model.remove(k).is_some());
        }

        let mut seen: Vec<(String, u8)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let mut expected: Vec<(String, u8)> = model.into_iter().collect();
        seen.sort();
        expected.sort();
        prop_assert_eq!(map.iter().len(), seen.len());
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(map.keys().count(), map.len());
        prop_assert_eq!(map.values().count(), map.len());
    }
}

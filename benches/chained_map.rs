#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::{
    collections::{HashMap, hash_map::RandomState},
    hash::BuildHasher,
    hint::black_box,
};

use chained_map::{
    ChainedHashMap,
    hash::{BuildAdditive, BuildDjb2},
};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;
const SEED: u64 = 42;
const LOOKUP_SIZES: [i32; 3] = [1_000, 10_000, 100_000];

/// Distinct random string pairs; the index prefix keeps keys unique.
fn random_items(amount: usize, seed: u64) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..amount)
        .map(|i| {
            let suffix: String =
                (&mut rng).sample_iter(Alphanumeric).take(12).map(char::from).collect();
            (format!("{i}-{suffix}"), suffix)
        })
        .collect()
}

fn filled_map<S: BuildHasher>(
    items: &[(String, String)],
    hasher: S,
) -> ChainedHashMap<String, String, S> {
    let mut map = ChainedHashMap::with_capacity_and_hasher(16, hasher).unwrap();
    for (key, value) in items {
        map.add(key.clone(), value.clone()).unwrap();
    }
    map
}

fn hash_map_benches(c: &mut Criterion) {
    let items = random_items(ITEMS_AMOUNT, SEED);

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("chained add", |b| {
        b.iter_batched(
            || (ChainedHashMap::new(), items.clone()),
            |(mut map, items)| {
                for (key, value) in items {
                    map.add(key, value).unwrap();
                }
                map
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("rust std insert", |b| {
        b.iter_batched(
            || (HashMap::new(), items.clone()),
            |(mut map, items)| {
                for (key, value) in items {
                    map.insert(key, value);
                }
                map
            },
            BatchSize::SmallInput,
        );
    });

    let chained_map = filled_map(&items, BuildDjb2::default());
    let rust_map: HashMap<_, _> = items.iter().cloned().collect();
    group.bench_function("chained try_get", |b| {
        b.iter(|| items.iter().filter(|(key, _)| chained_map.try_get(key).is_some()).count());
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| items.iter().filter(|(key, _)| rust_map.get(key).is_some()).count());
    });
    group.finish();
}

fn hasher_benches(c: &mut Criterion) {
    let items = random_items(ITEMS_AMOUNT, SEED);
    let djb2 = filled_map(&items, BuildDjb2::default());
    let additive = filled_map(&items, BuildAdditive::default());
    let random_state = filled_map(&items, RandomState::new());

    let mut group = c.benchmark_group("Hasher comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("djb2 try_get", |b| {
        b.iter(|| items.iter().filter(|(key, _)| djb2.try_get(key).is_some()).count());
    });
    group.bench_function("additive try_get", |b| {
        b.iter(|| items.iter().filter(|(key, _)| additive.try_get(key).is_some()).count());
    });
    group.bench_function("random state try_get", |b| {
        b.iter(|| items.iter().filter(|(key, _)| random_state.try_get(key).is_some()).count());
    });
    group.finish();
}

/// Searches for a missing key with O(n), O(log n) and O(1) strategies.
fn lookup_benches(c: &mut Criterion) {
    let missing = i32::MAX;

    let mut group = c.benchmark_group("Missing key lookup benchmark");
    group.sample_size(SAMPLE_SIZE);
    for size in LOOKUP_SIZES {
        let sorted: Vec<i32> = (0..size).collect();
        let mut map = ChainedHashMap::new();
        for &x in &sorted {
            map.add(x, x).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("linear scan", size), &sorted, |b, sorted| {
            b.iter(|| black_box(sorted.iter().position(|&x| x == black_box(missing))));
        });
        group.bench_with_input(BenchmarkId::new("binary search", size), &sorted, |b, sorted| {
            b.iter(|| black_box(sorted.binary_search(&black_box(missing))));
        });
        group.bench_with_input(BenchmarkId::new("chained map", size), &map, |b, map| {
            b.iter(|| black_box(map.try_get(&black_box(missing))));
        });
    }
    group.finish();
}

criterion_group!(benches, hash_map_benches, hasher_benches, lookup_benches);

criterion_main!(benches);

use std::collections::HashSet as StdHashSet;
use std::hint::black_box;

use criterion::BatchSize;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashSet as HashbrownHashSet;
use probe_set::ProbeSet;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;

/// Table size exponent for the probe set; the competitors get the same
/// capacity hint.
const BITS: u32 = 16;

/// Half-full table. Linear probing is only honest well under full load, so
/// benchmark it in its intended operating range.
const KEYS: usize = 1 << (BITS - 1);

fn make_keys(rng: &mut SmallRng) -> Vec<u64> {
    (0..KEYS).map(|_| rng.random()).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(OsRng.try_next_u64().unwrap_or(0xdecade));
    let keys = make_keys(&mut rng);

    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(KEYS as u64));

    group.bench_function("probe_set", |b| {
        b.iter_batched(
            || ProbeSet::<u64>::with_bits(BITS).unwrap(),
            |mut set| {
                for key in &keys {
                    black_box(set.insert(*key).unwrap());
                }
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("std_hash_set", |b| {
        b.iter_batched(
            || StdHashSet::with_capacity(1 << BITS),
            |mut set| {
                for key in &keys {
                    black_box(set.insert(*key));
                }
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("hashbrown_hash_set", |b| {
        b.iter_batched(
            || HashbrownHashSet::with_capacity(1 << BITS),
            |mut set| {
                for key in &keys {
                    black_box(set.insert(*key));
                }
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(OsRng.try_next_u64().unwrap_or(0xdecade));
    let keys = make_keys(&mut rng);
    let missing: Vec<u64> = (0..KEYS).map(|_| rng.random()).collect();

    let mut probe = ProbeSet::<u64>::with_bits(BITS).unwrap();
    let mut std_set = StdHashSet::with_capacity(1 << BITS);
    let mut brown = HashbrownHashSet::with_capacity(1 << BITS);
    for key in &keys {
        probe.insert(*key).unwrap();
        std_set.insert(*key);
        brown.insert(*key);
    }

    let mut group = c.benchmark_group("lookup_hit");
    group.throughput(Throughput::Elements(KEYS as u64));
    group.bench_function("probe_set", |b| {
        b.iter(|| keys.iter().filter(|key| probe.contains(*key)).count())
    });
    group.bench_function("std_hash_set", |b| {
        b.iter(|| keys.iter().filter(|key| std_set.contains(*key)).count())
    });
    group.bench_function("hashbrown_hash_set", |b| {
        b.iter(|| keys.iter().filter(|key| brown.contains(*key)).count())
    });
    group.finish();

    let mut group = c.benchmark_group("lookup_miss");
    group.throughput(Throughput::Elements(KEYS as u64));
    group.bench_function("probe_set", |b| {
        b.iter(|| missing.iter().filter(|key| probe.contains(*key)).count())
    });
    group.bench_function("std_hash_set", |b| {
        b.iter(|| missing.iter().filter(|key| std_set.contains(*key)).count())
    });
    group.bench_function("hashbrown_hash_set", |b| {
        b.iter(|| missing.iter().filter(|key| brown.contains(*key)).count())
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(OsRng.try_next_u64().unwrap_or(0xdecade));
    let keys = make_keys(&mut rng);

    // Remove-then-reinsert over a populated table; this is where tombstone
    // accumulation shows up for the probe set.
    let mut group = c.benchmark_group("churn");
    group.throughput(Throughput::Elements(KEYS as u64));

    group.bench_function("probe_set", |b| {
        b.iter_batched(
            || {
                let mut set = ProbeSet::<u64>::with_bits(BITS).unwrap();
                for key in &keys {
                    set.insert(*key).unwrap();
                }
                set
            },
            |mut set| {
                for key in &keys {
                    black_box(set.remove(key));
                    black_box(set.insert(*key).unwrap());
                }
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("std_hash_set", |b| {
        b.iter_batched(
            || {
                let mut set = StdHashSet::with_capacity(1 << BITS);
                for key in &keys {
                    set.insert(*key);
                }
                set
            },
            |mut set| {
                for key in &keys {
                    black_box(set.remove(key));
                    black_box(set.insert(*key));
                }
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_churn);
criterion_main!(benches);

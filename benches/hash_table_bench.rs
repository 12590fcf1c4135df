use chained_table::HashTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn quiet_table(capacity: usize) -> HashTable {
    HashTable::builder()
        .capacity(capacity)
        .warn_on_overwrite(false)
        .build()
        .unwrap()
}

fn filled(capacity: usize, seed: u64, n: usize) -> (HashTable, Vec<String>) {
    let mut t = quiet_table(capacity);
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for k in &keys {
        t.insert(k, k);
    }
    (t, keys)
}

fn bench_insert(c: &mut Criterion) {
    let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
    c.bench_function("hash_table_insert_10k", |b| {
        b.iter_batched(
            || quiet_table(4096),
            |mut t| {
                for k in &keys {
                    t.insert(k, k);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_retrieve_hit(c: &mut Criterion) {
    c.bench_function("hash_table_retrieve_hit", |b| {
        let (t, keys) = filled(4096, 7, 10_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.retrieve(k));
        })
    });
}

fn bench_retrieve_miss(c: &mut Criterion) {
    c.bench_function("hash_table_retrieve_miss", |b| {
        let (t, _) = filled(4096, 11, 10_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = key(miss.next().unwrap());
            black_box(t.retrieve(&k));
        })
    });
}

fn bench_resize(c: &mut Criterion) {
    c.bench_function("hash_table_resize_10k", |b| {
        b.iter_batched(
            || filled(1024, 3, 10_000).0,
            |t| black_box(t.resize().unwrap()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_retrieve_hit, bench_retrieve_miss, bench_resize
}
criterion_main!(benches);

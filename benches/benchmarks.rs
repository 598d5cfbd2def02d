// benches/benchmarks.rs — Session store benchmarks (criterion)
//
// The store sits on every webhook and callback request, and the sweep
// holds the write lock for a full pass, so these are the numbers to watch:
//   1. Upsert latency into a populated map
//   2. Lookup latency
//   3. Sweep cost over a large map (nothing expired / everything expired)

use std::time::Duration;

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use messenger_relay::session::SessionStore;

const TIMEOUT: Duration = Duration::from_secs(300);

fn populated(n: usize) -> SessionStore {
    let store = SessionStore::new();
    let t0 = Utc.timestamp_opt(0, 0).unwrap();
    for i in 0..n {
        store.upsert(&format!("conv-{i}"), &format!("psid-{i}"), t0);
    }
    store
}

fn bench_upsert(c: &mut Criterion) {
    let store = populated(10_000);
    let now = Utc.timestamp_opt(10, 0).unwrap();
    let mut i = 0usize;
    c.bench_function("upsert_10k", |b| {
        b.iter(|| {
            i = (i + 1) % 10_000;
            store.upsert(black_box(&format!("conv-{i}")), "psid", now);
        })
    });
}

fn bench_lookup(c: &mut Criterion) {
    let store = populated(10_000);
    c.bench_function("lookup_10k", |b| {
        b.iter(|| black_box(store.lookup(black_box("conv-4242"))))
    });
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_10k");

    group.bench_function("none_expired", |b| {
        let store = populated(10_000);
        let now = Utc.timestamp_opt(100, 0).unwrap();
        b.iter(|| black_box(store.sweep(now, TIMEOUT)))
    });

    group.bench_function("all_expired", |b| {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        b.iter_batched(
            || populated(10_000),
            |store| black_box(store.sweep(now, TIMEOUT)),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_upsert, bench_lookup, bench_sweep);
criterion_main!(benches);

#![forbid(unsafe_code)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mensa_core::config::StorageKeys;
use mensa_core::reconcile::{reconcile, reconcile_lists};
use mensa_core::{DomSnapshot, HiddenSet, ItemOrder, MemoryStore, PersistentState};
use std::hint::black_box;

fn stored_state(ids: &[i64]) -> PersistentState<MemoryStore> {
    let order = serde_json::to_string(ids).unwrap_or_default();
    let store = MemoryStore::new().with_entry("canteen-order", &order);
    PersistentState::new(store, StorageKeys::default())
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for size in [8usize, 64, 256] {
        // Half the stored ids were removed from the page, half the page is new.
        let stored: Vec<i64> = (0..size as i64).rev().collect();
        let snapshot = DomSnapshot::from_ids((size as i64 / 2)..(size as i64 * 3 / 2));

        group.bench_with_input(BenchmarkId::new("lists", size), &size, |b, _| {
            b.iter(|| {
                let mut ordering = ItemOrder::from_ids(stored.iter().copied());
                let mut hidden = HiddenSet::new();
                black_box(reconcile_lists(&snapshot, &mut ordering, &mut hidden));
            });
        });

        group.bench_with_input(BenchmarkId::new("persisted", size), &size, |b, _| {
            b.iter(|| {
                let mut state = stored_state(&stored);
                black_box(reconcile(&mut state, &snapshot));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);

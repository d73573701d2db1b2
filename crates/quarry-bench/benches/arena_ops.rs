//! Criterion micro-benchmarks for arena allocation, deallocation, and audit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quarry_bench::{bench_arena, churn_workload, drain_refill_cycle, run_workload};

/// Benchmark: construct a 64KiB arena and write its initial block.
fn bench_arena_new(c: &mut Criterion) {
    c.bench_function("arena_new_64k", |b| {
        b.iter(|| {
            let arena = bench_arena();
            black_box(arena);
        });
    });
}

/// Benchmark: one allocate/deallocate round trip on a fresh arena.
fn bench_alloc_dealloc_round_trip(c: &mut Criterion) {
    let mut arena = bench_arena();
    c.bench_function("alloc_dealloc_64b", |b| {
        b.iter(|| {
            let handle = arena.allocate(black_box(64)).unwrap();
            arena.deallocate(handle).unwrap();
        });
    });
}

/// Benchmark: fill to exhaustion with 64-byte records, free forward.
///
/// Worst case for the first-fit scan: every allocation after the first
/// walks the whole occupied prefix.
fn bench_drain_refill(c: &mut Criterion) {
    let mut arena = bench_arena();
    c.bench_function("drain_refill_64b", |b| {
        b.iter(|| {
            let count = drain_refill_cycle(&mut arena, 64);
            black_box(count);
        });
    });
}

/// Benchmark: seeded random churn, the steady-state mixed workload.
fn bench_churn(c: &mut Criterion) {
    let ops = churn_workload(42, 1_000, 256);
    let mut arena = bench_arena();
    c.bench_function("churn_1k_ops", |b| {
        b.iter(|| {
            let completed = run_workload(&mut arena, &ops);
            black_box(completed);
        });
    });
}

/// Benchmark: structural audit of a fragmented chain.
fn bench_audit(c: &mut Criterion) {
    let mut arena = bench_arena();
    // Leave a realistic fragmented chain behind: allocate a batch, free
    // every other block.
    let handles: Vec<_> = (0..200).map(|_| arena.allocate(128).unwrap()).collect();
    for handle in handles.iter().step_by(2) {
        arena.deallocate(*handle).unwrap();
    }
    c.bench_function("audit_fragmented", |b| {
        b.iter(|| {
            arena.audit().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_arena_new,
    bench_alloc_dealloc_round_trip,
    bench_drain_refill,
    bench_churn,
    bench_audit
);
criterion_main!(benches);

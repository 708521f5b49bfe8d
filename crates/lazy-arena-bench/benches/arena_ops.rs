//! Criterion micro-benchmarks for bump allocation and context push/pop.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lazy_arena::{local, Arena, ArenaStack};
use lazy_arena_bench::{mixed_sizes, nested_scratch};

/// Benchmark: 1K mixed-size bump allocations from a 1MB arena, then reset.
fn bench_arena_alloc_1k(c: &mut Criterion) {
    let sizes = mixed_sizes(1_000, 64, 42);
    let mut arena = Arena::try_new(1 << 20).unwrap();
    c.bench_function("arena_alloc_1k", |b| {
        b.iter(|| {
            for &size in &sizes {
                black_box(arena.allocate(size).unwrap());
            }
            arena.reset();
        });
    });
}

/// Benchmark: push a 4KB context and pop it again on an owned stack.
fn bench_push_pop(c: &mut Criterion) {
    let mut stack = ArenaStack::with_default();
    c.bench_function("stack_push_pop_4k", |b| {
        b.iter(|| {
            let h = stack.push_context(black_box(4096)).unwrap();
            stack.pop_context(h);
        });
    });
}

/// Benchmark: outer context, forgotten nested scratch, single cascading pop.
fn bench_nested_scratch(c: &mut Criterion) {
    let sizes = mixed_sizes(64, 32, 7);
    let mut stack = ArenaStack::with_default();
    c.bench_function("nested_scratch_64", |b| {
        b.iter(|| black_box(nested_scratch(&mut stack, 8192, 1024, &sizes).unwrap()));
    });
}

/// Benchmark: thread-local allocation path, including the TLS lookup.
fn bench_local_alloc(c: &mut Criterion) {
    let ctx = local::push_context(1 << 20).unwrap();
    c.bench_function("local_alloc_16", |b| {
        b.iter(|| {
            black_box(local::allocate(16).unwrap());
            if local::with_active(|arena| arena.remaining() < 16).unwrap() {
                local::reset_top();
            }
        });
    });
    local::pop_context(ctx);
}

criterion_group!(
    benches,
    bench_arena_alloc_1k,
    bench_push_pop,
    bench_nested_scratch,
    bench_local_alloc
);
criterion_main!(benches);

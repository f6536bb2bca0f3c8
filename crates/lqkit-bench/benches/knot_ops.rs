//! Criterion micro-benchmarks for per-knot operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lqkit_bench::{bench_allocator, reference_dims, stress_dims};
use lqkit_core::KnotDims;
use lqkit_model::LqKnot;

/// Benchmark: allocate and zero one knot at reference dimensions.
fn bench_knot_new(c: &mut Criterion) {
    let allocator = bench_allocator();
    let dims = reference_dims();
    c.bench_function("knot_new_12x6", |b| {
        b.iter(|| {
            let knot = LqKnot::<f64>::new(black_box(dims), &allocator).unwrap();
            black_box(knot);
        });
    });
}

/// Benchmark: deep-copy one knot between allocators.
fn bench_knot_duplicate(c: &mut Criterion) {
    let src_alloc = bench_allocator();
    let dst_alloc = bench_allocator();
    let mut knot = LqKnot::<f64>::new(stress_dims(), &src_alloc).unwrap();
    knot.q_mat_mut().fill(1.5);
    knot.e_mut().fill(-1.0);

    c.bench_function("knot_duplicate_36x12", |b| {
        b.iter(|| {
            let copy = knot.duplicate(&dst_alloc).unwrap();
            black_box(copy);
        });
    });
}

/// Benchmark: resolve the full mutable view aggregate and touch one block.
fn bench_knot_view_mut(c: &mut Criterion) {
    let allocator = bench_allocator();
    let mut knot = LqKnot::<f64>::new(stress_dims(), &allocator).unwrap();

    c.bench_function("knot_view_mut_36x12", |b| {
        b.iter(|| {
            let mut v = knot.view_mut();
            v.q_mat[(0, 0)] = 1.0;
            black_box(v.q_mat.rows());
        });
    });
}

/// Benchmark: parameterization growth, the only whole-store reshape.
fn bench_knot_add_parameterization(c: &mut Criterion) {
    let allocator = bench_allocator();
    let dims = KnotDims::new(12, 6, 3);

    c.bench_function("knot_grow_nth_0_to_12", |b| {
        b.iter(|| {
            let mut knot = LqKnot::<f64>::new(dims, &allocator).unwrap();
            knot.add_parameterization(12).unwrap();
            black_box(knot.nth());
        });
    });
}

criterion_group!(
    benches,
    bench_knot_new,
    bench_knot_duplicate,
    bench_knot_view_mut,
    bench_knot_add_parameterization
);
criterion_main!(benches);

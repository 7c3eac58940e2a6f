//! Forward against reverse mode on the same functions, with finite
//! differences as the baseline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jacobi::{evaluate_forward, evaluate_reverse, Forward, Reverse};

#[path = "common/mod.rs"]
mod common;
use common::*;

fn bench_gradient_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient_modes");
    for n in [2, 10, 100] {
        let x = make_input(n);

        group.bench_with_input(BenchmarkId::new("finite_diff", n), &x, |b, x| {
            b.iter(|| black_box(finite_diff_gradient(rosenbrock_f64, black_box(x), 1e-7)))
        });

        group.bench_with_input(BenchmarkId::new("forward", n), &x, |b, x| {
            b.iter(|| black_box(evaluate_forward(|v: &[Forward<f64>]| rosenbrock(v), black_box(x))))
        });

        group.bench_with_input(BenchmarkId::new("reverse", n), &x, |b, x| {
            b.iter(|| black_box(evaluate_reverse(|v: &[Reverse<f64>]| rosenbrock(v), black_box(x))))
        });
    }
    group.finish();
}

// Reverse mode pays one backward pass per input; forward mode one lane.
fn bench_wide_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_jacobian");
    for n in [10, 100] {
        let x = make_input(n);

        group.bench_with_input(BenchmarkId::new("forward", n), &x, |b, x| {
            b.iter(|| black_box(evaluate_forward(|v: &[Forward<f64>]| two_output(v), black_box(x))))
        });

        group.bench_with_input(BenchmarkId::new("reverse", n), &x, |b, x| {
            b.iter(|| black_box(evaluate_reverse(|v: &[Reverse<f64>]| two_output(v), black_box(x))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gradient_modes, bench_wide_jacobian);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jacobi::{evaluate_reverse, gradient, Reverse};

#[path = "common/mod.rs"]
mod common;
use common::*;

fn bench_reverse_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse_gradient");
    for n in [2, 10, 100, 1000] {
        let x = make_input(n);

        group.bench_with_input(BenchmarkId::new("rosenbrock", n), &x, |b, x| {
            b.iter(|| black_box(gradient(|v: &[Reverse<f64>]| Ok(rosenbrock(v)), black_box(x))))
        });

        group.bench_with_input(BenchmarkId::new("nn_layer", n), &x, |b, x| {
            b.iter(|| black_box(gradient(|v: &[Reverse<f64>]| Ok(nn_layer(v)), black_box(x))))
        });
    }
    group.finish();
}

fn bench_reverse_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse_jacobian");
    for n in [10, 50, 100] {
        let x = make_input(n);
        group.bench_with_input(BenchmarkId::new("poisson", n), &x, |b, x| {
            b.iter(|| black_box(evaluate_reverse(|v: &[Reverse<f64>]| poisson_residual(v), black_box(x))))
        });
    }
    group.finish();
}

fn bench_deep_chain(c: &mut Criterion) {
    c.bench_function("reverse_chain_10000", |b| {
        b.iter(|| {
            black_box(evaluate_reverse(
                |v: &[Reverse<f64>]| {
                    let mut y = v[0];
                    for _ in 0..10_000 {
                        y = y.sin() + v[0];
                    }
                    y
                },
                black_box(&[0.3]),
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_reverse_gradient,
    bench_reverse_jacobian,
    bench_deep_chain
);
criterion_main!(benches);

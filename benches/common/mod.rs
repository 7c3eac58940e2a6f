#![allow(dead_code)]

use jacobi::{Result, Scalar};

// ─── Rosenbrock ────────────────────────────────────────────────────────────

pub fn rosenbrock<T: Scalar>(x: &[T]) -> T {
    let one = T::lit(1.0);
    let hundred = T::lit(100.0);
    let mut sum = T::lit(0.0);
    for i in 0..x.len() - 1 {
        let t1 = one - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum = sum + t1 * t1 + hundred * t2 * t2;
    }
    sum
}

pub fn rosenbrock_f64(x: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..x.len() - 1 {
        let t1 = 1.0 - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum += t1 * t1 + 100.0 * t2 * t2;
    }
    sum
}

// ─── Neural network layer ──────────────────────────────────────────────────
// f(x) = Σ_j logistic(Σ_i w_ji·x_i + b_j), 4 hidden units
// w_ji = sin(j*N+i+1) / (N+1), b_j = 0.1*(j+1)

pub fn nn_layer<T: Scalar>(x: &[T]) -> T {
    let n = x.len();
    let scale = 1.0 / (n as f64 + 1.0);
    let mut total = T::lit(0.0);
    for j in 0..4_usize {
        let mut z = T::lit(0.1 * (j as f64 + 1.0));
        for (i, &xi) in x.iter().enumerate() {
            let w = ((j * n + i + 1) as f64).sin() * scale;
            z = z + T::lit(w) * xi;
        }
        total = total + z.logistic();
    }
    total
}

// ─── Poisson residual ──────────────────────────────────────────────────────
// r_i = -u_{i-1} + 2u_i - u_{i+1} - h², Dirichlet u_0 = u_{N+1} = 0

pub fn poisson_residual<T: Scalar>(x: &[T]) -> Vec<T> {
    let n = x.len();
    let h = 1.0 / (n as f64 + 1.0);
    let h2 = T::lit(h * h);
    let two = T::lit(2.0);
    let zero = T::lit(0.0);
    (0..n)
        .map(|i| {
            let u_prev = if i == 0 { zero } else { x[i - 1] };
            let u_next = if i == n - 1 { zero } else { x[i + 1] };
            two * x[i] - u_prev - u_next - h2
        })
        .collect()
}

// ─── Two outputs, many inputs ──────────────────────────────────────────────

pub fn two_output<T: Scalar>(x: &[T]) -> Result<Vec<T>> {
    let mut s1 = T::lit(0.0);
    let mut s2 = T::lit(0.0);
    for &xi in x {
        s1 = s1 + xi * xi;
        s2 = s2 + xi.sin();
    }
    Ok(vec![s1, (s2 / T::lit(x.len() as f64))?])
}

// ─── Finite differences ────────────────────────────────────────────────────

pub fn finite_diff_gradient(f: impl Fn(&[f64]) -> f64, x: &[f64], h: f64) -> Vec<f64> {
    let n = x.len();
    let mut grad = vec![0.0; n];
    for i in 0..n {
        let mut xp = x.to_vec();
        let mut xm = x.to_vec();
        xp[i] += h;
        xm[i] -= h;
        grad[i] = (f(&xp) - f(&xm)) / (2.0 * h);
    }
    grad
}

// ─── Helpers ───────────────────────────────────────────────────────────────

pub fn make_input(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}

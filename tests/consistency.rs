//! Forward and reverse mode must agree on values and derivatives.

use approx::assert_relative_eq;
use jacobi::{
    evaluate_forward, evaluate_reverse, Derivative, Forward, Result, Reverse, Scalar, Value,
};

fn flatten(der: &Derivative<f64>) -> Vec<f64> {
    match der {
        Derivative::Scalar(d) => vec![*d],
        Derivative::Vector(v) => v.clone(),
        Derivative::Matrix(rows) => rows.iter().flatten().copied().collect(),
    }
}

/// Evaluate a mode-generic function under both drivers and compare.
fn assert_modes_agree<R1, R2>(
    f_fwd: impl FnOnce(&[Forward<f64>]) -> R1,
    f_rev: impl FnOnce(&[Reverse<f64>]) -> R2,
    x: &[f64],
) -> (Value<f64>, Derivative<f64>)
where
    R1: jacobi::IntoOutputs<Forward<f64>>,
    R2: jacobi::IntoOutputs<Reverse<f64>>,
{
    let fwd = evaluate_forward(f_fwd, x).unwrap();
    let rev = evaluate_reverse(f_rev, x).unwrap();

    assert_eq!(fwd.derivative.shape(), rev.derivative.shape());
    for (a, b) in fwd.value.to_vec().iter().zip(rev.value.to_vec()) {
        assert_relative_eq!(*a, b, max_relative = 1e-8);
    }
    for (a, b) in flatten(&fwd.derivative).iter().zip(flatten(&rev.derivative)) {
        assert_relative_eq!(*a, b, max_relative = 1e-8, epsilon = 1e-12);
    }
    (fwd.value, fwd.derivative)
}

// ── Functions written once for both modes ──

fn product<V: Scalar>(x: &[V]) -> V {
    x[0] * x[1]
}

fn linear<V: Scalar>(x: &[V]) -> V {
    V::lit(2.0) * x[0] + x[1]
}

fn sin_cos<V: Scalar>(x: &[V]) -> Vec<V> {
    vec![x[0].sin(), x[0].cos()]
}

/// x4 = x1 + x2; [exp(5·x3), x2³ + x4, 2·√x1·x4]
fn three_by_three<V: Scalar>(x: &[V]) -> Result<Vec<V>> {
    let x4 = x[0] + x[1];
    Ok(vec![
        (V::lit(5.0) * x[2]).exp(),
        x[1].powf(num_traits::cast(3.0).unwrap())? + x4,
        V::lit(2.0) * x[0].sqrt()? * x4,
    ])
}

fn shared_subexpression<V: Scalar>(x: &[V]) -> Result<V> {
    Ok(x[0] * x[1] - (x[0] + x[1]).pow(x[1])?)
}

fn kitchen_sink<V: Scalar>(x: &[V]) -> Result<Vec<V>> {
    let a = x[0].tanh() * x[1].logistic();
    let b = (x[0] * x[1]).ln()? + x[2].atan() - x[1].sinh();
    let c = ((a * b).cosh() / (x[2] * x[2] + V::lit(1.0)))?;
    let d = x[0].asin()? + x[2].tan()? * x[1].acos()?;
    let e = x[1].log(num_traits::cast(3.0).unwrap())?.rpow(num_traits::cast(2.0).unwrap())?;
    Ok(vec![a, b, c, d, e, a * b * c * d * e])
}

#[test]
fn linearity_seed() {
    let (value, der) = assert_modes_agree(product, product, &[1.0, 2.0]);
    assert_eq!(value, Value::Scalar(2.0));
    assert_eq!(der, Derivative::Vector(vec![2.0, 1.0]));
}

#[test]
fn scalar_output_multivariate() {
    let (value, der) = assert_modes_agree(linear, linear, &[1.0, 2.0]);
    assert_eq!(value, Value::Scalar(4.0));
    assert_eq!(der, Derivative::Vector(vec![2.0, 1.0]));
}

#[test]
fn vector_output_univariate() {
    let (value, der) = assert_modes_agree(sin_cos, sin_cos, &[50.0]);
    assert_eq!(value, Value::Vector(vec![50.0_f64.sin(), 50.0_f64.cos()]));
    assert_eq!(der, Derivative::Vector(vec![50.0_f64.cos(), -50.0_f64.sin()]));
}

#[test]
fn full_jacobian() {
    let (_, der) = assert_modes_agree(three_by_three, three_by_three, &[3.0, 4.0, 5.0]);
    let rows = der.as_matrix().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0][0], 0.0);
    assert_eq!(rows[0][1], 0.0);
    assert_relative_eq!(rows[0][2], 3.6002e11, max_relative = 1e-3);

    assert_relative_eq!(rows[1][0], 1.0);
    assert_relative_eq!(rows[1][1], 49.0);
    assert_eq!(rows[1][2], 0.0);

    assert_relative_eq!(rows[2][0], 7.5056, epsilon = 1e-3);
    assert_relative_eq!(rows[2][1], 3.4641, epsilon = 1e-3);
    assert_eq!(rows[2][2], 0.0);
}

#[test]
fn shared_subexpression_reuse() {
    let (_, der) = assert_modes_agree(shared_subexpression, shared_subexpression, &[1.0, 2.0]);
    let g = der.as_vector().unwrap();
    assert_relative_eq!(g[0], -4.0, max_relative = 1e-12);
    assert_relative_eq!(g[1], 1.0 - 9.0 * (2.0 / 3.0 + 3.0_f64.ln()), max_relative = 1e-12);
}

#[test]
fn many_operations_many_outputs() {
    let (_, der) = assert_modes_agree(kitchen_sink, kitchen_sink, &[0.3, 0.6, 0.9]);
    assert_eq!(der.shape(), vec![6, 3]);
}

#[test]
fn every_input_point_agrees() {
    for x in [[0.1, 0.2, 0.3], [0.5, 0.5, 0.5], [0.4, 0.9, 1.2], [0.9, 0.1, -1.0]] {
        assert_modes_agree(kitchen_sink, kitchen_sink, &x);
    }
}

#[test]
fn reflected_and_mixed_operators() {
    fn fwd(x: &[Forward<f64>]) -> Result<Vec<Forward<f64>>> {
        Ok(vec![
            (3.0 - x[0]) * 2.0 + 1.5,
            (4.0 / x[1])? - (x[0] / 2.0)?,
            x[0].rpow(3.0)? * x[1].powf(-1.5)?,
        ])
    }
    fn rev(x: &[Reverse<f64>]) -> Result<Vec<Reverse<f64>>> {
        Ok(vec![
            (3.0 - x[0]) * 2.0 + 1.5,
            (4.0 / x[1])? - (x[0] / 2.0)?,
            x[0].rpow(3.0)? * x[1].powf(-1.5)?,
        ])
    }
    assert_modes_agree(fwd, rev, &[1.2, 0.7]);
}

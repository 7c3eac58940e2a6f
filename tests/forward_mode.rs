use approx::assert_relative_eq;
use jacobi::graph::{ForwardGraph, GraphGuard};
use jacobi::{evaluate_forward, Derivative, Forward, Result, Value};

/// Central finite difference: (f(x+h) - f(x-h)) / 2h
fn finite_diff(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-7;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Check a forward elemental against finite differences.
fn check_elemental(
    f_fwd: impl Fn(Forward<f64>) -> Result<Forward<f64>>,
    f_f64: impl Fn(f64) -> f64,
    x: f64,
    tol: f64,
) {
    let eval = evaluate_forward(|v: &[Forward<f64>]| f_fwd(v[0]), &[x]).unwrap();
    let value = eval.value.as_scalar().unwrap();
    let der = eval.derivative.as_scalar().unwrap();
    assert_relative_eq!(value, f_f64(x), max_relative = 1e-12);
    assert_relative_eq!(der, finite_diff(&f_f64, x), max_relative = tol);
}

// ── Arithmetic ──

#[test]
fn product_rule() {
    let eval = evaluate_forward(|x: &[Forward<f64>]| x[0] * x[1], &[3.0, 4.0]).unwrap();
    assert_eq!(eval.value, Value::Scalar(12.0));
    assert_eq!(eval.derivative, Derivative::Vector(vec![4.0, 3.0]));
}

#[test]
fn quotient_rule() {
    // d/dx (x / (x+1)) at x=2: 1/(x+1)^2 = 1/9
    check_elemental(|x| x / (x + 1.0), |x| x / (x + 1.0), 2.0, 1e-6);
}

#[test]
fn mixed_scalar_ops() {
    let eval = evaluate_forward(
        |x: &[Forward<f64>]| -> Result<Vec<Forward<f64>>> {
            Ok(vec![x[0] * 2.0, 2.0 * x[0], (1.0 / x[0])?, 5.0 - x[0], x[0] - 5.0])
        },
        &[3.0],
    )
    .unwrap();
    let der = eval.derivative.as_vector().unwrap();
    assert_relative_eq!(der[0], 2.0);
    assert_relative_eq!(der[1], 2.0);
    assert_relative_eq!(der[2], -1.0 / 9.0, max_relative = 1e-12);
    assert_relative_eq!(der[3], -1.0);
    assert_relative_eq!(der[4], 1.0);
}

#[test]
fn negation() {
    check_elemental(|x| Ok(-x), |x| -x, 1.5, 1e-6);
}

// ── Elementals ──

#[test]
fn exp_and_logs() {
    check_elemental(|x| Ok(x.exp()), f64::exp, 0.7, 1e-6);
    check_elemental(|x| x.ln(), f64::ln, 2.5, 1e-6);
    check_elemental(|x| x.log(2.0), f64::log2, 2.5, 1e-6);
    check_elemental(|x| x.log(10.0), f64::log10, 0.3, 1e-6);
}

#[test]
fn sqrt_and_powers() {
    check_elemental(|x| x.sqrt(), f64::sqrt, 4.0, 1e-6);
    check_elemental(|x| x.powf(3.0), |x| x.powi(3), 1.3, 1e-6);
    check_elemental(|x| x.powf(0.5), f64::sqrt, 2.0, 1e-6);
    check_elemental(|x| x.rpow(2.0), |x| 2.0_f64.powf(x), 1.3, 1e-6);
    check_elemental(|x| x.pow(x), |x| x.powf(x), 1.7, 1e-6);
    check_elemental(|x| x.recip(), |x| 1.0 / x, -0.8, 1e-6);
}

#[test]
fn negative_base_with_integer_exponent() {
    check_elemental(|x| x.powf(3.0), |x| x.powi(3), -1.5, 1e-6);
    check_elemental(|x| x.powf(-2.0), |x| x.powi(-2), -1.5, 1e-6);
}

#[test]
fn trig() {
    check_elemental(|x| Ok(x.sin()), f64::sin, 0.4, 1e-6);
    check_elemental(|x| Ok(x.cos()), f64::cos, 0.4, 1e-6);
    check_elemental(|x| x.tan(), f64::tan, 0.4, 1e-6);
    check_elemental(|x| x.asin(), f64::asin, 0.3, 1e-6);
    check_elemental(|x| x.acos(), f64::acos, 0.3, 1e-6);
    check_elemental(|x| Ok(x.atan()), f64::atan, 2.0, 1e-6);
}

#[test]
fn hyperbolic_and_logistic() {
    check_elemental(|x| Ok(x.sinh()), f64::sinh, 0.9, 1e-6);
    check_elemental(|x| Ok(x.cosh()), f64::cosh, 0.9, 1e-6);
    check_elemental(|x| Ok(x.tanh()), f64::tanh, 0.9, 1e-6);
    check_elemental(
        |x| Ok(x.logistic()),
        |x| 1.0 / (1.0 + (-x).exp()),
        0.9,
        1e-6,
    );
}

#[test]
fn chain_rule_composite() {
    // f(x) = sin(x^2) * exp(x)
    check_elemental(
        |x| Ok((x * x).sin() * x.exp()),
        |x| (x * x).sin() * x.exp(),
        0.8,
        1e-6,
    );
}

// ── Derivative vectors ──

#[test]
fn derivative_is_a_full_gradient_vector() {
    // x1 * x2 at (1, 2): every node carries ∂/∂x1 and ∂/∂x2 at once.
    let eval = evaluate_forward(|x: &[Forward<f64>]| x[0] * x[1], &[1.0, 2.0]).unwrap();
    assert_eq!(eval.value, Value::Scalar(2.0));
    assert_eq!(eval.derivative, Derivative::Vector(vec![2.0, 1.0]));
}

#[test]
fn explicit_derivative_vectors() {
    let mut graph = ForwardGraph::<f64>::new(3);
    let _guard = GraphGuard::new(&mut graph);

    let a = Forward::new(2.0, vec![1.0, 0.0, 0.5]);
    let b = Forward::variable(3.0);
    let c = Forward::constant(4.0);
    assert_eq!(b.derivative(), vec![1.0, 1.0, 1.0]);
    assert_eq!(c.derivative(), vec![0.0, 0.0, 0.0]);

    let y = a * b + c;
    assert_eq!(y.value(), 10.0);
    // b·da + a·db
    assert_eq!(y.derivative(), vec![5.0, 2.0, 3.5]);
}

#[test]
#[should_panic(expected = "graph expects")]
fn derivative_dimension_is_checked() {
    let mut graph = ForwardGraph::<f64>::new(2);
    let _guard = GraphGuard::new(&mut graph);
    let _ = Forward::new(1.0, vec![1.0]);
}

#[test]
fn labels_restart_per_evaluation() {
    let first = evaluate_forward(|x: &[Forward<f64>]| x[0].sin() + x[1], &[0.1, 0.2]).unwrap();
    let second = evaluate_forward(|x: &[Forward<f64>]| x[0].sin() + x[1], &[0.3, 0.4]).unwrap();

    let labels = |graph: &ForwardGraph<f64>| -> Vec<String> {
        graph.iter().map(|(id, _)| graph.label(id)).collect()
    };
    assert_eq!(labels(&first.graph), vec!["v-1", "v0", "v1", "v2"]);
    assert_eq!(labels(&first.graph), labels(&second.graph));
}

#[test]
fn describe_reports_label_value_and_operation() {
    let mut graph = ForwardGraph::<f64>::new(1);
    let _guard = GraphGuard::new(&mut graph);
    let x = Forward::<f64>::variable(2.0);
    let y = x * 3.0;
    assert_eq!(y.label(), "v2");
    assert_eq!(
        y.describe(),
        "Node: vindex=v2, val=6, der=[3.0], parent=[v1], and op=[*, 3]."
    );
    assert_eq!(y.to_string(), "6");
}

#[test]
fn display_summary() {
    let eval = evaluate_forward(|x: &[Forward<f64>]| vec![x[0] * x[1], x[0] + x[1]], &[1.0, 2.0]).unwrap();
    assert_eq!(eval.to_string(), "Forward: val=[2, 3], der=[[2, 1], [1, 1]]");
}

#[test]
fn f32_inputs() {
    let eval = evaluate_forward(|x: &[Forward<f32>]| x[0] * x[0] * 3.0_f32, &[2.0_f32]).unwrap();
    assert_eq!(eval.value, Value::Scalar(12.0_f32));
    assert_eq!(eval.derivative, Derivative::Scalar(12.0_f32));
}

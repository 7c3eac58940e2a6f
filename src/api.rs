use tracing::debug;

use crate::backward::BackwardPass;
use crate::error::Result;
use crate::evaluation::{Derivative, ForwardEvaluation, ReverseEvaluation, Value};
use crate::float::Float;
use crate::forward::Forward;
use crate::graph::{ForwardGraph, GraphGuard, GraphThreadLocal};
use crate::node::NodeId;
use crate::outputs::{IntoOutputs, Output};
use crate::reverse::Reverse;
use crate::tape::{Tape, TapeGuard, TapeThreadLocal};

/// Evaluate `f` at `x` in forward mode.
///
/// Each input is seeded with its standard basis vector, so one pass through
/// `f` yields every partial derivative. Plain numbers returned by `f` are
/// wrapped as zero-derivative constants. The value and derivative are
/// reshaped as described in [`evaluation`](crate::evaluation); the recorded
/// graph is returned alongside for visualization.
///
/// ```
/// use jacobi::{evaluate_forward, Derivative, Forward};
///
/// let eval = evaluate_forward(|x: &[Forward<f64>]| 2.0 * x[0] + x[1], &[1.0, 2.0]).unwrap();
/// assert_eq!(eval.value.as_scalar(), Some(4.0));
/// assert_eq!(eval.derivative, Derivative::Vector(vec![2.0, 1.0]));
/// ```
///
/// # Panics
///
/// Panics if `x` is empty.
pub fn evaluate_forward<F, R>(
    f: impl FnOnce(&[Forward<F>]) -> R,
    x: &[F],
) -> Result<ForwardEvaluation<F>>
where
    F: Float + GraphThreadLocal,
    R: IntoOutputs<Forward<F>>,
{
    let m = x.len();
    assert!(m > 0, "evaluate_forward needs at least one input");

    let mut graph = ForwardGraph::for_inputs(m);
    let inputs: Vec<Forward<F>> = x
        .iter()
        .enumerate()
        .map(|(lane, &val)| Forward::from_graph(val, graph.push_input(val, lane)))
        .collect();

    let (single, outputs) = {
        let _guard = GraphGuard::new(&mut graph);
        let outputs = f(&inputs).into_outputs()?;
        let single = outputs.is_single();
        let nodes: Vec<Forward<F>> = outputs
            .into_vec()
            .into_iter()
            .map(|o| match o {
                Output::Value(v) => v,
                Output::Constant(c) => Forward::constant(c),
            })
            .collect();
        (single, nodes)
    };

    let values: Vec<F> = outputs.iter().map(|o| o.value).collect();
    let rows: Vec<Vec<F>> = outputs
        .iter()
        .map(|o| graph.derivative(o.id).to_vec())
        .collect();
    debug!(
        inputs = m,
        outputs = outputs.len(),
        nodes = graph.len(),
        "forward evaluation"
    );

    Ok(ForwardEvaluation {
        value: Value::normalize(values, single),
        derivative: Derivative::normalize(rows, single, m),
        outputs: outputs.iter().map(|o| o.id).collect(),
        graph,
    })
}

/// Evaluate `f` at `x` in reverse mode.
///
/// `f` runs once to record the tape; then one backward pass per input
/// produces that input's column of the Jacobian. Value and derivative have
/// exactly the shapes [`evaluate_forward`] produces.
///
/// ```
/// use jacobi::{evaluate_reverse, Derivative, Reverse};
///
/// let eval = evaluate_reverse(|x: &[Reverse<f64>]| x[0] * x[1], &[3.0, 4.0]).unwrap();
/// assert_eq!(eval.derivative, Derivative::Vector(vec![4.0, 3.0]));
/// ```
///
/// # Panics
///
/// Panics if `x` is empty.
pub fn evaluate_reverse<F, R>(
    f: impl FnOnce(&[Reverse<F>]) -> R,
    x: &[F],
) -> Result<ReverseEvaluation<F>>
where
    F: Float + TapeThreadLocal,
    R: IntoOutputs<Reverse<F>>,
{
    let m = x.len();
    assert!(m > 0, "evaluate_reverse needs at least one input");

    let mut tape = Tape::with_capacity(m * 10);
    let inputs: Vec<Reverse<F>> = x
        .iter()
        .map(|&val| Reverse::from_tape(val, tape.new_variable(val)))
        .collect();

    let (single, outputs) = {
        let _guard = TapeGuard::new(&mut tape);
        let outputs = f(&inputs).into_outputs()?;
        let single = outputs.is_single();
        let nodes: Vec<Reverse<F>> = outputs
            .into_vec()
            .into_iter()
            .map(|o| match o {
                Output::Value(v) => v,
                Output::Constant(c) => Reverse::constant(c),
            })
            .collect();
        (single, nodes)
    };

    let ids: Vec<NodeId> = outputs.iter().map(|o| o.id).collect();
    tape.set_outputs(&ids);

    let mut rows = vec![vec![F::zero(); m]; ids.len()];
    let mut pass = BackwardPass::new();
    for (j, input) in inputs.iter().enumerate() {
        let contributions = pass.derivatives(&tape, input.id);
        for (row, &out) in rows.iter_mut().zip(&ids) {
            row[j] = match contributions.get(out) {
                Some(d) => d,
                // An input returned as-is is its own output.
                None if out == input.id => F::one(),
                None => F::zero(),
            };
        }
        pass.clear(&tape, input.id);
    }
    debug!(
        inputs = m,
        outputs = ids.len(),
        nodes = tape.len(),
        edges = tape.num_edges(),
        "reverse evaluation"
    );

    Ok(ReverseEvaluation {
        value: Value::normalize(outputs.iter().map(|o| o.value).collect(), single),
        derivative: Derivative::normalize(rows, single, m),
    })
}

/// Value and gradient of a scalar function, in reverse mode.
///
/// Unlike [`evaluate_reverse`] the gradient is always a vector, even for one
/// input.
pub fn gradient<F: Float + TapeThreadLocal>(
    f: impl FnOnce(&[Reverse<F>]) -> Result<Reverse<F>>,
    x: &[F],
) -> Result<(F, Vec<F>)> {
    let eval = evaluate_reverse(f, x)?;
    let value = eval.value.to_vec()[0];
    let grad = match eval.derivative {
        Derivative::Scalar(d) => vec![d],
        Derivative::Vector(g) => g,
        Derivative::Matrix(rows) => rows.into_iter().next().unwrap_or_default(),
    };
    Ok((value, grad))
}

/// Values and the full `k × m` Jacobian of a vector function, in forward mode.
///
/// No reshaping: rows are outputs, columns are inputs, whatever `k` and `m`.
pub fn jacobian<F: Float + GraphThreadLocal>(
    f: impl FnOnce(&[Forward<F>]) -> Result<Vec<Forward<F>>>,
    x: &[F],
) -> Result<(Vec<F>, Vec<Vec<F>>)> {
    let eval = evaluate_forward(f, x)?;
    let values = eval.value.to_vec();
    let rows = eval
        .outputs
        .iter()
        .map(|&id| eval.graph.derivative(id).to_vec())
        .collect();
    Ok((values, rows))
}

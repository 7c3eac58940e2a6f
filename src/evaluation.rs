//! Shape-normalized driver results.
//!
//! | outputs | inputs | value          | derivative            |
//! |---------|--------|----------------|-----------------------|
//! | single  | 1      | `Scalar`       | `Scalar`              |
//! | single  | m > 1  | `Scalar`       | `Vector` (gradient)   |
//! | list    | 1      | `Vector`       | `Vector` (the column) |
//! | list    | m > 1  | `Vector`       | `Matrix` (k × m)      |
//!
//! A list with one element is still a list: it yields a `Vector` value.

use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::ForwardGraph;
use crate::graphvis;
use crate::node::NodeId;
use crate::Float;

/// Function value at the evaluation point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value<F> {
    Scalar(F),
    Vector(Vec<F>),
}

/// Derivative at the evaluation point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Derivative<F> {
    Scalar(F),
    Vector(Vec<F>),
    /// Output-major Jacobian: `rows[i][j] = ∂f_i/∂x_j`.
    Matrix(Vec<Vec<F>>),
}

impl<F: Float> Value<F> {
    pub(crate) fn normalize(values: Vec<F>, single_output: bool) -> Self {
        if single_output && values.len() == 1 {
            Value::Scalar(values[0])
        } else {
            Value::Vector(values)
        }
    }

    pub fn as_scalar(&self) -> Option<F> {
        match *self {
            Value::Scalar(v) => Some(v),
            Value::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[F]> {
        match self {
            Value::Vector(v) => Some(v),
            Value::Scalar(_) => None,
        }
    }

    /// Flattened values, one per output.
    pub fn to_vec(&self) -> Vec<F> {
        match self {
            Value::Scalar(v) => vec![*v],
            Value::Vector(v) => v.clone(),
        }
    }
}

impl<F: Float> Derivative<F> {
    /// Reshape output-major rows (`rows[i][j] = ∂f_i/∂x_j`).
    pub(crate) fn normalize(rows: Vec<Vec<F>>, single_output: bool, num_inputs: usize) -> Self {
        if single_output {
            let row = rows.into_iter().next().unwrap_or_default();
            if num_inputs == 1 {
                Derivative::Scalar(row.first().copied().unwrap_or_else(F::zero))
            } else {
                Derivative::Vector(row)
            }
        } else if num_inputs == 1 {
            Derivative::Vector(rows.into_iter().map(|r| r[0]).collect())
        } else {
            Derivative::Matrix(rows)
        }
    }

    pub fn as_scalar(&self) -> Option<F> {
        match *self {
            Derivative::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[F]> {
        match self {
            Derivative::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&[Vec<F>]> {
        match self {
            Derivative::Matrix(rows) => Some(rows),
            _ => None,
        }
    }

    /// Array shape: `[]`, `[n]` or `[rows, cols]`.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Derivative::Scalar(_) => Vec::new(),
            Derivative::Vector(v) => vec![v.len()],
            Derivative::Matrix(rows) => vec![rows.len(), rows.first().map_or(0, Vec::len)],
        }
    }
}

impl<F: Display> Display for Value<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{v}"),
            Value::Vector(v) => write_list(f, v),
        }
    }
}

impl<F: Display> Display for Derivative<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derivative::Scalar(v) => write!(f, "{v}"),
            Derivative::Vector(v) => write_list(f, v),
            Derivative::Matrix(rows) => {
                f.write_str("[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_list(f, row)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_list<F: Display>(f: &mut fmt::Formatter<'_>, items: &[F]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

/// Result of [`evaluate_forward`](crate::evaluate_forward).
#[derive(Clone, Debug)]
pub struct ForwardEvaluation<F> {
    pub value: Value<F>,
    pub derivative: Derivative<F>,
    /// Graph nodes of the returned outputs, in output order.
    pub outputs: Vec<NodeId>,
    /// Everything recorded while the function ran.
    pub graph: ForwardGraph<F>,
}

impl<F: Float> ForwardEvaluation<F> {
    /// Render the recorded computation as Graphviz DOT text.
    pub fn to_dot(&self) -> String {
        graphvis::to_dot(&self.graph, &self.outputs)
    }

    /// Number of seeded inputs.
    pub fn num_inputs(&self) -> usize {
        self.graph.dim()
    }
}

impl<F: Float> Display for ForwardEvaluation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Forward: val={}, der={}", self.value, self.derivative)
    }
}

/// Result of [`evaluate_reverse`](crate::evaluate_reverse).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReverseEvaluation<F> {
    pub value: Value<F>,
    pub derivative: Derivative<F>,
}

impl<F: Float> Display for ReverseEvaluation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reverse: val={}, der={}", self.value, self.derivative)
    }
}

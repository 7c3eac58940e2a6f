//! Forward- and reverse-mode automatic differentiation with Jacobian
//! assembly.
//!
//! Write a function over [`Forward`] or [`Reverse`] values (or generically
//! over any [`Scalar`]) and hand it to [`evaluate_forward`] or
//! [`evaluate_reverse`]. Both return the function value and its derivative,
//! reshaped by the number of inputs and outputs (see [`evaluation`]).

pub mod api;
pub mod backward;
pub mod domain;
pub mod elemental;
pub mod error;
pub mod evaluation;
pub mod float;
pub mod forward;
pub mod graph;
pub mod graphvis;
pub mod node;
pub mod op;
pub mod operand;
pub mod outputs;
pub mod reverse;
pub mod scalar;
pub mod tape;
mod traits;

#[cfg(feature = "ndarray")]
pub mod ndarray_support;

pub use api::{evaluate_forward, evaluate_reverse, gradient, jacobian};
pub use backward::{BackwardPass, Contributions};
pub use error::{AdError, Result};
pub use evaluation::{Derivative, ForwardEvaluation, ReverseEvaluation, Value};
pub use float::Float;
pub use forward::Forward;
pub use node::NodeId;
pub use op::{BinaryOp, CompareOp, UnaryOp};
pub use operand::Operand;
pub use outputs::{IntoOutputs, Output, Outputs};
pub use reverse::Reverse;
pub use scalar::Scalar;

/// Type alias for forward-mode values over `f64`.
pub type Forward64 = Forward<f64>;
/// Type alias for forward-mode values over `f32`.
pub type Forward32 = Forward<f32>;
/// Type alias for reverse-mode values over `f64`.
pub type Reverse64 = Reverse<f64>;
/// Type alias for reverse-mode values over `f32`.
pub type Reverse32 = Reverse<f32>;

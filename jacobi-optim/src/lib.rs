//! Solvers that use [`jacobi`] as a pure `(f, x) -> (value, derivative)`
//! oracle.

pub mod convergence;
pub mod linalg;
pub mod objective;
pub mod result;
pub mod solvers;

pub use objective::{ForwardObjective, Objective, ReverseObjective};
pub use result::{OptimResult, TerminationReason};
pub use solvers::gradient_descent::{gradient_descent, GradientDescentConfig};
pub use solvers::newton::{newton, NewtonConfig};

use jacobi::{Float, Result};
use tracing::{debug, warn};

use crate::convergence::{converged, norm};
use crate::linalg::least_squares;
use crate::objective::Objective;
use crate::result::{OptimResult, TerminationReason};

/// Configuration for the Newton root finder.
#[derive(Debug, Clone)]
pub struct NewtonConfig<F> {
    /// Stop when `‖f(x)‖ < tol` (default: 1e-5).
    pub tol: F,
    /// Maximum number of Newton steps (default: 500).
    pub max_iter: usize,
}

impl Default for NewtonConfig<f64> {
    fn default() -> Self {
        NewtonConfig {
            tol: 1e-5,
            max_iter: 500,
        }
    }
}

impl Default for NewtonConfig<f32> {
    fn default() -> Self {
        NewtonConfig {
            tol: 1e-5,
            max_iter: 500,
        }
    }
}

/// Newton's method for `f(x) = 0`.
///
/// Each step solves `J(x) Δ = -f(x)` in the least-squares sense (see
/// [`least_squares`]) and sets `x ← x + Δ`, so non-square systems are
/// handled as well. Errors raised while differentiating `f` propagate
/// unchanged.
pub fn newton<F: Float, O: Objective<F>>(
    obj: &mut O,
    x0: &[F],
    config: &NewtonConfig<F>,
) -> Result<OptimResult<F>> {
    debug_assert_eq!(x0.len(), obj.dim());
    let mut x = x0.to_vec();
    let mut func_evals = 0usize;

    for iter in 0..=config.max_iter {
        let (value, jac) = obj.eval_jacobian(&x)?;
        func_evals += 1;
        let value_norm = norm(&value);
        debug!(iter, norm = value_norm.to_report(), "newton");

        let stop = if converged(&value, config.tol) {
            Some(TerminationReason::Converged)
        } else if iter == config.max_iter {
            warn!(iterations = iter, "newton: no convergence");
            Some(TerminationReason::MaxIterations)
        } else {
            None
        };
        if let Some(termination) = stop {
            return Ok(OptimResult {
                x,
                value,
                value_norm,
                iterations: iter,
                func_evals,
                termination,
            });
        }

        let rhs: Vec<F> = value.iter().map(|&v| -v).collect();
        let Some(delta) = least_squares(&jac, &rhs) else {
            warn!(iter, "newton: singular Jacobian");
            return Ok(OptimResult {
                x,
                value,
                value_norm,
                iterations: iter,
                func_evals,
                termination: TerminationReason::SingularJacobian,
            });
        };
        for (xi, di) in x.iter_mut().zip(&delta) {
            *xi = *xi + *di;
        }
    }

    unreachable!("the final iteration always returns")
}

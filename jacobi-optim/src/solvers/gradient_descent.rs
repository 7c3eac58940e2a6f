use jacobi::{Float, Result};
use tracing::{debug, warn};

use crate::convergence::{converged, norm};
use crate::linalg::{matvec, transpose};
use crate::objective::Objective;
use crate::result::{OptimResult, TerminationReason};

/// Configuration for gradient descent.
#[derive(Debug, Clone)]
pub struct GradientDescentConfig<F> {
    /// Step size η (default: 0.1).
    pub learning_rate: F,
    /// Maximum number of steps (default: 50000).
    pub max_iter: usize,
    /// Stop when `‖f(x)‖ < tol` (default: 1e-5).
    pub tol: F,
}

impl Default for GradientDescentConfig<f64> {
    fn default() -> Self {
        GradientDescentConfig {
            learning_rate: 0.1,
            max_iter: 50_000,
            tol: 1e-5,
        }
    }
}

impl Default for GradientDescentConfig<f32> {
    fn default() -> Self {
        GradientDescentConfig {
            learning_rate: 0.1,
            max_iter: 50_000,
            tol: 1e-5,
        }
    }
}

/// Fixed-step gradient descent: `x ← x − η ∇f(x)` until `‖f(x)‖ < tol`.
///
/// For a scalar objective `∇f` is its gradient. For a vector objective it is
/// `Jᵀ f`, the gradient of `½‖f‖²`.
pub fn gradient_descent<F: Float, O: Objective<F>>(
    obj: &mut O,
    x0: &[F],
    config: &GradientDescentConfig<F>,
) -> Result<OptimResult<F>> {
    debug_assert_eq!(x0.len(), obj.dim());
    let mut x = x0.to_vec();
    let mut func_evals = 0usize;

    for iter in 0..=config.max_iter {
        let (value, jac) = obj.eval_jacobian(&x)?;
        func_evals += 1;
        let value_norm = norm(&value);

        let stop = if converged(&value, config.tol) {
            Some(TerminationReason::Converged)
        } else if !value_norm.is_finite() {
            warn!(iterations = iter, "gradient descent: diverged");
            Some(TerminationReason::Diverged)
        } else if iter == config.max_iter {
            warn!(iterations = iter, "gradient descent: no convergence");
            Some(TerminationReason::MaxIterations)
        } else {
            None
        };
        if let Some(termination) = stop {
            debug!(iterations = iter, norm = value_norm.to_report(), "gradient descent done");
            return Ok(OptimResult {
                x,
                value,
                value_norm,
                iterations: iter,
                func_evals,
                termination,
            });
        }

        let direction = match jac.as_slice() {
            [row] if value.len() == 1 => row.clone(),
            _ => matvec(&transpose(&jac), &value),
        };
        for (xi, gi) in x.iter_mut().zip(&direction) {
            *xi = *xi - config.learning_rate * *gi;
        }
    }

    unreachable!("the final iteration always returns")
}

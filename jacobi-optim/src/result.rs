use std::fmt;

/// Result of a solver run.
#[derive(Debug, Clone)]
pub struct OptimResult<F> {
    /// Final point.
    pub x: Vec<F>,
    /// Function value(s) at `x`.
    pub value: Vec<F>,
    /// `‖value‖`.
    pub value_norm: F,
    /// Number of update steps taken.
    pub iterations: usize,
    /// Number of value-and-derivative evaluations.
    pub func_evals: usize,
    pub termination: TerminationReason,
}

impl<F> OptimResult<F> {
    pub fn converged(&self) -> bool {
        self.termination == TerminationReason::Converged
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// `‖f(x)‖` fell below tolerance.
    Converged,
    /// Reached the maximum number of iterations.
    MaxIterations,
    /// The Newton system could not be solved.
    SingularJacobian,
    /// `‖f(x)‖` stopped being finite.
    Diverged,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "function norm below tolerance"),
            TerminationReason::MaxIterations => write!(f, "maximum iterations reached"),
            TerminationReason::SingularJacobian => write!(f, "singular Jacobian"),
            TerminationReason::Diverged => write!(f, "function norm is not finite"),
        }
    }
}

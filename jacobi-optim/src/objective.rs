use std::marker::PhantomData;

use jacobi::graph::GraphThreadLocal;
use jacobi::tape::TapeThreadLocal;
use jacobi::{Float, Forward, Result, Reverse};

/// A function `R^n -> R^k` the solvers can query for values and Jacobians.
///
/// Methods take `&mut self` to allow eval counting and internal state.
pub trait Objective<F: Float> {
    /// Number of input variables.
    fn dim(&self) -> usize;

    /// Evaluate `f(x)` and its `k × n` Jacobian (rows are outputs).
    fn eval_jacobian(&mut self, x: &[F]) -> Result<(Vec<F>, Vec<Vec<F>>)>;
}

/// Adapter differentiating a closure over [`Forward`] values.
pub struct ForwardObjective<F, G> {
    f: G,
    dim: usize,
    func_evals: usize,
    _float: PhantomData<F>,
}

impl<F, G> ForwardObjective<F, G>
where
    F: Float + GraphThreadLocal,
    G: FnMut(&[Forward<F>]) -> Result<Vec<Forward<F>>>,
{
    pub fn new(dim: usize, f: G) -> Self {
        ForwardObjective {
            f,
            dim,
            func_evals: 0,
            _float: PhantomData,
        }
    }

    /// Number of evaluations performed so far.
    pub fn func_evals(&self) -> usize {
        self.func_evals
    }
}

impl<F, G> Objective<F> for ForwardObjective<F, G>
where
    F: Float + GraphThreadLocal,
    G: FnMut(&[Forward<F>]) -> Result<Vec<Forward<F>>>,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn eval_jacobian(&mut self, x: &[F]) -> Result<(Vec<F>, Vec<Vec<F>>)> {
        self.func_evals += 1;
        let f = &mut self.f;
        jacobi::jacobian(|v| f(v), x)
    }
}

/// Adapter differentiating a scalar closure over [`Reverse`] values.
/// The Jacobian is the gradient as a single row.
pub struct ReverseObjective<F, G> {
    f: G,
    dim: usize,
    func_evals: usize,
    _float: PhantomData<F>,
}

impl<F, G> ReverseObjective<F, G>
where
    F: Float + TapeThreadLocal,
    G: FnMut(&[Reverse<F>]) -> Result<Reverse<F>>,
{
    pub fn new(dim: usize, f: G) -> Self {
        ReverseObjective {
            f,
            dim,
            func_evals: 0,
            _float: PhantomData,
        }
    }

    pub fn func_evals(&self) -> usize {
        self.func_evals
    }
}

impl<F, G> Objective<F> for ReverseObjective<F, G>
where
    F: Float + TapeThreadLocal,
    G: FnMut(&[Reverse<F>]) -> Result<Reverse<F>>,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn eval_jacobian(&mut self, x: &[F]) -> Result<(Vec<F>, Vec<Vec<F>>)> {
        self.func_evals += 1;
        let f = &mut self.f;
        let (value, grad) = jacobi::gradient(|v| f(v), x)?;
        Ok((vec![value], vec![grad]))
    }
}

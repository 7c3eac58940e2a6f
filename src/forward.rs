use std::fmt::{self, Display};

use crate::elemental::{self, Binary, Unary};
use crate::error::Result;
use crate::graph::{self, ForwardGraph, GraphThreadLocal};
use crate::node::NodeId;
use crate::op::{BinaryOp, Operation, UnaryOp};
use crate::Float;

/// Forward-mode differentiable value.
///
/// A primal value plus a handle to its node in the active
/// [`ForwardGraph`](crate::graph::ForwardGraph), where the derivative vector
/// (one component per seeded input) is stored. Every operation computes the
/// new value and the new derivative vector immediately, by the chain rule on
/// the operands' current derivatives. `Copy` because the graph lives in a
/// thread-local, not inside this struct.
#[derive(Clone, Copy, Debug)]
pub struct Forward<F: Float> {
    pub(crate) value: F,
    pub(crate) id: NodeId,
}

impl<F: Float> Forward<F> {
    /// Handle to an already recorded node.
    /// Typically only used internally by the drivers and tests.
    #[inline]
    pub fn from_graph(value: F, id: NodeId) -> Self {
        Forward { value, id }
    }

    /// Primal value.
    #[inline]
    pub fn value(&self) -> F {
        self.value
    }

    /// Node identity in the graph.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<F: Float + GraphThreadLocal> Forward<F> {
    /// Wrap `value` with an explicit derivative vector.
    pub fn new(value: F, derivative: Vec<F>) -> Self {
        let id = graph::with_active_graph(|g| g.push(value, derivative, Vec::new(), Operation::Leaf));
        Forward { value, id }
    }

    /// Wrap `value` with a derivative of one in every component.
    pub fn variable(value: F) -> Self {
        let id = graph::with_active_graph(|g| {
            let derivative = vec![F::one(); g.dim()];
            g.push(value, derivative, Vec::new(), Operation::Leaf)
        });
        Forward { value, id }
    }

    /// Wrap `value` with a zero derivative.
    pub fn constant(value: F) -> Self {
        let id = graph::with_active_graph(|g| {
            let derivative = vec![F::zero(); g.dim()];
            g.push(value, derivative, Vec::new(), Operation::Leaf)
        });
        Forward { value, id }
    }

    /// Copy of the derivative vector.
    pub fn derivative(&self) -> Vec<F> {
        graph::with_active_graph(|g| g.derivative(self.id).to_vec())
    }

    /// Visualization label (`v{n}`).
    pub fn label(&self) -> String {
        graph::with_active_graph(|g: &mut ForwardGraph<F>| g.label(self.id))
    }

    /// Label, value, derivative, parents and operation on one line.
    pub fn describe(&self) -> String {
        graph::with_active_graph(|g: &mut ForwardGraph<F>| g.describe(self.id))
    }

    /// `(g(v), g'(v)·d)`.
    pub(crate) fn chain(self, u: Unary<F>, operation: Operation<F>) -> Self {
        let id = graph::with_active_graph(|g| {
            let derivative = g
                .derivative(self.id)
                .iter()
                .map(|&d| u.partial * d)
                .collect();
            g.push(u.value, derivative, vec![self.id], operation)
        });
        Forward { value: u.value, id }
    }

    /// `(h(v1, v2), ∂h/∂x·d1 + ∂h/∂y·d2)`.
    pub(crate) fn record_binary(self, op: BinaryOp, rhs: Self, b: Binary<F>) -> Self {
        let id = graph::with_active_graph(|g| {
            let derivative = g
                .derivative(self.id)
                .iter()
                .zip(g.derivative(rhs.id))
                .map(|(&d1, &d2)| b.lhs * d1 + b.rhs * d2)
                .collect();
            g.push(b.value, derivative, vec![self.id, rhs.id], Operation::Binary(op))
        });
        Forward { value: b.value, id }
    }

    #[inline]
    pub(crate) fn record_scalar(self, op: BinaryOp, c: F, u: Unary<F>) -> Self {
        self.chain(u, Operation::WithScalar(op, c))
    }

    #[inline]
    pub(crate) fn record_reflected(self, op: BinaryOp, c: F, u: Unary<F>) -> Self {
        self.chain(u, Operation::Reflected(op, c))
    }

    #[inline]
    pub(crate) fn unary(self, op: UnaryOp) -> Self {
        self.chain(op.eval(self.value), Operation::Unary(op))
    }

    #[inline]
    pub(crate) fn try_unary(self, op: UnaryOp) -> Result<Self> {
        Ok(self.chain(op.apply(self.value)?, Operation::Unary(op)))
    }

    /// `self op rhs` for a plain scalar `rhs`.
    pub fn with_scalar(self, op: BinaryOp, rhs: F) -> Result<Self> {
        let u = op.apply_scalar_rhs(self.value, rhs)?;
        Ok(self.record_scalar(op, rhs, u))
    }

    /// `lhs op self` for a plain scalar `lhs`.
    pub fn reflected(self, op: BinaryOp, lhs: F) -> Result<Self> {
        let u = op.apply_scalar_lhs(lhs, self.value)?;
        Ok(self.record_reflected(op, lhs, u))
    }

    /// `self op rhs` for two differentiable values.
    pub fn with_value(self, op: BinaryOp, rhs: Self) -> Result<Self> {
        let b = op.apply(self.value, rhs.value)?;
        Ok(self.record_binary(op, rhs, b))
    }

    // ── Powers ──

    pub fn sqrt(self) -> Result<Self> {
        self.try_unary(UnaryOp::Sqrt)
    }

    /// `self ^ exponent`, differentiating both.
    pub fn pow(self, exponent: Self) -> Result<Self> {
        self.with_value(BinaryOp::Pow, exponent)
    }

    /// `self ^ c` for a constant exponent.
    pub fn powf(self, c: F) -> Result<Self> {
        self.with_scalar(BinaryOp::Pow, c)
    }

    /// `base ^ self` for a constant base.
    pub fn rpow(self, base: F) -> Result<Self> {
        self.reflected(BinaryOp::Pow, base)
    }

    /// `1 / self`.
    pub fn recip(self) -> Result<Self> {
        self.reflected(BinaryOp::Div, F::one())
    }

    // ── Exp/Log ──

    pub fn exp(self) -> Self {
        self.unary(UnaryOp::Exp)
    }

    /// Natural logarithm.
    pub fn ln(self) -> Result<Self> {
        self.log(F::E())
    }

    /// Logarithm in `base`.
    pub fn log(self, base: F) -> Result<Self> {
        let u = elemental::log(self.value, base)?;
        Ok(self.chain(u, Operation::Log { base }))
    }

    /// `1 / (1 + e^-self)`.
    pub fn logistic(self) -> Self {
        self.unary(UnaryOp::Logistic)
    }

    // ── Trig ──

    pub fn sin(self) -> Self {
        self.unary(UnaryOp::Sin)
    }

    pub fn cos(self) -> Self {
        self.unary(UnaryOp::Cos)
    }

    pub fn tan(self) -> Result<Self> {
        self.try_unary(UnaryOp::Tan)
    }

    pub fn asin(self) -> Result<Self> {
        self.try_unary(UnaryOp::Asin)
    }

    pub fn acos(self) -> Result<Self> {
        self.try_unary(UnaryOp::Acos)
    }

    pub fn atan(self) -> Self {
        self.unary(UnaryOp::Atan)
    }

    // ── Hyperbolic ──

    pub fn sinh(self) -> Self {
        self.unary(UnaryOp::Sinh)
    }

    pub fn cosh(self) -> Self {
        self.unary(UnaryOp::Cosh)
    }

    pub fn tanh(self) -> Self {
        self.unary(UnaryOp::Tanh)
    }
}

impl<F: Float> Display for Forward<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

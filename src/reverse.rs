use std::fmt::{self, Display};

use crate::elemental::{self, Binary, Unary};
use crate::error::Result;
use crate::node::NodeId;
use crate::op::{BinaryOp, UnaryOp};
use crate::tape::{self, TapeThreadLocal};
use crate::Float;

/// Reverse-mode differentiable value.
///
/// Just a value and a tape node id. `Copy` because the tape lives in a
/// thread-local, not inside this struct. Operations only compute values and
/// record the local partials on the operands' outgoing edges; derivatives
/// come later from a [`BackwardPass`](crate::BackwardPass).
#[derive(Clone, Copy, Debug)]
pub struct Reverse<F: Float> {
    pub(crate) value: F,
    pub(crate) id: NodeId,
}

impl<F: Float> Reverse<F> {
    /// Handle to an already recorded tape node.
    /// Typically only used internally by the drivers and tests.
    #[inline]
    pub fn from_tape(value: F, id: NodeId) -> Self {
        Reverse { value, id }
    }

    #[inline]
    pub fn value(&self) -> F {
        self.value
    }

    /// Node identity on the tape.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<F: Float + TapeThreadLocal> Reverse<F> {
    /// Record a fresh leaf on the active tape.
    #[inline]
    pub fn variable(value: F) -> Self {
        let id = tape::with_active_tape(|t| t.new_variable(value));
        Reverse { value, id }
    }

    /// Wrap a constant. On the tape a constant is a leaf no seed reaches,
    /// so its derivative with respect to every input is zero.
    #[inline]
    pub fn constant(value: F) -> Self {
        Self::variable(value)
    }

    /// Value and the number of operations that consumed this node so far.
    pub fn describe(&self) -> String {
        let edges = tape::with_active_tape(|t: &mut tape::Tape<F>| t.edges(self.id).len());
        format!("Node: val={}, edges={}", self.value, edges)
    }

    #[inline]
    pub(crate) fn chain(self, u: Unary<F>) -> Self {
        let id = tape::with_active_tape(|t| t.push_unary(self.id, u.partial, u.value));
        Reverse { value: u.value, id }
    }

    #[inline]
    pub(crate) fn record_binary(self, _op: BinaryOp, rhs: Self, b: Binary<F>) -> Self {
        let id = tape::with_active_tape(|t| t.push_binary(self.id, b.lhs, rhs.id, b.rhs, b.value));
        Reverse { value: b.value, id }
    }

    #[inline]
    pub(crate) fn record_scalar(self, _op: BinaryOp, _c: F, u: Unary<F>) -> Self {
        self.chain(u)
    }

    #[inline]
    pub(crate) fn record_reflected(self, _op: BinaryOp, _c: F, u: Unary<F>) -> Self {
        self.chain(u)
    }

    #[inline]
    pub(crate) fn unary(self, op: UnaryOp) -> Self {
        self.chain(op.eval(self.value))
    }

    #[inline]
    pub(crate) fn try_unary(self, op: UnaryOp) -> Result<Self> {
        Ok(self.chain(op.apply(self.value)?))
    }

    /// `self op rhs` for a plain scalar `rhs`.
    pub fn with_scalar(self, op: BinaryOp, rhs: F) -> Result<Self> {
        Ok(self.chain(op.apply_scalar_rhs(self.value, rhs)?))
    }

    /// `lhs op self` for a plain scalar `lhs`.
    pub fn reflected(self, op: BinaryOp, lhs: F) -> Result<Self> {
        Ok(self.chain(op.apply_scalar_lhs(lhs, self.value)?))
    }

    /// `self op rhs` for two differentiable values.
    pub fn with_value(self, op: BinaryOp, rhs: Self) -> Result<Self> {
        let b = op.apply(self.value, rhs.value)?;
        Ok(self.record_binary(op, rhs, b))
    }

    pub fn sqrt(self) -> Result<Self> {
        self.try_unary(UnaryOp::Sqrt)
    }

    pub fn pow(self, exponent: Self) -> Result<Self> {
        self.with_value(BinaryOp::Pow, exponent)
    }

    pub fn powf(self, c: F) -> Result<Self> {
        self.with_scalar(BinaryOp::Pow, c)
    }

    pub fn rpow(self, base: F) -> Result<Self> {
        self.reflected(BinaryOp::Pow, base)
    }

    pub fn recip(self) -> Result<Self> {
        self.reflected(BinaryOp::Div, F::one())
    }

    pub fn exp(self) -> Self {
        self.unary(UnaryOp::Exp)
    }

    pub fn ln(self) -> Result<Self> {
        self.log(F::E())
    }

    pub fn log(self, base: F) -> Result<Self> {
        Ok(self.chain(elemental::log(self.value, base)?))
    }

    pub fn logistic(self) -> Self {
        self.unary(UnaryOp::Logistic)
    }

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

impl<F: Float> Display for Reverse<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

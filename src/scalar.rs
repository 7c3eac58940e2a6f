//! The [`Scalar`] trait for writing mode-generic differentiable code.
//!
//! Functions written as `fn f<V: Scalar>(x: &[V]) -> Result<V>` evaluate
//! under both [`Forward`] and [`Reverse`] without change.

use std::any::Any;
use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::Result;
use crate::float::Float;
use crate::forward::Forward;
use crate::graph::GraphThreadLocal;
use crate::node::NodeId;
use crate::op::{BinaryOp, CompareOp};
use crate::operand::Operand;
use crate::reverse::Reverse;
use crate::tape::TapeThreadLocal;

/// The central trait for mode-generic differentiable code.
///
/// Arithmetic between two values goes through the `std::ops` operators;
/// division is fallible, so `a / b` yields a [`Result`]. Operations whose
/// right-hand side is only known at runtime go through [`apply`](Self::apply)
/// and [`compare`](Self::compare), which classify the operand and reject
/// unsupported types.
pub trait Scalar:
    Copy
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Div<Output = Result<Self>>
    + 'static
{
    /// The underlying primitive float type.
    type Float: Float;

    /// Lift a plain float to this scalar (constant, zero derivative).
    fn from_f(val: Self::Float) -> Self;

    /// Extract the primal value.
    fn value(&self) -> Self::Float;

    /// Node identity in the active graph or tape.
    fn id(&self) -> NodeId;

    /// `self op rhs` for two differentiable values.
    fn with_value(self, op: BinaryOp, rhs: Self) -> Result<Self>;

    /// `self op c`.
    fn with_scalar(self, op: BinaryOp, c: Self::Float) -> Result<Self>;

    /// `c op self`.
    fn reflected(self, op: BinaryOp, c: Self::Float) -> Result<Self>;

    fn sqrt(self) -> Result<Self>;
    fn exp(self) -> Self;
    fn ln(self) -> Result<Self>;
    fn log(self, base: Self::Float) -> Result<Self>;
    fn logistic(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Result<Self>;
    fn asin(self) -> Result<Self>;
    fn acos(self) -> Result<Self>;
    fn atan(self) -> Self;
    fn sinh(self) -> Self;
    fn cosh(self) -> Self;
    fn tanh(self) -> Self;
    fn pow(self, exponent: Self) -> Result<Self>;
    fn powf(self, c: Self::Float) -> Result<Self>;
    fn rpow(self, base: Self::Float) -> Result<Self>;
    fn recip(self) -> Result<Self>;

    /// Lift an `f64` literal.
    #[inline]
    fn lit(c: f64) -> Self {
        let c = num_traits::cast(c).unwrap_or_else(<Self::Float as num_traits::Float>::nan);
        Self::from_f(c)
    }

    /// `self op rhs` for an already classified operand.
    #[inline]
    fn binary(self, op: BinaryOp, rhs: Operand<Self>) -> Result<Self> {
        match rhs {
            Operand::Value(v) => self.with_value(op, v),
            Operand::Scalar(c) => self.with_scalar(op, c),
        }
    }

    /// `self op rhs` where `rhs` may be any type.
    fn apply<T: Any>(self, op: BinaryOp, rhs: &T) -> Result<Self> {
        let rhs = Operand::classify(op.symbol(), rhs)?;
        self.binary(op, rhs)
    }

    /// `lhs op self` where `lhs` may be any type.
    fn apply_reflected<T: Any>(self, op: BinaryOp, lhs: &T) -> Result<Self> {
        match Operand::<Self>::classify(op.symbol(), lhs)? {
            Operand::Value(v) => v.with_value(op, self),
            Operand::Scalar(c) => self.reflected(op, c),
        }
    }

    /// `self op rhs` on primal values, where `rhs` may be any type.
    fn compare<T: Any>(&self, op: CompareOp, rhs: &T) -> Result<bool> {
        let rhs = Operand::<Self>::classify(op.symbol(), rhs)?;
        Ok(op.holds(self.value(), rhs.value()))
    }

    /// `lhs op self` on primal values, where `lhs` may be any type.
    fn compare_reflected<T: Any>(&self, op: CompareOp, lhs: &T) -> Result<bool> {
        let lhs = Operand::<Self>::classify(op.symbol(), lhs)?;
        Ok(op.holds(lhs.value(), self.value()))
    }
}

macro_rules! impl_scalar {
    ($ty:ident, $local:ident) => {
        impl<F: Float + $local> Scalar for $ty<F> {
            type Float = F;

            #[inline]
            fn from_f(val: F) -> Self {
                $ty::constant(val)
            }

            #[inline]
            fn value(&self) -> F {
                self.value
            }

            #[inline]
            fn id(&self) -> NodeId {
                self.id
            }

            #[inline]
            fn with_value(self, op: BinaryOp, rhs: Self) -> Result<Self> {
                $ty::with_value(self, op, rhs)
            }

            #[inline]
            fn with_scalar(self, op: BinaryOp, c: F) -> Result<Self> {
                $ty::with_scalar(self, op, c)
            }

            #[inline]
            fn reflected(self, op: BinaryOp, c: F) -> Result<Self> {
                $ty::reflected(self, op, c)
            }

            fn sqrt(self) -> Result<Self> {
                $ty::sqrt(self)
            }
            fn exp(self) -> Self {
                $ty::exp(self)
            }
            fn ln(self) -> Result<Self> {
                $ty::ln(self)
            }
            fn log(self, base: F) -> Result<Self> {
                $ty::log(self, base)
            }
            fn logistic(self) -> Self {
                $ty::logistic(self)
            }
            fn sin(self) -> Self {
                $ty::sin(self)
            }
            fn cos(self) -> Self {
                $ty::cos(self)
            }
            fn tan(self) -> Result<Self> {
                $ty::tan(self)
            }
            fn asin(self) -> Result<Self> {
                $ty::asin(self)
            }
            fn acos(self) -> Result<Self> {
                $ty::acos(self)
            }
            fn atan(self) -> Self {
                $ty::atan(self)
            }
            fn sinh(self) -> Self {
                $ty::sinh(self)
            }
            fn cosh(self) -> Self {
                $ty::cosh(self)
            }
            fn tanh(self) -> Self {
                $ty::tanh(self)
            }
            fn pow(self, exponent: Self) -> Result<Self> {
                $ty::pow(self, exponent)
            }
            fn powf(self, c: F) -> Result<Self> {
                $ty::powf(self, c)
            }
            fn rpow(self, base: F) -> Result<Self> {
                $ty::rpow(self, base)
            }
            fn recip(self) -> Result<Self> {
                $ty::recip(self)
            }
        }
    };
}

impl_scalar!(Forward, GraphThreadLocal);
impl_scalar!(Reverse, TapeThreadLocal);

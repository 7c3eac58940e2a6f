//! Operand classification at an operation boundary.
//!
//! An operation accepts exactly two kinds of operand: another differentiable
//! value of the same mode and float type, or a plain number. Anything else is
//! rejected with [`AdError::UnsupportedOperand`].

use std::any::{self, Any};

use crate::error::{AdError, Result};
use crate::scalar::Scalar;
use crate::Float;

/// The two operand kinds an operation can consume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand<V: Scalar> {
    /// A differentiable value recorded in the active graph or tape.
    Value(V),
    /// A plain number; contributes no derivative.
    Scalar(V::Float),
}

impl<V: Scalar> Operand<V> {
    /// Classify `value` for the operation named `op`.
    ///
    /// Accepts `V` itself, `V::Float`, and the primitive integer and float
    /// types (converted to `V::Float`).
    pub fn classify<T: Any>(op: &'static str, value: &T) -> Result<Self> {
        let any = value as &dyn Any;
        if let Some(&v) = any.downcast_ref::<V>() {
            return Ok(Operand::Value(v));
        }
        if let Some(&c) = any.downcast_ref::<V::Float>() {
            return Ok(Operand::Scalar(c));
        }
        numeric::<V::Float>(any)
            .map(Operand::Scalar)
            .ok_or(AdError::UnsupportedOperand {
                op,
                type_name: any::type_name::<T>(),
            })
    }

    /// Primal value of the operand.
    pub fn value(&self) -> V::Float {
        match self {
            Operand::Value(v) => v.value(),
            Operand::Scalar(c) => *c,
        }
    }
}

impl<V: Scalar> From<V> for Operand<V> {
    fn from(v: V) -> Self {
        Operand::Value(v)
    }
}

fn numeric<F: Float>(any: &dyn Any) -> Option<F> {
    macro_rules! cast_from {
        ($($t:ty),*) => {
            $(
                if let Some(&x) = any.downcast_ref::<$t>() {
                    return num_traits::cast::<$t, F>(x);
                }
            )*
        };
    }
    cast_from!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
    None
}

//! What a user function may return to a driver.
//!
//! A single value (or plain number) makes the problem scalar-output; a
//! `Vec` or array makes it vector-output, even when it has one element.
//! Plain numbers are wrapped into zero-derivative constants by the driver.

use crate::error::Result;
use crate::scalar::Scalar;

/// One function output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Output<V: Scalar> {
    Value(V),
    /// A number returned unchanged; its derivative is zero.
    Constant(V::Float),
}

impl<V: Scalar> Output<V> {
    pub fn value(&self) -> V::Float {
        match self {
            Output::Value(v) => v.value(),
            Output::Constant(c) => *c,
        }
    }
}

impl<V: Scalar> From<V> for Output<V> {
    fn from(v: V) -> Self {
        Output::Value(v)
    }
}

/// Normalized function result.
#[derive(Clone, Debug, PartialEq)]
pub enum Outputs<V: Scalar> {
    Single(Output<V>),
    Multiple(Vec<Output<V>>),
}

impl<V: Scalar> Outputs<V> {
    pub fn len(&self) -> usize {
        match self {
            Outputs::Single(_) => 1,
            Outputs::Multiple(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Outputs::Single(_))
    }

    /// Flatten to a list of outputs in order.
    pub fn into_vec(self) -> Vec<Output<V>> {
        match self {
            Outputs::Single(o) => vec![o],
            Outputs::Multiple(v) => v,
        }
    }
}

/// Conversion of a user function's return value into [`Outputs`].
pub trait IntoOutputs<V: Scalar> {
    fn into_outputs(self) -> Result<Outputs<V>>;
}

impl<V: Scalar> IntoOutputs<V> for V {
    fn into_outputs(self) -> Result<Outputs<V>> {
        Ok(Outputs::Single(Output::Value(self)))
    }
}

impl<V: Scalar> IntoOutputs<V> for Output<V> {
    fn into_outputs(self) -> Result<Outputs<V>> {
        Ok(Outputs::Single(self))
    }
}

impl<V: Scalar> IntoOutputs<V> for Vec<V> {
    fn into_outputs(self) -> Result<Outputs<V>> {
        Ok(Outputs::Multiple(self.into_iter().map(Output::Value).collect()))
    }
}

impl<V: Scalar, const N: usize> IntoOutputs<V> for [V; N] {
    fn into_outputs(self) -> Result<Outputs<V>> {
        Ok(Outputs::Multiple(self.into_iter().map(Output::Value).collect()))
    }
}

impl<V: Scalar> IntoOutputs<V> for Vec<Output<V>> {
    fn into_outputs(self) -> Result<Outputs<V>> {
        Ok(Outputs::Multiple(self))
    }
}

impl<V: Scalar, const N: usize> IntoOutputs<V> for [Output<V>; N] {
    fn into_outputs(self) -> Result<Outputs<V>> {
        Ok(Outputs::Multiple(self.into()))
    }
}

// Errors raised inside the user function surface unchanged.
impl<V: Scalar, R: IntoOutputs<V>> IntoOutputs<V> for Result<R> {
    fn into_outputs(self) -> Result<Outputs<V>> {
        self?.into_outputs()
    }
}

macro_rules! impl_constant_outputs {
    ($f:ty) => {
        impl<V: Scalar<Float = $f>> From<$f> for Output<V> {
            fn from(c: $f) -> Self {
                Output::Constant(c)
            }
        }

        impl<V: Scalar<Float = $f>> IntoOutputs<V> for $f {
            fn into_outputs(self) -> Result<Outputs<V>> {
                Ok(Outputs::Single(Output::Constant(self)))
            }
        }

        impl<V: Scalar<Float = $f>> IntoOutputs<V> for Vec<$f> {
            fn into_outputs(self) -> Result<Outputs<V>> {
                Ok(Outputs::Multiple(self.into_iter().map(Output::Constant).collect()))
            }
        }

        impl<V: Scalar<Float = $f>, const N: usize> IntoOutputs<V> for [$f; N] {
            fn into_outputs(self) -> Result<Outputs<V>> {
                Ok(Outputs::Multiple(self.into_iter().map(Output::Constant).collect()))
            }
        }
    };
}

impl_constant_outputs!(f32);
impl_constant_outputs!(f64);

use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for base floating-point types (`f32`, `f64`).
///
/// Bundles the numeric and utility traits needed throughout jacobi.
/// Only primitive float types implement this; the differentiable handles
/// [`Forward`](crate::Forward) and [`Reverse`](crate::Reverse) do not.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
    /// Widen to `f64` for error reporting.
    #[inline]
    fn to_report(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl Float for f32 {}
impl Float for f64 {}

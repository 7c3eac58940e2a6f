use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::elemental;
use crate::error::Result;
use crate::float::Float;
use crate::forward::Forward;
use crate::graph::GraphThreadLocal;
use crate::op::{BinaryOp, UnaryOp};
use crate::reverse::Reverse;
use crate::tape::TapeThreadLocal;

// ──────────────────────────────────────────────
//  Value ⊕ value
// ──────────────────────────────────────────────

// Division can hit a zero divisor, so `Div` yields `Result<Self>`.
macro_rules! impl_value_ops {
    ($ty:ident, $local:ident) => {
        impl<F: Float + $local> Add for $ty<F> {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                let b = elemental::sum(self.value, rhs.value);
                self.record_binary(BinaryOp::Add, rhs, b)
            }
        }

        impl<F: Float + $local> Sub for $ty<F> {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                let b = elemental::difference(self.value, rhs.value);
                self.record_binary(BinaryOp::Sub, rhs, b)
            }
        }

        impl<F: Float + $local> Mul for $ty<F> {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                let b = elemental::product(self.value, rhs.value);
                self.record_binary(BinaryOp::Mul, rhs, b)
            }
        }

        impl<F: Float + $local> Div for $ty<F> {
            type Output = Result<Self>;
            #[inline]
            fn div(self, rhs: Self) -> Result<Self> {
                self.with_value(BinaryOp::Div, rhs)
            }
        }

        impl<F: Float + $local> Neg for $ty<F> {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                self.unary(UnaryOp::Neg)
            }
        }

        impl<F: Float + $local> AddAssign for $ty<F> {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl<F: Float + $local> SubAssign for $ty<F> {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl<F: Float + $local> MulAssign for $ty<F> {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        // Comparisons look at primal values only.
        impl<F: Float> PartialEq for $ty<F> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.value == other.value
            }
        }

        impl<F: Float> PartialOrd for $ty<F> {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                self.value.partial_cmp(&other.value)
            }
        }
    };
}

impl_value_ops!(Forward, GraphThreadLocal);
impl_value_ops!(Reverse, TapeThreadLocal);

// ──────────────────────────────────────────────
//  Value ⊕ primitive, both directions
// ──────────────────────────────────────────────

macro_rules! impl_primitive_ops {
    ($ty:ident, $f:ty) => {
        impl Add<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn add(self, rhs: $f) -> $ty<$f> {
                let u = elemental::sum(self.value, rhs).wrt_lhs();
                self.record_scalar(BinaryOp::Add, rhs, u)
            }
        }

        impl Add<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn add(self, rhs: $ty<$f>) -> $ty<$f> {
                let u = elemental::sum(self, rhs.value).wrt_rhs();
                rhs.record_reflected(BinaryOp::Add, self, u)
            }
        }

        impl Sub<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn sub(self, rhs: $f) -> $ty<$f> {
                let u = elemental::difference(self.value, rhs).wrt_lhs();
                self.record_scalar(BinaryOp::Sub, rhs, u)
            }
        }

        impl Sub<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn sub(self, rhs: $ty<$f>) -> $ty<$f> {
                let u = elemental::difference(self, rhs.value).wrt_rhs();
                rhs.record_reflected(BinaryOp::Sub, self, u)
            }
        }

        impl Mul<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn mul(self, rhs: $f) -> $ty<$f> {
                let u = elemental::product(self.value, rhs).wrt_lhs();
                self.record_scalar(BinaryOp::Mul, rhs, u)
            }
        }

        impl Mul<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn mul(self, rhs: $ty<$f>) -> $ty<$f> {
                let u = elemental::product(self, rhs.value).wrt_rhs();
                rhs.record_reflected(BinaryOp::Mul, self, u)
            }
        }

        impl Div<$f> for $ty<$f> {
            type Output = Result<$ty<$f>>;
            #[inline]
            fn div(self, rhs: $f) -> Result<$ty<$f>> {
                self.with_scalar(BinaryOp::Div, rhs)
            }
        }

        impl Div<$ty<$f>> for $f {
            type Output = Result<$ty<$f>>;
            #[inline]
            fn div(self, rhs: $ty<$f>) -> Result<$ty<$f>> {
                rhs.reflected(BinaryOp::Div, self)
            }
        }

        impl AddAssign<$f> for $ty<$f> {
            #[inline]
            fn add_assign(&mut self, rhs: $f) {
                *self = *self + rhs;
            }
        }

        impl SubAssign<$f> for $ty<$f> {
            #[inline]
            fn sub_assign(&mut self, rhs: $f) {
                *self = *self - rhs;
            }
        }

        impl MulAssign<$f> for $ty<$f> {
            #[inline]
            fn mul_assign(&mut self, rhs: $f) {
                *self = *self * rhs;
            }
        }

        impl PartialEq<$f> for $ty<$f> {
            #[inline]
            fn eq(&self, other: &$f) -> bool {
                self.value == *other
            }
        }

        impl PartialEq<$ty<$f>> for $f {
            #[inline]
            fn eq(&self, other: &$ty<$f>) -> bool {
                *self == other.value
            }
        }

        impl PartialOrd<$f> for $ty<$f> {
            #[inline]
            fn partial_cmp(&self, other: &$f) -> Option<Ordering> {
                self.value.partial_cmp(other)
            }
        }

        impl PartialOrd<$ty<$f>> for $f {
            #[inline]
            fn partial_cmp(&self, other: &$ty<$f>) -> Option<Ordering> {
                self.partial_cmp(&other.value)
            }
        }
    };
}

impl_primitive_ops!(Forward, f32);
impl_primitive_ops!(Forward, f64);
impl_primitive_ops!(Reverse, f32);
impl_primitive_ops!(Reverse, f64);

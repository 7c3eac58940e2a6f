//! Numeric-domain validation shared by forward and reverse mode.
//!
//! Every check runs before a node is created, so an out-of-domain operation
//! never leaves a partially recorded node behind.

use crate::error::{AdError, Result};
use crate::Float;

/// Absolute tolerance used to decide that `tan` sits on a pole.
pub const TAN_POLE_TOLERANCE: f64 = 1e-8;

/// `sqrt` needs a strictly positive operand: the derivative is unbounded at zero.
#[inline]
pub fn sqrt<F: Float>(v: F) -> Result<()> {
    if v > F::zero() {
        Ok(())
    } else {
        Err(AdError::domain("sqrt", v))
    }
}

/// `log(v, base)` needs `v > 0`, `base > 0` and `base != 1`.
#[inline]
pub fn log<F: Float>(v: F, base: F) -> Result<()> {
    if !(v > F::zero()) {
        return Err(AdError::domain("log", v));
    }
    if !(base > F::zero()) || base == F::one() {
        return Err(AdError::domain("log base", base));
    }
    Ok(())
}

/// `arcsin`/`arccos` are defined on `[-1, 1]`.
#[inline]
pub fn unit_interval<F: Float>(op: &'static str, v: F) -> Result<()> {
    if v >= -F::one() && v <= F::one() {
        Ok(())
    } else {
        Err(AdError::domain(op, v))
    }
}

/// `tan` is undefined at odd multiples of π/2.
#[inline]
pub fn tan<F: Float>(v: F) -> Result<()> {
    let k = (v - F::FRAC_PI_2()) / F::PI();
    let tol = F::from_f64(TAN_POLE_TOLERANCE).unwrap_or_else(F::epsilon);
    if (k - k.round()).abs() <= tol {
        Err(AdError::domain("tan", v))
    } else {
        Ok(())
    }
}

/// A literal zero divisor.
#[inline]
pub fn divisor<F: Float>(op: &'static str, d: F) -> Result<()> {
    if d == F::zero() {
        Err(AdError::DivideByZero { op })
    } else {
        Ok(())
    }
}

/// `base ^ c` for a constant exponent `c`.
///
/// A zero base with a negative exponent is a reciprocal of zero. A negative
/// base only admits integral exponents.
#[inline]
pub fn power_constant_exponent<F: Float>(base: F, c: F) -> Result<()> {
    if base == F::zero() && c < F::zero() {
        return Err(AdError::DivideByZero { op: "**" });
    }
    if base < F::zero() && c.fract() != F::zero() {
        return Err(AdError::domain("**", base));
    }
    Ok(())
}

/// `base ^ exponent` where the exponent is differentiated too.
///
/// The exponent partial is `ln(base)·base^exponent`, so a negative base is
/// out of domain.
#[inline]
pub fn power_variable_exponent<F: Float>(base: F, exponent: F) -> Result<()> {
    if base == F::zero() && exponent < F::zero() {
        return Err(AdError::DivideByZero { op: "**" });
    }
    if base < F::zero() {
        return Err(AdError::domain("**", base));
    }
    Ok(())
}

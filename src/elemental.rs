//! Closed-form values and local partial derivatives.
//!
//! Both modes build from the same table. Forward mode multiplies a local
//! partial into the operand's derivative vector right away; reverse mode
//! stores it on the operand's outgoing tape edge.

use crate::domain;
use crate::error::Result;
use crate::op::{BinaryOp, UnaryOp};
use crate::Float;

/// Result of a single-operand elemental: `g(v)` and `g'(v)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unary<F> {
    pub value: F,
    pub partial: F,
}

/// Result of a two-operand elemental: `h(a, b)`, `∂h/∂a` and `∂h/∂b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binary<F> {
    pub value: F,
    pub lhs: F,
    pub rhs: F,
}

impl<F: Copy> Binary<F> {
    /// Restrict to the left operand, treating the right one as a constant.
    #[inline]
    pub fn wrt_lhs(self) -> Unary<F> {
        Unary {
            value: self.value,
            partial: self.lhs,
        }
    }

    /// Restrict to the right operand, treating the left one as a constant.
    #[inline]
    pub fn wrt_rhs(self) -> Unary<F> {
        Unary {
            value: self.value,
            partial: self.rhs,
        }
    }
}

impl UnaryOp {
    /// Validate `v` against the domain of this operation.
    #[inline]
    pub fn check<F: Float>(self, v: F) -> Result<()> {
        match self {
            UnaryOp::Sqrt => domain::sqrt(v),
            UnaryOp::Tan => domain::tan(v),
            UnaryOp::Asin | UnaryOp::Acos => domain::unit_interval(self.name(), v),
            _ => Ok(()),
        }
    }

    /// Value and local partial, without domain validation.
    #[inline]
    pub fn eval<F: Float>(self, v: F) -> Unary<F> {
        let one = F::one();
        let (value, partial) = match self {
            UnaryOp::Neg => (-v, -one),
            UnaryOp::Sqrt => {
                let s = v.sqrt();
                (s, one / (s + s))
            }
            UnaryOp::Logistic => {
                // e^-v / (1 + e^-v)^2 == s * (1 - s), without overflow for large |v|.
                let s = one / (one + (-v).exp());
                (s, s * (one - s))
            }
            UnaryOp::Exp => {
                let e = v.exp();
                (e, e)
            }
            UnaryOp::Sin => (v.sin(), v.cos()),
            UnaryOp::Cos => (v.cos(), -v.sin()),
            UnaryOp::Tan => {
                let c = v.cos();
                (v.tan(), one / (c * c))
            }
            UnaryOp::Asin => (v.asin(), one / (one - v * v).sqrt()),
            UnaryOp::Acos => (v.acos(), -one / (one - v * v).sqrt()),
            UnaryOp::Atan => (v.atan(), one / (one + v * v)),
            UnaryOp::Sinh => (v.sinh(), v.cosh()),
            UnaryOp::Cosh => (v.cosh(), v.sinh()),
            UnaryOp::Tanh => {
                let c = v.cosh();
                (v.tanh(), one / (c * c))
            }
        };
        Unary { value, partial }
    }

    /// Validate, then evaluate.
    #[inline]
    pub fn apply<F: Float>(self, v: F) -> Result<Unary<F>> {
        self.check(v)?;
        Ok(self.eval(v))
    }
}

/// `log_base(v)`.
#[inline]
pub fn log<F: Float>(v: F, base: F) -> Result<Unary<F>> {
    domain::log(v, base)?;
    let ln_base = base.ln();
    Ok(Unary {
        value: v.ln() / ln_base,
        partial: F::one() / (v * ln_base),
    })
}

#[inline]
pub fn sum<F: Float>(a: F, b: F) -> Binary<F> {
    Binary {
        value: a + b,
        lhs: F::one(),
        rhs: F::one(),
    }
}

#[inline]
pub fn difference<F: Float>(a: F, b: F) -> Binary<F> {
    Binary {
        value: a - b,
        lhs: F::one(),
        rhs: -F::one(),
    }
}

#[inline]
pub fn product<F: Float>(a: F, b: F) -> Binary<F> {
    Binary {
        value: a * b,
        lhs: b,
        rhs: a,
    }
}

#[inline]
pub fn quotient<F: Float>(a: F, b: F) -> Result<Binary<F>> {
    domain::divisor("/", b)?;
    let inv = F::one() / b;
    Ok(Binary {
        value: a * inv,
        lhs: inv,
        rhs: -a * inv * inv,
    })
}

/// `a ^ b` with both operands differentiated.
#[inline]
pub fn power<F: Float>(a: F, b: F) -> Result<Binary<F>> {
    domain::power_variable_exponent(a, b)?;
    let value = a.powf(b);
    Ok(Binary {
        value,
        lhs: power_base_partial(a, b),
        // lim a→0+ of ln(a)·a^b is 0 for b > 0.
        rhs: if a == F::zero() {
            F::zero()
        } else {
            a.ln() * value
        },
    })
}

/// `a ^ c` for a constant exponent: value and `∂/∂a`.
#[inline]
pub fn power_constant_exponent<F: Float>(a: F, c: F) -> Result<Unary<F>> {
    domain::power_constant_exponent(a, c)?;
    Ok(Unary {
        value: a.powf(c),
        partial: power_base_partial(a, c),
    })
}

/// `c ^ b` for a constant base: value and `∂/∂b`.
#[inline]
pub fn power_constant_base<F: Float>(c: F, b: F) -> Result<Unary<F>> {
    domain::power_variable_exponent(c, b)?;
    let value = c.powf(b);
    Ok(Unary {
        value,
        partial: if c == F::zero() {
            F::zero()
        } else {
            c.ln() * value
        },
    })
}

#[inline]
fn power_base_partial<F: Float>(a: F, b: F) -> F {
    if b == F::zero() {
        F::zero()
    } else {
        b * a.powf(b - F::one())
    }
}

impl BinaryOp {
    /// `a op b` with both operands differentiable.
    #[inline]
    pub fn apply<F: Float>(self, a: F, b: F) -> Result<Binary<F>> {
        match self {
            BinaryOp::Add => Ok(sum(a, b)),
            BinaryOp::Sub => Ok(difference(a, b)),
            BinaryOp::Mul => Ok(product(a, b)),
            BinaryOp::Div => quotient(a, b),
            BinaryOp::Pow => power(a, b),
        }
    }

    /// `a op c` where `c` is a plain scalar: value and `∂/∂a`.
    #[inline]
    pub fn apply_scalar_rhs<F: Float>(self, a: F, c: F) -> Result<Unary<F>> {
        match self {
            BinaryOp::Pow => power_constant_exponent(a, c),
            op => op.apply(a, c).map(Binary::wrt_lhs),
        }
    }

    /// `c op b` where `c` is a plain scalar: value and `∂/∂b`.
    #[inline]
    pub fn apply_scalar_lhs<F: Float>(self, c: F, b: F) -> Result<Unary<F>> {
        match self {
            BinaryOp::Pow => power_constant_base(c, b),
            op => op.apply(c, b).map(Binary::wrt_rhs),
        }
    }
}

//! Error types for jacobi.
//!
//! Every failure is raised eagerly, at the operation that produced it, and
//! propagates unchanged through the user function to the driver caller.

use thiserror::Error;

/// Result type alias using jacobi's [`AdError`].
pub type Result<T> = std::result::Result<T, AdError>;

/// Errors that can occur while building a differentiable computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdError {
    /// Operand lies outside the domain of the operation (or of its derivative).
    #[error("`{op}` is not defined at {value}")]
    Domain {
        /// Operation label, e.g. `sqrt`.
        op: &'static str,
        /// Offending operand value.
        value: f64,
    },

    /// Literal zero divisor, including a zero base raised to a negative power.
    #[error("division by zero in `{op}`")]
    DivideByZero {
        /// Operation label.
        op: &'static str,
    },

    /// Operand is neither a differentiable value nor a plain numeric scalar.
    #[error("type `{type_name}` is not supported for `{op}`")]
    UnsupportedOperand {
        /// Operation symbol, e.g. `+` or `<=`.
        op: &'static str,
        /// Rust type name of the rejected operand.
        type_name: &'static str,
    },
}

impl AdError {
    pub(crate) fn domain<F: crate::Float>(op: &'static str, value: F) -> Self {
        AdError::Domain {
            op,
            value: value.to_report(),
        }
    }

    /// `true` for [`AdError::Domain`].
    pub fn is_domain(&self) -> bool {
        matches!(self, AdError::Domain { .. })
    }

    /// `true` for [`AdError::DivideByZero`].
    pub fn is_divide_by_zero(&self) -> bool {
        matches!(self, AdError::DivideByZero { .. })
    }

    /// `true` for [`AdError::UnsupportedOperand`].
    pub fn is_unsupported_operand(&self) -> bool {
        matches!(self, AdError::UnsupportedOperand { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_operation() {
        let e = AdError::domain("sqrt", -1.0_f64);
        assert_eq!(e.to_string(), "`sqrt` is not defined at -1");
        assert!(e.is_domain());

        let e = AdError::DivideByZero { op: "/" };
        assert_eq!(e.to_string(), "division by zero in `/`");
        assert!(e.is_divide_by_zero());

        let e = AdError::UnsupportedOperand {
            op: "+",
            type_name: "&str",
        };
        assert_eq!(e.to_string(), "type `&str` is not supported for `+`");
        assert!(e.is_unsupported_operand());
    }
}

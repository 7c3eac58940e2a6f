//! The operation vocabulary shared by both modes.
//!
//! [`UnaryOp`] and [`BinaryOp`] name the differentiable operations,
//! [`CompareOp`] the value comparisons, and [`Operation`] is the label a
//! forward-mode node carries for visualization.

use std::fmt::{self, Display};

use crate::Float;

/// Single-operand elementals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Sqrt,
    Logistic,
    Exp,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
}

impl UnaryOp {
    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Logistic => "logistic",
            UnaryOp::Exp => "exp",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Asin => "arcsin",
            UnaryOp::Acos => "arccos",
            UnaryOp::Atan => "arctan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tanh => "tanh",
        }
    }

    /// Edge label drawn in the computation graph.
    pub fn label(self) -> String {
        match self {
            UnaryOp::Neg => "-1*".to_string(),
            op => format!("{}()", op.name()),
        }
    }
}

/// Two-operand arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Operator symbol, as reported in errors.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    /// Edge label for `node op node` and `node op scalar`.
    pub fn label(self) -> &'static str {
        match self {
            BinaryOp::Pow => "pow",
            op => op.symbol(),
        }
    }

    /// Edge label for the reflected form `scalar op node`.
    pub fn reflected_label(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "r-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "r/",
            BinaryOp::Pow => "rpow",
        }
    }
}

/// Value comparisons. Only the primal values take part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    /// Evaluate `lhs op rhs`.
    #[inline]
    pub fn holds<F: Float>(self, lhs: F, rhs: F) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
        }
    }
}

/// How a forward-mode node was produced.
///
/// Read only by visualization; derivative propagation never looks at it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operation<F> {
    /// A seeded input variable.
    Input,
    /// A value wrapped without any operand (constants, user-wrapped values).
    Leaf,
    Unary(UnaryOp),
    /// Logarithm in the given base.
    Log { base: F },
    /// `node op node`.
    Binary(BinaryOp),
    /// `node op constant`.
    WithScalar(BinaryOp, F),
    /// `constant op node`.
    Reflected(BinaryOp, F),
}

impl<F: Float> Operation<F> {
    /// Edge label, e.g. `+`, `sqrt()`, `log2()`, `r/`.
    pub fn label(&self) -> String {
        match *self {
            Operation::Input | Operation::Leaf => String::new(),
            Operation::Unary(op) => op.label(),
            Operation::Log { base } => {
                if base == F::E() {
                    "log()".to_string()
                } else {
                    format!("log{base}()")
                }
            }
            Operation::Binary(op) | Operation::WithScalar(op, _) => op.label().to_string(),
            Operation::Reflected(op, _) => op.reflected_label().to_string(),
        }
    }

    /// The constant operand, when there is one.
    pub fn constant(&self) -> Option<F> {
        match *self {
            Operation::WithScalar(_, c) | Operation::Reflected(_, c) => Some(c),
            _ => None,
        }
    }
}

impl<F: Float> Display for Operation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constant() {
            Some(c) => write!(f, "[{}, {}]", self.label(), c),
            None => write!(f, "[{}]", self.label()),
        }
    }
}

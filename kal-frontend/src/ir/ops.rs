//! IR Operations
//!
//! Floating-point arithmetic and comparison predicates available in the IR.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operations in IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrBinaryOp {
    FAdd,
    FSub,
    FMul,
}

impl IrBinaryOp {
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            IrBinaryOp::FAdd => lhs + rhs,
            IrBinaryOp::FSub => lhs - rhs,
            IrBinaryOp::FMul => lhs * rhs,
        }
    }
}

impl fmt::Display for IrBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            IrBinaryOp::FAdd => "fadd",
            IrBinaryOp::FSub => "fsub",
            IrBinaryOp::FMul => "fmul",
        };
        write!(f, "{op_str}")
    }
}

/// `fcmp` predicates. `O*` are false when either operand is NaN, `U*` true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FCmpPredicate {
    Olt,
    Ogt,
    Oeq,
    One,
    Ult,
    Ugt,
    Une,
}

impl FCmpPredicate {
    pub fn evaluate(&self, lhs: f64, rhs: f64) -> bool {
        let unordered = lhs.is_nan() || rhs.is_nan();
        match self {
            FCmpPredicate::Olt => lhs < rhs,
            FCmpPredicate::Ogt => lhs > rhs,
            FCmpPredicate::Oeq => lhs == rhs,
            FCmpPredicate::One => !unordered && lhs != rhs,
            FCmpPredicate::Ult => unordered || lhs < rhs,
            FCmpPredicate::Ugt => unordered || lhs > rhs,
            FCmpPredicate::Une => unordered || lhs != rhs,
        }
    }
}

impl fmt::Display for FCmpPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pred_str = match self {
            FCmpPredicate::Olt => "olt",
            FCmpPredicate::Ogt => "ogt",
            FCmpPredicate::Oeq => "oeq",
            FCmpPredicate::One => "one",
            FCmpPredicate::Ult => "ult",
            FCmpPredicate::Ugt => "ugt",
            FCmpPredicate::Une => "une",
        };
        write!(f, "{pred_str}")
    }
}

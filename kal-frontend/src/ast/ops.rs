//! Binary operators of the expression language

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
///
/// `Other` carries operator characters the parser accepts but the lowering
/// engine has no rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Less,
    Greater,
    /// `a : b` evaluates `a`, discards it, yields `b`
    Sequence,
    Assign,
    Other(char),
}

impl BinaryOp {
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => BinaryOp::Add,
            '-' => BinaryOp::Sub,
            '*' => BinaryOp::Mul,
            '<' => BinaryOp::Less,
            '>' => BinaryOp::Greater,
            ':' => BinaryOp::Sequence,
            '=' => BinaryOp::Assign,
            other => BinaryOp::Other(other),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Less => '<',
            BinaryOp::Greater => '>',
            BinaryOp::Sequence => ':',
            BinaryOp::Assign => '=',
            BinaryOp::Other(c) => *c,
        }
    }

    /// Binding power used by the precedence-climbing parser, `None` for
    /// characters that are not binary operators at all
    pub fn precedence(c: char) -> Option<u8> {
        match c {
            ':' => Some(1),
            '=' => Some(2),
            '<' | '>' => Some(10),
            '+' | '-' => Some(20),
            '*' | '/' => Some(40),
            _ => None,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, BinaryOp::Assign)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

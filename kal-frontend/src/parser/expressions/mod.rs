//! Expression parsing for Kaleido
//!
//! `primary` handles literals, names, calls and parentheses, `control_flow`
//! the keyword-introduced forms, and `binary` the operator chains between
//! them.

mod primary;
mod binary;
mod control_flow;

use crate::ast::*;
use crate::parser::Parser;
use kal_common::CompilerError;

impl Parser {
    /// Parse expression (top level)
    pub fn parse_expression(&mut self) -> Result<Expression, CompilerError> {
        let lhs = self.parse_primary_expression()?;
        self.parse_binary_rhs(0, lhs)
    }
}

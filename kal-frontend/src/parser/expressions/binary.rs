//! Binary expression parsing with operator precedence

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use kal_common::{CompilerError, SourceSpan};

impl Parser {
    /// Operator character and its precedence, if the next token is one
    fn peek_binary_operator(&self) -> Option<(char, u8)> {
        match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Char(c)) => BinaryOp::precedence(*c).map(|prec| (*c, prec)),
            _ => None,
        }
    }

    /// Precedence climbing: fold operators binding at least `min_prec` onto `lhs`
    pub(crate) fn parse_binary_rhs(
        &mut self,
        min_prec: u8,
        mut lhs: Expression,
    ) -> Result<Expression, CompilerError> {
        loop {
            let Some((c, prec)) = self.peek_binary_operator() else {
                return Ok(lhs);
            };
            if prec < min_prec {
                return Ok(lhs);
            }
            self.advance();

            let op = BinaryOp::from_char(c);
            let mut rhs = self.parse_primary_expression()?;

            while let Some((_, next_prec)) = self.peek_binary_operator() {
                if next_prec > prec {
                    rhs = self.parse_binary_rhs(prec + 1, rhs)?;
                } else if next_prec == prec && op.is_right_associative() {
                    rhs = self.parse_binary_rhs(prec, rhs)?;
                } else {
                    break;
                }
            }

            let span = SourceSpan::new(lhs.span.start.clone(), rhs.span.end.clone());
            lhs = Expression::new(
                ExpressionKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            );
        }
    }
}

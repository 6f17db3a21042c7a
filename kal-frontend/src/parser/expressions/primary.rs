//! Primary expression parsing

use crate::ast::*;
use crate::lexer::{Token, TokenType};
use crate::parser::errors::ParseError;
use crate::parser::Parser;
use kal_common::CompilerError;

impl Parser {
    /// Parse primary expression
    pub fn parse_primary_expression(&mut self) -> Result<Expression, CompilerError> {
        let start_location = self.current_location();

        match self.peek().map(|t| &t.token_type) {
            Some(TokenType::If) => return self.parse_if_expression(),
            Some(TokenType::For) => return self.parse_for_expression(),
            Some(TokenType::While) => return self.parse_while_expression(),
            Some(TokenType::Var) => return self.parse_var_expression(),
            _ => {}
        }

        let kind = match self.advance() {
            Some(Token { token_type: TokenType::Number(value), .. }) => ExpressionKind::Number(value),
            Some(Token { token_type: TokenType::Identifier(name), .. }) => {
                if self.match_char('(') {
                    let arguments = self.parse_call_arguments()?;
                    ExpressionKind::Call { callee: name, arguments }
                } else {
                    ExpressionKind::Variable(name)
                }
            }
            Some(Token { token_type: TokenType::Char('('), .. }) => {
                let expr = self.parse_expression()?;
                self.expect_char(')', "parenthesized expression")?;
                return Ok(expr);
            }
            Some(token) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: token,
                }
                .into());
            }
            None => {
                return Err(ParseError::UnexpectedEndOfFile {
                    expected: "expression".to_string(),
                    location: start_location,
                }
                .into());
            }
        };

        Ok(Expression::new(kind, self.span_from(start_location)))
    }

    /// Comma-separated arguments after the opening `(`, through `)`
    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, CompilerError> {
        let mut arguments = Vec::new();
        if self.match_char(')') {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression()?);
            if self.match_char(')') {
                return Ok(arguments);
            }
            self.expect_char(',', "argument list")?;
        }
    }
}

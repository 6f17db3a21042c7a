//! Kaleido Recursive Descent Parser
//!
//! Turns the token stream into a `Program`. Binary expressions use
//! precedence climbing over the table in `BinaryOp::precedence`; everything
//! else is plain recursive descent.

pub mod errors;
pub mod expressions;
pub mod items;

use crate::ast::*;
use crate::lexer::{Token, TokenType};
use kal_common::{CompilerError, SourceLocation, SourceSpan};
use std::collections::VecDeque;

pub use errors::ParseError;

/// Kaleido Parser
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    /// End of the most recently consumed token, used to close spans
    pub(crate) last_end: SourceLocation,
    eof_location: SourceLocation,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof_location = tokens
            .last()
            .map(|t| t.span.start.clone())
            .unwrap_or_else(SourceLocation::dummy);

        Self {
            tokens: tokens.into(),
            last_end: SourceLocation::dummy(),
            eof_location,
        }
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Get current token and advance; `EndOfFile` is never consumed
    pub(crate) fn advance(&mut self) -> Option<Token> {
        if self.is_at_end() {
            return None;
        }
        let token = self.tokens.pop_front()?;
        self.last_end = token.span.end.clone();
        Some(token)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        match self.peek() {
            Some(token) => token.token_type == TokenType::EndOfFile,
            None => true,
        }
    }

    /// Check if current token matches expected type
    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        if let Some(token) = self.peek() {
            std::mem::discriminant(&token.token_type) == std::mem::discriminant(token_type)
        } else {
            matches!(token_type, TokenType::EndOfFile)
        }
    }

    /// Check if current token is the given single character
    pub(crate) fn check_char(&self, c: char) -> bool {
        self.peek().is_some_and(|t| t.token_type.is_char(c))
    }

    /// Consume token if it matches expected type
    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the given character token if it is next
    pub(crate) fn match_char(&mut self, c: char) -> bool {
        if self.check_char(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: String) -> ParseError {
        match self.tokens.front() {
            Some(token) if token.token_type != TokenType::EndOfFile => ParseError::UnexpectedToken {
                expected,
                found: token.clone(),
            },
            _ => ParseError::UnexpectedEndOfFile {
                expected,
                location: self.eof_location.clone(),
            },
        }
    }

    /// Expect and consume a specific keyword token
    pub(crate) fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token, ParseError> {
        if self.check(&token_type) && !self.is_at_end() {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(format!("{} in {}", token_type, context)))
    }

    /// Expect and consume a specific character token
    pub(crate) fn expect_char(&mut self, c: char, context: &str) -> Result<Token, ParseError> {
        if self.check_char(c) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(format!("'{}' in {}", c, context)))
    }

    /// Expect an identifier and return its name
    pub(crate) fn expect_identifier(&mut self, context: &str) -> Result<String, ParseError> {
        if let Some(Token { token_type: TokenType::Identifier(_), .. }) = self.peek() {
            if let Some(Token { token_type: TokenType::Identifier(name), .. }) = self.advance() {
                return Ok(name);
            }
        }
        Err(self.unexpected(format!("identifier in {}", context)))
    }

    /// Get current location for error reporting
    pub(crate) fn current_location(&self) -> SourceLocation {
        match self.peek() {
            Some(token) => token.span.start.clone(),
            None => self.eof_location.clone(),
        }
    }

    /// Span from `start` to the end of the last consumed token
    pub(crate) fn span_from(&self, start: SourceLocation) -> SourceSpan {
        SourceSpan::new(start, self.last_end.clone())
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, CompilerError> {
        let start_location = self.current_location();
        let mut items = Vec::new();

        while !self.is_at_end() {
            if self.match_char(';') {
                continue;
            }
            items.push(self.parse_top_level_item()?);
        }

        Ok(Program {
            items,
            span: SourceSpan::new(start_location, self.current_location()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse_expression_from_str(input: &str) -> Result<Expression, CompilerError> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Parser::new(tokens);
        parser.parse_expression()
    }

    fn parse_program_from_str(input: &str) -> Result<Program, CompilerError> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser::new(tokens).parse_program()
    }

    #[test]
    fn test_parse_number_and_variable() {
        let expr = parse_expression_from_str("42").unwrap();
        assert_eq!(expr.kind, ExpressionKind::Number(42.0));

        let expr = parse_expression_from_str("variable").unwrap();
        assert_eq!(expr.as_variable(), Some("variable"));
    }

    #[test]
    fn test_operator_precedence() {
        let expr = parse_expression_from_str("2 + 3 * 4").unwrap();
        assert_eq!(expr.to_string(), "(2 + (3 * 4))");

        let expr = parse_expression_from_str("1 - 2 - 3").unwrap();
        assert_eq!(expr.to_string(), "((1 - 2) - 3)");

        let expr = parse_expression_from_str("a < b + 1 : c").unwrap();
        assert_eq!(expr.to_string(), "((a < (b + 1)) : c)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = parse_expression_from_str("a = b = 3").unwrap();
        assert_eq!(expr.to_string(), "(a = (b = 3))");

        let expr = parse_expression_from_str("x = 1 : x + 1").unwrap();
        assert_eq!(expr.to_string(), "((x = 1) : (x + 1))");
    }

    #[test]
    fn test_parenthesized_expression() {
        let expr = parse_expression_from_str("(1 + 2) * 3").unwrap();
        assert_eq!(expr.to_string(), "((1 + 2) * 3)");
    }

    #[test]
    fn test_division_parses_as_other_operator() {
        let expr = parse_expression_from_str("6 / 2").unwrap();
        match expr.kind {
            ExpressionKind::Binary { op, .. } => assert_eq!(op, BinaryOp::Other('/')),
            other => panic!("Expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_call() {
        let expr = parse_expression_from_str("foo(1, x + 2)").unwrap();
        match expr.kind {
            ExpressionKind::Call { callee, arguments } => {
                assert_eq!(callee, "foo");
                assert_eq!(arguments.len(), 2);
                assert_eq!(arguments[1].to_string(), "(x + 2)");
            }
            other => panic!("Expected function call, got {other:?}"),
        }

        let expr = parse_expression_from_str("bar()").unwrap();
        assert!(matches!(expr.kind, ExpressionKind::Call { ref arguments, .. } if arguments.is_empty()));
    }

    #[test]
    fn test_expression_span() {
        let expr = parse_expression_from_str("1 +\n  foo").unwrap();
        assert_eq!((expr.span.start.line, expr.span.start.column), (1, 1));
        assert_eq!((expr.span.end.line, expr.span.end.column), (2, 6));
    }

    #[test]
    fn test_parse_program_items() {
        let program = parse_program_from_str(
            "extern sin(x);\n\
             def twice(a, b) a * 2 + b;\n\
             def noop() 0\n\
             twice(1, 2);",
        )
        .unwrap();
        assert_eq!(program.items.len(), 4);

        match &program.items[0] {
            TopLevelItem::Extern(proto) => assert_eq!(proto.to_string(), "sin(x)"),
            other => panic!("Expected extern, got {other:?}"),
        }
        match &program.items[1] {
            TopLevelItem::Function(func) => {
                assert_eq!(func.name(), "twice");
                assert_eq!(func.prototype.params, vec!["a".to_string(), "b".to_string()]);
                assert_eq!(func.body.to_string(), "((a * 2) + b)");
            }
            other => panic!("Expected function, got {other:?}"),
        }
        match &program.items[2] {
            TopLevelItem::Function(func) => assert_eq!(func.prototype.arity(), 0),
            other => panic!("Expected function, got {other:?}"),
        }
        assert!(matches!(program.items[3], TopLevelItem::Expression(_)));
    }

    #[test]
    fn test_prototype_parameters_without_commas() {
        let program = parse_program_from_str("def add(x y) x + y").unwrap();
        match &program.items[0] {
            TopLevelItem::Function(func) => assert_eq!(func.prototype.to_string(), "add(x, y)"),
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_paren_reports_location() {
        let err = parse_expression_from_str("(1 + 2").unwrap_err();
        match err {
            CompilerError::ParseError { message, .. } => {
                assert!(message.contains("Unexpected end of file"), "{message}");
            }
            other => panic!("Expected parse error, got {other:?}"),
        }

        let err = parse_program_from_str("def 42").unwrap_err();
        match err {
            CompilerError::ParseError { location, message } => {
                assert_eq!(location.column, 5);
                assert!(message.contains("identifier"), "{message}");
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_program() {
        let program = parse_program_from_str("  # nothing here\n;;").unwrap();
        assert!(program.items.is_empty());
    }
}

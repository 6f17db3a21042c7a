//! Keyword-introduced expressions: `if`, `for`, `while`, `var`

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use kal_common::CompilerError;

impl Parser {
    /// `if cond then a else b`
    pub(crate) fn parse_if_expression(&mut self) -> Result<Expression, CompilerError> {
        let start_location = self.current_location();
        self.expect(TokenType::If, "if expression")?;

        let condition = self.parse_expression()?;
        self.expect(TokenType::Then, "if expression")?;
        let then_branch = self.parse_expression()?;
        self.expect(TokenType::Else, "if expression")?;
        let else_branch = self.parse_expression()?;

        Ok(Expression::new(
            ExpressionKind::IfThenElse {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            self.span_from(start_location),
        ))
    }

    /// `for i = init, cond (, step)? in body`
    pub(crate) fn parse_for_expression(&mut self) -> Result<Expression, CompilerError> {
        let start_location = self.current_location();
        self.expect(TokenType::For, "for loop")?;

        let var_name = self.expect_identifier("for loop")?;
        self.expect_char('=', "for loop")?;
        let init = self.parse_expression()?;
        self.expect_char(',', "for loop")?;
        let condition = self.parse_expression()?;

        let step = if self.match_char(',') {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        self.expect(TokenType::In, "for loop")?;
        let body = self.parse_expression()?;

        Ok(Expression::new(
            ExpressionKind::For {
                var_name,
                init: Box::new(init),
                condition: Box::new(condition),
                step,
                body: Box::new(body),
            },
            self.span_from(start_location),
        ))
    }

    /// `while cond in body`
    pub(crate) fn parse_while_expression(&mut self) -> Result<Expression, CompilerError> {
        let start_location = self.current_location();
        self.expect(TokenType::While, "while loop")?;

        let condition = self.parse_expression()?;
        self.expect(TokenType::In, "while loop")?;
        let body = self.parse_expression()?;

        Ok(Expression::new(
            ExpressionKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
            },
            self.span_from(start_location),
        ))
    }

    /// `var a = 1, b in body`
    pub(crate) fn parse_var_expression(&mut self) -> Result<Expression, CompilerError> {
        let start_location = self.current_location();
        self.expect(TokenType::Var, "var expression")?;

        let mut bindings = Vec::new();
        loop {
            let name = self.expect_identifier("var expression")?;
            let initializer = if self.match_char('=') {
                Some(self.parse_expression()?)
            } else {
                None
            };
            bindings.push(VarBinding { name, initializer });

            if !self.match_char(',') {
                break;
            }
        }

        self.expect(TokenType::In, "var expression")?;
        let body = self.parse_expression()?;

        Ok(Expression::new(
            ExpressionKind::VarDef {
                bindings,
                body: Box::new(body),
            },
            self.span_from(start_location),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Expression {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse_expression().unwrap()
    }

    #[test]
    fn test_parse_if() {
        let expr = parse("if x < 3 then 1 else fib(x - 1)");
        assert_eq!(expr.to_string(), "if (x < 3) then 1 else fib((x - 1))");
    }

    #[test]
    fn test_parse_for_with_and_without_step() {
        let expr = parse("for i = 1, i < n, 2 in putchard(42)");
        match &expr.kind {
            ExpressionKind::For { var_name, step, .. } => {
                assert_eq!(var_name, "i");
                assert_eq!(step.as_ref().map(|s| s.to_string()), Some("2".to_string()));
            }
            other => panic!("Expected for loop, got {other:?}"),
        }

        let expr = parse("for i = 0, i < 5 in i");
        assert!(matches!(expr.kind, ExpressionKind::For { step: None, .. }));
    }

    #[test]
    fn test_parse_while() {
        let expr = parse("while i < 10 in i = i + 1");
        assert_eq!(expr.to_string(), "while (i < 10) in (i = (i + 1))");
    }

    #[test]
    fn test_parse_var_bindings() {
        let expr = parse("var a = 1, b, c = a + 1 in a + b + c");
        match &expr.kind {
            ExpressionKind::VarDef { bindings, body } => {
                let names: Vec<&str> = bindings.iter().map(|b| b.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b", "c"]);
                assert!(bindings[1].initializer.is_none());
                assert_eq!(
                    bindings[2].initializer.as_ref().map(|e| e.to_string()),
                    Some("(a + 1)".to_string())
                );
                assert_eq!(body.to_string(), "((a + b) + c)");
            }
            other => panic!("Expected var expression, got {other:?}"),
        }
    }

    #[test]
    fn test_if_requires_else() {
        let tokens = Lexer::new("if 1 then 2").tokenize().unwrap();
        assert!(Parser::new(tokens).parse_expression().is_err());
    }

    #[test]
    fn test_control_flow_as_operand() {
        let expr = parse("1 + (if a then b else c)");
        assert_eq!(expr.to_string(), "(1 + if a then b else c)");

        // The body extends as far right as possible
        let expr = parse("while a in b : c");
        assert_eq!(expr.to_string(), "while a in (b : c)");
    }
}

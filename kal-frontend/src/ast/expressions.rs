//! Expression AST nodes
//!
//! Every child is owned through `Box` or `Vec`, so each subtree has exactly
//! one owner and the tree cannot contain cycles.

use super::ops::BinaryOp;
use kal_common::SourceSpan;
use serde::{Deserialize, Serialize};

/// AST Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: SourceSpan,
}

/// One `name = init` entry of a `var` expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarBinding {
    pub name: String,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Numeric literal
    Number(f64),

    /// Variable reference
    Variable(String),

    /// Binary operation; `op == Assign` is an assignment to `left`
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// `var a = 1, b in body`
    VarDef {
        bindings: Vec<VarBinding>,
        body: Box<Expression>,
    },

    /// `if cond then a else b`
    IfThenElse {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },

    /// `for i = init, cond, step in body` (step defaults to 1.0)
    For {
        var_name: String,
        init: Box<Expression>,
        condition: Box<Expression>,
        step: Option<Box<Expression>>,
        body: Box<Expression>,
    },

    /// `while cond in body`
    While {
        condition: Box<Expression>,
        body: Box<Expression>,
    },

    /// Function call by name
    Call {
        callee: String,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    fn synthesized(kind: ExpressionKind) -> Self {
        Self::new(kind, SourceSpan::dummy())
    }

    pub fn number(value: f64) -> Self {
        Self::synthesized(ExpressionKind::Number(value))
    }

    pub fn variable(name: &str) -> Self {
        Self::synthesized(ExpressionKind::Variable(name.to_string()))
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Self::synthesized(ExpressionKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(target: Expression, value: Expression) -> Self {
        Self::binary(BinaryOp::Assign, target, value)
    }

    pub fn var_def(bindings: Vec<(&str, Option<Expression>)>, body: Expression) -> Self {
        let bindings = bindings
            .into_iter()
            .map(|(name, initializer)| VarBinding { name: name.to_string(), initializer })
            .collect();
        Self::synthesized(ExpressionKind::VarDef { bindings, body: Box::new(body) })
    }

    pub fn if_then_else(condition: Expression, then_branch: Expression, else_branch: Expression) -> Self {
        Self::synthesized(ExpressionKind::IfThenElse {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    pub fn for_loop(
        var_name: &str,
        init: Expression,
        condition: Expression,
        step: Option<Expression>,
        body: Expression,
    ) -> Self {
        Self::synthesized(ExpressionKind::For {
            var_name: var_name.to_string(),
            init: Box::new(init),
            condition: Box::new(condition),
            step: step.map(Box::new),
            body: Box::new(body),
        })
    }

    pub fn while_loop(condition: Expression, body: Expression) -> Self {
        Self::synthesized(ExpressionKind::While {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    pub fn call(callee: &str, arguments: Vec<Expression>) -> Self {
        Self::synthesized(ExpressionKind::Call { callee: callee.to_string(), arguments })
    }

    /// Name of the variable if this node is a plain variable reference
    pub fn as_variable(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Variable(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kal_common::SourceLocation;

    #[test]
    fn test_expression_creation() {
        let loc = SourceLocation::new_simple(1, 1);
        let expr = Expression::new(ExpressionKind::Number(42.0), SourceSpan::new(loc.clone(), loc));

        match expr.kind {
            ExpressionKind::Number(value) => assert_eq!(value, 42.0),
            _ => panic!("Expected Number"),
        }
        assert_eq!(expr.span.start.line, 1);
    }

    #[test]
    fn test_constructors_own_children() {
        let expr = Expression::var_def(
            vec![("x", Some(Expression::number(1.0))), ("y", None)],
            Expression::binary(BinaryOp::Add, Expression::variable("x"), Expression::variable("y")),
        );

        match &expr.kind {
            ExpressionKind::VarDef { bindings, body } => {
                assert_eq!(bindings.len(), 2);
                assert_eq!(bindings[0].name, "x");
                assert!(bindings[1].initializer.is_none());
                assert!(matches!(body.kind, ExpressionKind::Binary { op: BinaryOp::Add, .. }));
            }
            _ => panic!("Expected VarDef"),
        }
        assert!(expr.span.start.is_dummy());
    }

    #[test]
    fn test_as_variable() {
        assert_eq!(Expression::variable("x").as_variable(), Some("x"));
        assert_eq!(Expression::number(1.0).as_variable(), None);
    }
}

//! Source-like rendering of AST nodes
//!
//! Binary operations are always parenthesized so the printed form shows the
//! tree shape the parser produced.

use super::{Expression, ExpressionKind, FunctionDefinition, Prototype, TopLevelItem};
use std::fmt;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Number(value) => write!(f, "{value}"),
            ExpressionKind::Variable(name) => write!(f, "{name}"),
            ExpressionKind::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            ExpressionKind::VarDef { bindings, body } => {
                write!(f, "var ")?;
                for (i, binding) in bindings.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", binding.name)?;
                    if let Some(init) = &binding.initializer {
                        write!(f, " = {init}")?;
                    }
                }
                write!(f, " in {body}")
            }
            ExpressionKind::IfThenElse { condition, then_branch, else_branch } => {
                write!(f, "if {condition} then {then_branch} else {else_branch}")
            }
            ExpressionKind::For { var_name, init, condition, step, body } => {
                write!(f, "for {var_name} = {init}, {condition}")?;
                if let Some(step) = step {
                    write!(f, ", {step}")?;
                }
                write!(f, " in {body}")
            }
            ExpressionKind::While { condition, body } => write!(f, "while {condition} in {body}"),
            ExpressionKind::Call { callee, arguments } => {
                write!(f, "{callee}(")?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}\n    {}", self.prototype, self.body)
    }
}

impl fmt::Display for TopLevelItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopLevelItem::Function(func) => write!(f, "{func}"),
            TopLevelItem::Extern(proto) => write!(f, "extern {proto}"),
            TopLevelItem::Expression(expr) => write!(f, "{expr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expression, FunctionDefinition, Prototype};

    #[test]
    fn test_display_nested_binary() {
        let expr = Expression::binary(
            BinaryOp::Mul,
            Expression::number(2.0),
            Expression::binary(BinaryOp::Add, Expression::number(3.0), Expression::variable("x")),
        );
        assert_eq!(expr.to_string(), "(2 * (3 + x))");
    }

    #[test]
    fn test_display_control_flow() {
        let for_expr = Expression::for_loop(
            "i",
            Expression::number(0.0),
            Expression::binary(BinaryOp::Less, Expression::variable("i"), Expression::number(5.0)),
            None,
            Expression::call("putchard", vec![Expression::number(42.0)]),
        );
        assert_eq!(for_expr.to_string(), "for i = 0, (i < 5) in putchard(42)");

        let var_expr = Expression::var_def(
            vec![("a", Some(Expression::number(1.5))), ("b", None)],
            Expression::if_then_else(Expression::variable("a"), Expression::variable("b"), Expression::number(0.0)),
        );
        assert_eq!(var_expr.to_string(), "var a = 1.5, b in if a then b else 0");
    }

    #[test]
    fn test_display_function() {
        let func = FunctionDefinition::new(
            Prototype::new("add", &["x", "y"]),
            Expression::binary(BinaryOp::Add, Expression::variable("x"), Expression::variable("y")),
        );
        assert_eq!(func.to_string(), "def add(x, y)\n    (x + y)");
    }
}

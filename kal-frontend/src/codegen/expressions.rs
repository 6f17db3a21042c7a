//! Expression lowering
//!
//! Every expression lowers to a single `Value`. Operands are lowered left
//! to right.

use kal_common::SourceLocation;
use crate::ast::{BinaryOp, Expression, ExpressionKind, VarBinding};
use crate::codegen::{CodeGenerator, LoweringError};
use crate::ir::{FCmpPredicate, IrBinaryOp, Value};

impl CodeGenerator {
    pub(crate) fn lower_expression(&mut self, expr: &Expression) -> Result<Value, LoweringError> {
        let location = &expr.span.start;
        match &expr.kind {
            ExpressionKind::Number(value) => Ok(Value::Constant(*value)),

            ExpressionKind::Variable(name) => self.lower_variable(name, location),

            ExpressionKind::Binary { op: BinaryOp::Assign, left, right } => {
                self.lower_assignment(left, right, location)
            }

            ExpressionKind::Binary { op, left, right } => self.lower_binary(*op, left, right, location),

            ExpressionKind::VarDef { bindings, body } => self
                .lower_var_def(bindings, body)
                .map_err(|e| e.within("var expression")),

            ExpressionKind::IfThenElse { condition, then_branch, else_branch } => self
                .lower_if(condition, then_branch, else_branch)
                .map_err(|e| e.within("if expression")),

            ExpressionKind::For { var_name, init, condition, step, body } => self
                .lower_for(var_name, init, condition, step.as_deref(), body)
                .map_err(|e| e.within(format!("for loop over '{var_name}'"))),

            ExpressionKind::While { condition, body } => self
                .lower_while(condition, body)
                .map_err(|e| e.within("while loop")),

            ExpressionKind::Call { callee, arguments } => self.lower_call(callee, arguments, location),
        }
    }

    fn lower_variable(&mut self, name: &str, location: &SourceLocation) -> Result<Value, LoweringError> {
        let slot = self.scopes.lookup(name).ok_or_else(|| LoweringError::UnknownVariable {
            name: name.to_string(),
            location: location.clone(),
        })?;
        Ok(self.builder.build_load(slot)?)
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
        location: &SourceLocation,
    ) -> Result<Value, LoweringError> {
        let lhs = self.lower_expression(left)?;
        let rhs = self.lower_expression(right)?;

        let value = match op {
            BinaryOp::Add => self.builder.build_binary(IrBinaryOp::FAdd, lhs, rhs)?,
            BinaryOp::Sub => self.builder.build_binary(IrBinaryOp::FSub, lhs, rhs)?,
            BinaryOp::Mul => self.builder.build_binary(IrBinaryOp::FMul, lhs, rhs)?,
            BinaryOp::Less => {
                let cmp = self.builder.build_fcmp(FCmpPredicate::Olt, lhs, rhs)?;
                self.builder.build_uitofp(cmp)?
            }
            BinaryOp::Greater => {
                let cmp = self.builder.build_fcmp(FCmpPredicate::Ogt, lhs, rhs)?;
                self.builder.build_uitofp(cmp)?
            }
            BinaryOp::Sequence => rhs,
            BinaryOp::Assign | BinaryOp::Other(_) => {
                return Err(LoweringError::UnsupportedOperator {
                    op: op.as_char(),
                    location: location.clone(),
                });
            }
        };
        Ok(value)
    }

    fn lower_assignment(
        &mut self,
        target: &Expression,
        value: &Expression,
        location: &SourceLocation,
    ) -> Result<Value, LoweringError> {
        let value = self.lower_expression(value)?;
        let name = match &target.kind {
            ExpressionKind::Variable(name) => name,
            _ => return Err(LoweringError::InvalidAssignmentTarget { location: location.clone() }),
        };

        let slot = self.scopes.lookup(name).ok_or_else(|| LoweringError::UnknownVariable {
            name: name.clone(),
            location: target.span.start.clone(),
        })?;
        self.builder.build_store(value, slot)?;
        Ok(value)
    }

    /// Each binding is visible to the initializers after it and to the body
    fn lower_var_def(&mut self, bindings: &[VarBinding], body: &Expression) -> Result<Value, LoweringError> {
        self.with_bindings(|gen, shadowed| {
            for binding in bindings {
                let init = match &binding.initializer {
                    Some(initializer) => gen.lower_expression(initializer)?,
                    None => Value::Constant(0.0),
                };
                let slot = gen.builder.build_alloca(Some(binding.name.as_str()))?;
                shadowed.bind(&mut gen.scopes, &binding.name, slot);
                gen.builder.build_store(init, slot)?;
            }
            gen.lower_expression(body)
        })
    }

    fn lower_call(
        &mut self,
        callee: &str,
        arguments: &[Expression],
        location: &SourceLocation,
    ) -> Result<Value, LoweringError> {
        let handle = self.registry.resolve(&mut self.builder, callee, location)?;
        if handle.arity != arguments.len() {
            return Err(LoweringError::ArityMismatch {
                name: callee.to_string(),
                expected: handle.arity,
                given: arguments.len(),
                location: location.clone(),
            });
        }

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let value = self
                .lower_expression(argument)
                .map_err(|e| e.within(format!("call to '{callee}'")))?;
            args.push(value);
        }
        Ok(self.builder.build_call(&handle.name, args)?)
    }
}

//! Control flow lowering (if, for, while)
//!
//! Conditions are compared `one` against 0.0, so any nonzero, non-NaN value
//! is true. Loops test their condition before the first iteration and
//! always yield 0.0.

use kal_common::LabelId;
use log::trace;
use crate::ast::Expression;
use crate::codegen::{CodeGenerator, LoweringError};
use crate::ir::{FCmpPredicate, IrBinaryOp, Value};

impl CodeGenerator {
    fn lower_condition(&mut self, condition: &Expression) -> Result<Value, LoweringError> {
        let value = self.lower_expression(condition)?;
        Ok(self.builder.build_fcmp(FCmpPredicate::One, value, Value::Constant(0.0))?)
    }

    fn start_block(&mut self, label: LabelId) -> Result<(), LoweringError> {
        trace!("Emitting into block L{label}");
        Ok(self.builder.position_at_end(label)?)
    }

    /// Both arms store into one unnamed slot that the merge block reads back
    pub(crate) fn lower_if(
        &mut self,
        condition: &Expression,
        then_branch: &Expression,
        else_branch: &Expression,
    ) -> Result<Value, LoweringError> {
        let test = self.lower_condition(condition)?;
        let result_slot = self.builder.build_alloca(None)?;

        let then_label = self.builder.append_block("then")?;
        let else_label = self.builder.append_block("else")?;
        let merge_label = self.builder.append_block("ifcont")?;

        self.builder.build_branch_cond(test, then_label, else_label)?;

        self.start_block(then_label)?;
        let then_value = self.lower_expression(then_branch)?;
        self.builder.build_store(then_value, result_slot)?;
        self.builder.build_branch(merge_label)?;

        self.start_block(else_label)?;
        let else_value = self.lower_expression(else_branch)?;
        self.builder.build_store(else_value, result_slot)?;
        self.builder.build_branch(merge_label)?;

        self.start_block(merge_label)?;
        Ok(self.builder.build_load(result_slot)?)
    }

    pub(crate) fn lower_for(
        &mut self,
        var_name: &str,
        init: &Expression,
        condition: &Expression,
        step: Option<&Expression>,
        body: &Expression,
    ) -> Result<Value, LoweringError> {
        let start = self.lower_expression(init)?;
        let slot = self.builder.build_alloca(Some(var_name))?;
        self.builder.build_store(start, slot)?;

        self.with_bindings(|gen, shadowed| {
            shadowed.bind(&mut gen.scopes, var_name, slot);

            let cond_label = gen.builder.append_block("for.cond")?;
            let body_label = gen.builder.append_block("for.body")?;
            let end_label = gen.builder.append_block("for.end")?;

            gen.builder.build_branch(cond_label)?;

            gen.start_block(cond_label)?;
            let test = gen.lower_condition(condition)?;
            gen.builder.build_branch_cond(test, body_label, end_label)?;

            gen.start_block(body_label)?;
            gen.lower_expression(body)?;
            let step_value = match step {
                Some(step) => gen.lower_expression(step)?,
                None => Value::Constant(1.0),
            };
            let current = gen.builder.build_load(slot)?;
            let next = gen.builder.build_binary(IrBinaryOp::FAdd, current, step_value)?;
            gen.builder.build_store(next, slot)?;
            gen.builder.build_branch(cond_label)?;

            gen.start_block(end_label)?;
            Ok(Value::Constant(0.0))
        })
    }

    pub(crate) fn lower_while(&mut self, condition: &Expression, body: &Expression) -> Result<Value, LoweringError> {
        let cond_label = self.builder.append_block("while.cond")?;
        let body_label = self.builder.append_block("while.body")?;
        let end_label = self.builder.append_block("while.end")?;

        self.builder.build_branch(cond_label)?;

        self.start_block(cond_label)?;
        let test = self.lower_condition(condition)?;
        self.builder.build_branch_cond(test, body_label, end_label)?;

        self.start_block(body_label)?;
        self.lower_expression(body)?;
        self.builder.build_branch(cond_label)?;

        self.start_block(end_label)?;
        Ok(Value::Constant(0.0))
    }
}

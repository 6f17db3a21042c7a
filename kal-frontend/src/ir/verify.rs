//! Structural checks on lowered functions
//!
//! A function that passes `verify_function` can be executed by the VM
//! without hitting a malformed-IR error.

use kal_common::{LabelId, TempId};
use std::collections::HashSet;
use crate::ir::{Function, Instruction, Module};

/// Verify one function against the module it lives in
pub fn verify_function(module: &Module, function: &Function) -> Result<(), String> {
    let name = &function.name;
    if function.is_declaration() {
        return Err(format!("Function '{name}' has no body"));
    }

    let mut labels = HashSet::new();
    for block in &function.blocks {
        if !labels.insert(block.id) {
            return Err(format!("Function '{name}': duplicate block L{}", block.id));
        }
    }

    let mut defined: HashSet<TempId> = function.parameters.iter().map(|(temp, _)| *temp).collect();
    let mut slots: HashSet<TempId> = HashSet::new();
    for instr in function.blocks.iter().flat_map(|b| &b.instructions) {
        if let Some(result) = instr.result() {
            if !defined.insert(result) {
                return Err(format!("Function '{name}': %{result} is defined twice"));
            }
            if matches!(instr, Instruction::Alloca { .. }) {
                slots.insert(result);
            }
        }
    }

    for block in &function.blocks {
        let Some((last, body)) = block.instructions.split_last() else {
            return Err(format!("Function '{name}': block L{} is empty", block.id));
        };
        if !last.is_terminator() {
            return Err(format!("Function '{name}': block L{} has no terminator", block.id));
        }
        if body.iter().any(Instruction::is_terminator) {
            return Err(format!(
                "Function '{name}': block L{} has a terminator before its end",
                block.id
            ));
        }

        for instr in &block.instructions {
            verify_instruction(module, function, instr, &defined, &slots, &labels)?;
        }
    }

    Ok(())
}

fn verify_instruction(
    module: &Module,
    function: &Function,
    instr: &Instruction,
    defined: &HashSet<TempId>,
    slots: &HashSet<TempId>,
    labels: &HashSet<LabelId>,
) -> Result<(), String> {
    let name = &function.name;

    for operand in instr.operands() {
        if let Some(temp) = operand.as_temp() {
            if !defined.contains(&temp) || slots.contains(&temp) {
                return Err(format!("Function '{name}': use of undefined value %{temp} in '{instr}'"));
            }
        }
    }

    if let Some(slot) = instr.slot() {
        if !slots.contains(&slot.id()) {
            return Err(format!("Function '{name}': {slot} is not a stack slot in '{instr}'"));
        }
    }

    for target in instr.successors() {
        if !labels.contains(&target) {
            return Err(format!("Function '{name}': branch to unknown block L{target}"));
        }
    }

    if let Instruction::Call { callee, args, .. } = instr {
        let target = module
            .get_function(callee)
            .ok_or_else(|| format!("Function '{name}': call to unknown function '{callee}'"))?;
        if target.arity() != args.len() {
            return Err(format!(
                "Function '{name}': call to '{callee}' passes {} arguments, expected {}",
                args.len(),
                target.arity()
            ));
        }
    }

    Ok(())
}

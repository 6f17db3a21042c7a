//! Per-function optimization passes
//!
//! Passes run in sequence through a `PassManager` after a function body has
//! been lowered and verified.

use kal_common::{LabelId, TempId};
use log::debug;
use std::collections::{HashMap, HashSet, VecDeque};
use crate::ir::{Function, Instruction, Value};

/// A transformation over one function
pub trait FunctionPass {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Returns true if the function changed
    fn run(&self, function: &mut Function) -> bool;
}

/// Manages and executes a sequence of function passes
pub struct PassManager {
    passes: Vec<Box<dyn FunctionPass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Constant folding followed by unreachable-block removal
    pub fn standard() -> Self {
        let mut pm = Self::new();
        pm.add_pass(Box::new(ConstantFolding));
        pm.add_pass(Box::new(RemoveUnreachableBlocks));
        pm
    }

    pub fn add_pass(&mut self, pass: Box<dyn FunctionPass>) {
        self.passes.push(pass);
    }

    pub fn run(&self, function: &mut Function) -> bool {
        let mut changed = false;
        for pass in &self.passes {
            let pass_changed = pass.run(function);
            debug!("{} on '{}': changed={}", pass.name(), function.name, pass_changed);
            changed |= pass_changed;
        }
        changed
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the standard pipeline on one function
pub fn run_function_passes(function: &mut Function) -> bool {
    PassManager::standard().run(function)
}

/// Folds arithmetic, comparisons and conversions whose operands are all
/// constants, then turns branches on a constant condition into plain
/// branches. Loads and stores are left alone.
pub struct ConstantFolding;

impl ConstantFolding {
    fn fold(instr: &Instruction) -> Option<(TempId, f64)> {
        match instr {
            Instruction::Binary { result, op, lhs, rhs } => {
                Some((*result, op.apply(lhs.as_constant()?, rhs.as_constant()?)))
            }
            Instruction::FCmp { result, predicate, lhs, rhs } => {
                let holds = predicate.evaluate(lhs.as_constant()?, rhs.as_constant()?);
                Some((*result, if holds { 1.0 } else { 0.0 }))
            }
            Instruction::UiToFp { result, value } => {
                let value = value.as_constant()?;
                Some((*result, if value != 0.0 { 1.0 } else { 0.0 }))
            }
            _ => None,
        }
    }
}

impl FunctionPass for ConstantFolding {
    fn name(&self) -> &'static str {
        "constant-folding"
    }

    fn run(&self, function: &mut Function) -> bool {
        let mut known: HashMap<TempId, f64> = HashMap::new();

        // Temps are assigned once, so substituting a folded temp everywhere
        // in the function is safe. Repeat until nothing new folds.
        loop {
            let mut progress = false;
            for instr in function.blocks.iter_mut().flat_map(|b| b.instructions.iter_mut()) {
                for operand in instr.operands_mut() {
                    if let Value::Temp(temp) = *operand {
                        if let Some(value) = known.get(&temp) {
                            *operand = Value::Constant(*value);
                        }
                    }
                }
                if let Some((result, value)) = Self::fold(instr) {
                    if known.insert(result, value).is_none() {
                        progress = true;
                    }
                }
            }
            if !progress {
                break;
            }
        }

        let mut changed = !known.is_empty();
        for block in &mut function.blocks {
            block
                .instructions
                .retain(|instr| !instr.result().is_some_and(|r| known.contains_key(&r)));

            let folded_target = match block.instructions.last() {
                Some(Instruction::BranchCond { condition: Value::Constant(c), true_label, false_label }) => {
                    Some(if *c != 0.0 { *true_label } else { *false_label })
                }
                _ => None,
            };
            if let Some(target) = folded_target {
                if let Some(last) = block.instructions.last_mut() {
                    *last = Instruction::Branch(target);
                }
                changed = true;
            }
        }
        changed
    }
}

/// Drops blocks that cannot be reached from the entry block
pub struct RemoveUnreachableBlocks;

impl FunctionPass for RemoveUnreachableBlocks {
    fn name(&self) -> &'static str {
        "remove-unreachable-blocks"
    }

    fn run(&self, function: &mut Function) -> bool {
        let Some(entry) = function.entry_block().map(|b| b.id) else {
            return false;
        };

        let mut reachable: HashSet<LabelId> = HashSet::new();
        let mut worklist = VecDeque::from([entry]);
        while let Some(label) = worklist.pop_front() {
            if !reachable.insert(label) {
                continue;
            }
            if let Some(block) = function.get_block(label) {
                worklist.extend(block.successors());
            }
        }

        let before = function.blocks.len();
        function.blocks.retain(|b| reachable.contains(&b.id));
        function.blocks.len() != before
    }
}

//! IR Builder
//!
//! Owns the module under construction and an insertion point (current
//! function and block). Every `build_*` appends to the end of the current
//! block, except `build_alloca`, which always goes into the entry block.

use kal_common::{LabelId, TempId};
use crate::ir::{
    BasicBlock, FCmpPredicate, Function, Instruction, IrBinaryOp, Module, StackSlot, Value,
};

/// Builder for constructing IR
pub struct IrBuilder {
    module: Module,
    current_function: Option<String>,
    current_block: Option<LabelId>,
    next_label_id: LabelId,
}

impl IrBuilder {
    pub fn new(module_name: &str) -> Self {
        Self {
            module: Module::new(module_name),
            current_function: None,
            current_block: None,
            next_label_id: 0,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    /// Add a declaration, or replace the parameters of an existing one
    pub fn declare_function(&mut self, name: &str, params: &[String]) -> Result<&Function, String> {
        match self.module.get_function(name) {
            Some(existing) if !existing.is_declaration() => {
                return Err(format!("Function '{name}' already has a body"));
            }
            Some(_) => {
                if let Some(existing) = self.module.get_function_mut(name) {
                    *existing = Function::new(name, params);
                }
            }
            None => self.module.add_function(Function::new(name, params)),
        }
        self.module
            .get_function(name)
            .ok_or_else(|| format!("Function '{name}' vanished after declaration"))
    }

    /// Start the body of a declared function and position at its entry block
    pub fn begin_function(&mut self, name: &str) -> Result<LabelId, String> {
        let function = self
            .module
            .get_function(name)
            .ok_or_else(|| format!("Function '{name}' is not declared"))?;
        if !function.is_declaration() {
            return Err(format!("Function '{name}' already has a body"));
        }

        self.current_function = Some(name.to_string());
        self.current_block = None;
        self.next_label_id = 0;

        let entry = self.append_block("entry")?;
        self.position_at_end(entry)?;
        Ok(entry)
    }

    /// Leave the current function; returns its name
    pub fn finish_function(&mut self) -> Option<String> {
        self.current_block = None;
        self.current_function.take()
    }

    pub fn current_block(&self) -> Option<LabelId> {
        self.current_block
    }

    fn function_mut(&mut self) -> Result<&mut Function, String> {
        let name = self.current_function.as_deref().ok_or("No current function")?;
        self.module
            .get_function_mut(name)
            .ok_or_else(|| format!("Current function '{name}' not found in module"))
    }

    fn function(&self) -> Result<&Function, String> {
        let name = self.current_function.as_deref().ok_or("No current function")?;
        self.module
            .get_function(name)
            .ok_or_else(|| format!("Current function '{name}' not found in module"))
    }

    /// Incoming `(temp, name)` of each parameter of the current function
    pub fn parameters(&self) -> Result<Vec<(TempId, String)>, String> {
        Ok(self.function()?.parameters.clone())
    }

    pub fn new_temp(&mut self) -> Result<TempId, String> {
        Ok(self.function_mut()?.new_temp())
    }

    /// Append a new empty block to the current function without moving the insertion point
    pub fn append_block(&mut self, name: &str) -> Result<LabelId, String> {
        let label = self.next_label_id;
        self.function_mut()?.add_block(BasicBlock::new(label, name));
        self.next_label_id += 1;
        Ok(label)
    }

    pub fn position_at_end(&mut self, label: LabelId) -> Result<(), String> {
        if self.function()?.get_block(label).is_none() {
            return Err(format!("Block L{label} not found"));
        }
        self.current_block = Some(label);
        Ok(())
    }

    /// Stack slot in the entry block, after any earlier allocas
    pub fn build_alloca(&mut self, name: Option<&str>) -> Result<StackSlot, String> {
        let function = self.function_mut()?;
        let result = function.new_temp();
        let entry = function.entry_block_mut().ok_or("Function has no entry block")?;
        let index = entry
            .instructions
            .iter()
            .take_while(|instr| matches!(instr, Instruction::Alloca { .. }))
            .count();
        entry.instructions.insert(
            index,
            Instruction::Alloca { result, name: name.map(str::to_string) },
        );
        Ok(StackSlot(result))
    }

    pub fn build_load(&mut self, slot: StackSlot) -> Result<Value, String> {
        let result = self.new_temp()?;
        self.add_instruction(Instruction::Load { result, slot })?;
        Ok(Value::Temp(result))
    }

    pub fn build_store(&mut self, value: Value, slot: StackSlot) -> Result<(), String> {
        self.add_instruction(Instruction::Store { value, slot })
    }

    pub fn build_binary(&mut self, op: IrBinaryOp, lhs: Value, rhs: Value) -> Result<Value, String> {
        let result = self.new_temp()?;
        self.add_instruction(Instruction::Binary { result, op, lhs, rhs })?;
        Ok(Value::Temp(result))
    }

    pub fn build_fcmp(&mut self, predicate: FCmpPredicate, lhs: Value, rhs: Value) -> Result<Value, String> {
        let result = self.new_temp()?;
        self.add_instruction(Instruction::FCmp { result, predicate, lhs, rhs })?;
        Ok(Value::Temp(result))
    }

    pub fn build_uitofp(&mut self, value: Value) -> Result<Value, String> {
        let result = self.new_temp()?;
        self.add_instruction(Instruction::UiToFp { result, value })?;
        Ok(Value::Temp(result))
    }

    pub fn build_call(&mut self, callee: &str, args: Vec<Value>) -> Result<Value, String> {
        let result = self.new_temp()?;
        self.add_instruction(Instruction::Call { result, callee: callee.to_string(), args })?;
        Ok(Value::Temp(result))
    }

    pub fn build_return(&mut self, value: Value) -> Result<(), String> {
        self.add_instruction(Instruction::Return(value))
    }

    pub fn build_branch(&mut self, label: LabelId) -> Result<(), String> {
        self.add_instruction(Instruction::Branch(label))
    }

    pub fn build_branch_cond(&mut self, condition: Value, true_label: LabelId, false_label: LabelId) -> Result<(), String> {
        self.add_instruction(Instruction::BranchCond { condition, true_label, false_label })
    }

    fn add_instruction(&mut self, instr: Instruction) -> Result<(), String> {
        let block_id = self.current_block.ok_or("No current block")?;
        let block = self
            .function_mut()?
            .get_block_mut(block_id)
            .ok_or("Current block not found")?;
        if block.has_terminator() {
            return Err(format!("Block L{block_id} already has a terminator"));
        }
        block.add_instruction(instr);
        Ok(())
    }

    pub fn current_block_has_terminator(&self) -> bool {
        let Some(block_id) = self.current_block else {
            return false;
        };
        self.function()
            .ok()
            .and_then(|function| function.get_block(block_id))
            .is_some_and(BasicBlock::has_terminator)
    }
}

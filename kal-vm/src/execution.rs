use kal_common::LabelId;
use kal_frontend::ir::{Function, Instruction, Module};
use log::trace;
use crate::frame::Frame;
use crate::{Vm, VmError};

/// What to do after an instruction
enum Flow {
    Continue,
    Jump(LabelId),
    Return(f64),
}

impl Vm {
    pub(crate) fn invoke(&mut self, module: &Module, name: &str, args: &[f64]) -> Result<f64, VmError> {
        match module.get_function(name) {
            Some(function) if !function.is_declaration() => self.run_function(module, function, args),
            _ => self.call_native(name, args),
        }
    }

    fn call_native(&mut self, name: &str, args: &[f64]) -> Result<f64, VmError> {
        let native = self
            .natives
            .get(name)
            .ok_or_else(|| VmError::UnknownFunction { name: name.to_string() })?;
        if native.arity != args.len() {
            return Err(VmError::ArityMismatch {
                name: name.to_string(),
                expected: native.arity,
                given: args.len(),
            });
        }
        trace!("native {}({:?})", name, args);
        Ok((native.function)(args, &mut *self.output)?)
    }

    fn run_function(&mut self, module: &Module, function: &Function, args: &[f64]) -> Result<f64, VmError> {
        if function.arity() != args.len() {
            return Err(VmError::ArityMismatch {
                name: function.name.clone(),
                expected: function.arity(),
                given: args.len(),
            });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(VmError::CallDepthExceeded { limit: self.config.max_call_depth });
        }

        self.depth += 1;
        let result = self.execute_body(module, function, args);
        self.depth -= 1;
        result
    }

    fn execute_body(&mut self, module: &Module, function: &Function, args: &[f64]) -> Result<f64, VmError> {
        let mut frame = Frame::new(&function.name);
        for ((temp, _), arg) in function.parameters.iter().zip(args) {
            frame.set(*temp, *arg);
        }

        let mut label = function
            .entry_block()
            .map(|block| block.id)
            .ok_or_else(|| VmError::UnknownBlock { function: function.name.clone(), block: 0 })?;

        loop {
            let block = function.get_block(label).ok_or_else(|| VmError::UnknownBlock {
                function: function.name.clone(),
                block: label,
            })?;
            trace!("{}: L{} ({})", function.name, block.id, block.name);

            let mut next = None;
            for instr in &block.instructions {
                self.tick()?;
                match self.execute(module, &mut frame, instr)? {
                    Flow::Continue => {}
                    Flow::Jump(target) => {
                        next = Some(target);
                        break;
                    }
                    Flow::Return(value) => return Ok(value),
                }
            }

            label = next.ok_or_else(|| VmError::MissingTerminator {
                function: function.name.clone(),
                block: block.id,
            })?;
        }
    }

    fn tick(&mut self) -> Result<(), VmError> {
        self.steps += 1;
        if self.steps > self.config.max_steps {
            return Err(VmError::StepLimitExceeded { limit: self.config.max_steps });
        }
        Ok(())
    }

    fn execute(&mut self, module: &Module, frame: &mut Frame<'_>, instr: &Instruction) -> Result<Flow, VmError> {
        match instr {
            Instruction::Alloca { result, .. } => frame.allocate(*result),
            Instruction::Load { result, slot } => {
                let value = frame.load(*slot)?;
                frame.set(*result, value);
            }
            Instruction::Store { value, slot } => {
                let value = frame.value(*value)?;
                frame.store(*slot, value)?;
            }
            Instruction::Binary { result, op, lhs, rhs } => {
                let value = op.apply(frame.value(*lhs)?, frame.value(*rhs)?);
                frame.set(*result, value);
            }
            Instruction::FCmp { result, predicate, lhs, rhs } => {
                let holds = predicate.evaluate(frame.value(*lhs)?, frame.value(*rhs)?);
                frame.set(*result, if holds { 1.0 } else { 0.0 });
            }
            Instruction::UiToFp { result, value } => {
                let value = frame.value(*value)?;
                frame.set(*result, if value != 0.0 { 1.0 } else { 0.0 });
            }
            Instruction::Call { result, callee, args } => {
                let values = args
                    .iter()
                    .map(|arg| frame.value(*arg))
                    .collect::<Result<Vec<f64>, VmError>>()?;
                let value = self.invoke(module, callee, &values)?;
                frame.set(*result, value);
            }
            Instruction::Return(value) => return Ok(Flow::Return(frame.value(*value)?)),
            Instruction::Branch(target) => return Ok(Flow::Jump(*target)),
            Instruction::BranchCond { condition, true_label, false_label } => {
                let target = if frame.value(*condition)? != 0.0 { *true_label } else { *false_label };
                return Ok(Flow::Jump(target));
            }
        }
        Ok(Flow::Continue)
    }
}

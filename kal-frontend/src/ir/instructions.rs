//! IR Instructions
//!
//! Defines all instruction types available in the IR.

use kal_common::{LabelId, TempId};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::ir::{FCmpPredicate, IrBinaryOp, StackSlot, Value};

/// IR Instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Allocate a stack slot holding one double: result = alloca double
    Alloca {
        result: TempId,
        /// Source variable the slot was created for, if any
        name: Option<String>,
    },

    /// Load from a stack slot: result = load slot
    Load {
        result: TempId,
        slot: StackSlot,
    },

    /// Store to a stack slot: store value, slot
    Store {
        value: Value,
        slot: StackSlot,
    },

    /// Binary operation: result = op lhs, rhs
    Binary {
        result: TempId,
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
    },

    /// Float comparison producing 0.0 or 1.0: result = fcmp pred lhs, rhs
    FCmp {
        result: TempId,
        predicate: FCmpPredicate,
        lhs: Value,
        rhs: Value,
    },

    /// Boolean to double: result = uitofp value
    UiToFp {
        result: TempId,
        value: Value,
    },

    /// Function call by name: result = call callee(args...)
    Call {
        result: TempId,
        callee: String,
        args: Vec<Value>,
    },

    /// Return: ret value
    Return(Value),

    /// Unconditional branch: br label
    Branch(LabelId),

    /// Conditional branch on a nonzero condition: br condition, true_label, false_label
    BranchCond {
        condition: Value,
        true_label: LabelId,
        false_label: LabelId,
    },
}

impl Instruction {
    /// Temp defined by this instruction
    pub fn result(&self) -> Option<TempId> {
        match self {
            Instruction::Alloca { result, .. }
            | Instruction::Load { result, .. }
            | Instruction::Binary { result, .. }
            | Instruction::FCmp { result, .. }
            | Instruction::UiToFp { result, .. }
            | Instruction::Call { result, .. } => Some(*result),
            Instruction::Store { .. }
            | Instruction::Return(_)
            | Instruction::Branch(_)
            | Instruction::BranchCond { .. } => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::Return(_) | Instruction::Branch(_) | Instruction::BranchCond { .. }
        )
    }

    pub fn successors(&self) -> Vec<LabelId> {
        match self {
            Instruction::Branch(label) => vec![*label],
            Instruction::BranchCond { true_label, false_label, .. } => vec![*true_label, *false_label],
            _ => Vec::new(),
        }
    }

    /// Value operands read by this instruction; stack slots are not included
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Instruction::Alloca { .. } | Instruction::Load { .. } | Instruction::Branch(_) => Vec::new(),
            Instruction::Store { value, .. } => vec![value],
            Instruction::Binary { lhs, rhs, .. } | Instruction::FCmp { lhs, rhs, .. } => vec![lhs, rhs],
            Instruction::UiToFp { value, .. } => vec![value],
            Instruction::Call { args, .. } => args.iter().collect(),
            Instruction::Return(value) => vec![value],
            Instruction::BranchCond { condition, .. } => vec![condition],
        }
    }

    pub fn operands_mut(&mut self) -> Vec<&mut Value> {
        match self {
            Instruction::Alloca { .. } | Instruction::Load { .. } | Instruction::Branch(_) => Vec::new(),
            Instruction::Store { value, .. } => vec![value],
            Instruction::Binary { lhs, rhs, .. } | Instruction::FCmp { lhs, rhs, .. } => vec![lhs, rhs],
            Instruction::UiToFp { value, .. } => vec![value],
            Instruction::Call { args, .. } => args.iter_mut().collect(),
            Instruction::Return(value) => vec![value],
            Instruction::BranchCond { condition, .. } => vec![condition],
        }
    }

    /// Stack slot accessed by a load or store
    pub fn slot(&self) -> Option<StackSlot> {
        match self {
            Instruction::Load { slot, .. } | Instruction::Store { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Alloca { result, name } => {
                write!(f, "%{result} = alloca double")?;
                if let Some(name) = name {
                    write!(f, "  ; {name}")?;
                }
                Ok(())
            }
            Instruction::Load { result, slot } => write!(f, "%{result} = load double, double* {slot}"),
            Instruction::Store { value, slot } => write!(f, "store double {value}, double* {slot}"),
            Instruction::Binary { result, op, lhs, rhs } => {
                write!(f, "%{result} = {op} double {lhs}, {rhs}")
            }
            Instruction::FCmp { result, predicate, lhs, rhs } => {
                write!(f, "%{result} = fcmp {predicate} double {lhs}, {rhs}")
            }
            Instruction::UiToFp { result, value } => write!(f, "%{result} = uitofp i1 {value} to double"),
            Instruction::Call { result, callee, args } => {
                write!(f, "%{result} = call double @{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "double {arg}")?;
                }
                write!(f, ")")
            }
            Instruction::Return(value) => write!(f, "ret double {value}"),
            Instruction::Branch(label) => write!(f, "br label %L{label}"),
            Instruction::BranchCond { condition, true_label, false_label } => {
                write!(f, "br i1 {condition}, label %L{true_label}, label %L{false_label}")
            }
        }
    }
}

//! VM error types

use kal_common::{CompilerError, LabelId, TempId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VmError {
    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("Call depth limit of {limit} exceeded")]
    CallDepthExceeded { limit: usize },

    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{name}' expects {expected} arguments, given {given}")]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },

    #[error("Temp %{temp} used before definition in '{function}'")]
    UndefinedTemp { function: String, temp: TempId },

    #[error("Invalid stack slot %{slot} in '{function}'")]
    InvalidSlot { function: String, slot: TempId },

    #[error("Block L{block} in '{function}' has no terminator")]
    MissingTerminator { function: String, block: LabelId },

    #[error("Unknown block L{block} in '{function}'")]
    UnknownBlock { function: String, block: LabelId },

    #[error("Output error: {0}")]
    Io(String),
}

impl From<std::io::Error> for VmError {
    fn from(err: std::io::Error) -> Self {
        VmError::Io(err.to_string())
    }
}

impl From<VmError> for CompilerError {
    fn from(err: VmError) -> Self {
        CompilerError::runtime_error(err.to_string())
    }
}

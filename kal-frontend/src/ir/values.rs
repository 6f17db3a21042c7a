//! IR Value Representations
//!
//! Every value in the IR is a double. Comparison results (`i1` in the
//! text form) are carried as 0.0 or 1.0.

use kal_common::TempId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// IR Value - represents operands in IR instructions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Temporary produced by an instruction or a parameter
    Temp(TempId),

    /// Constant double
    Constant(f64),
}

impl Value {
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Value::Constant(value) => Some(*value),
            Value::Temp(_) => None,
        }
    }

    pub fn as_temp(&self) -> Option<TempId> {
        match self {
            Value::Temp(id) => Some(*id),
            Value::Constant(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Temp(id) => write!(f, "%{id}"),
            Value::Constant(val) => write!(f, "{val:?}"),
        }
    }
}

/// Handle to a stack slot created by `alloca`; the id is the alloca's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackSlot(pub TempId);

impl StackSlot {
    pub fn id(&self) -> TempId {
        self.0
    }
}

impl fmt::Display for StackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

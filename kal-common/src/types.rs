//! Identifier aliases shared by the frontend IR and the VM.

/// Label identifier for basic blocks
pub type LabelId = u32;

/// Temporary (virtual register) identifier for IR
pub type TempId = u32;

//! Intermediate Representation for Kaleido
//!
//! A small basic-block IR in the style of LLVM, restricted to doubles. The
//! lowering engine in `codegen` drives it through `IrBuilder`; the VM
//! executes the finished `Module`.
//!
//! ## Architecture
//!
//! - `values` - Value and stack-slot representations
//! - `ops` - Float arithmetic and comparison predicates
//! - `instructions` - IR instructions
//! - `blocks` - Basic block management
//! - `function` - Function definitions and declarations
//! - `module` - Module (compilation unit)
//! - `builder` - IR construction with an insertion point
//! - `verify` - Structural checks on finished functions
//! - `passes` - Per-function optimization passes

// Public exports - clean API surface
pub use self::values::{StackSlot, Value};
pub use self::ops::{FCmpPredicate, IrBinaryOp};
pub use self::instructions::Instruction;
pub use self::blocks::BasicBlock;
pub use self::function::Function;
pub use self::module::Module;
pub use self::builder::IrBuilder;
pub use self::verify::verify_function;
pub use self::passes::{run_function_passes, ConstantFolding, FunctionPass, PassManager, RemoveUnreachableBlocks};

// Internal modules
mod values;
mod ops;
mod instructions;
mod blocks;
mod function;
mod module;
mod builder;
mod verify;
mod passes;

#[cfg(test)]
mod tests;

//! Abstract Syntax Tree definitions
//!
//! The AST is built by the parser and consumed read-only by the lowering
//! engine in `codegen`.

pub mod ops;
pub mod expressions;
pub mod items;
mod display;

pub use ops::BinaryOp;
pub use expressions::{Expression, ExpressionKind, VarBinding};
pub use items::{FunctionDefinition, Program, Prototype, TopLevelItem};

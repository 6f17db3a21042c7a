//! Code generation from AST to IR
//!
//! `CodeGenerator` is the lowering context: it owns the IR builder (and
//! through it the module), the scope stack and the function registry, and
//! is threaded by `&mut` through every lowering call. Lowering is
//! fail-fast; a function whose body fails is removed from the module.

mod errors;
mod scope;
mod registry;
mod expressions;
mod control_flow;
mod function_gen;

pub use errors::LoweringError;
pub use scope::{ScopeStack, Shadowed};
pub use registry::{FunctionRegistry, FunctionState};

use crate::ir::{IrBuilder, Module};

/// Name of the zero-argument function a top-level expression is lowered into
pub const ANON_EXPR_NAME: &str = "__anon_expr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Run the per-function passes after each body
    pub optimize: bool,
    /// Verify each body before optimizing it
    pub verify: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self { optimize: true, verify: true }
    }
}

/// A function present in the module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHandle {
    pub name: String,
    pub arity: usize,
}

impl FunctionHandle {
    pub fn new(name: &str, arity: usize) -> Self {
        Self { name: name.to_string(), arity }
    }
}

pub struct CodeGenerator {
    pub(crate) builder: IrBuilder,
    pub(crate) scopes: ScopeStack,
    pub(crate) registry: FunctionRegistry,
    options: CodegenOptions,
}

impl CodeGenerator {
    pub fn new(module_name: &str) -> Self {
        Self::with_options(module_name, CodegenOptions::default())
    }

    pub fn with_options(module_name: &str, options: CodegenOptions) -> Self {
        Self {
            builder: IrBuilder::new(module_name),
            scopes: ScopeStack::new(),
            registry: FunctionRegistry::new(),
            options,
        }
    }

    pub fn options(&self) -> CodegenOptions {
        self.options
    }

    pub fn module(&self) -> &Module {
        self.builder.module()
    }

    pub fn into_module(self) -> Module {
        self.builder.into_module()
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Run `lower` with a fresh shadow set and restore every binding it
    /// recorded afterwards, whether or not it succeeded
    pub(crate) fn with_bindings<T>(
        &mut self,
        lower: impl FnOnce(&mut Self, &mut Shadowed) -> Result<T, LoweringError>,
    ) -> Result<T, LoweringError> {
        let mut shadowed = Shadowed::new();
        let result = lower(self, &mut shadowed);
        self.scopes.restore_all(shadowed);
        result
    }
}

//! Known function signatures by name
//!
//! The registry remembers every prototype seen so far, so a call can name a
//! function whose declaration is no longer (or not yet) in the module. Each
//! name moves `Unknown -> Declared -> Defined`; a failed body drops it back
//! to `Declared`.

use std::collections::HashMap;
use kal_common::SourceLocation;
use crate::ast::Prototype;
use crate::codegen::{FunctionHandle, LoweringError};
use crate::ir::IrBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionState {
    Unknown,
    Declared,
    Defined,
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    prototypes: HashMap<String, Prototype>,
    states: HashMap<String, FunctionState>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a prototype; the last registration for a name wins
    pub fn declare_prototype(&mut self, proto: Prototype) {
        self.states
            .entry(proto.name.clone())
            .or_insert(FunctionState::Declared);
        self.prototypes.insert(proto.name.clone(), proto);
    }

    pub fn prototype(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }

    pub fn state(&self, name: &str) -> FunctionState {
        self.states.get(name).copied().unwrap_or(FunctionState::Unknown)
    }

    pub(crate) fn mark_defined(&mut self, name: &str) {
        self.states.insert(name.to_string(), FunctionState::Defined);
    }

    pub(crate) fn mark_declared(&mut self, name: &str) {
        if let Some(state) = self.states.get_mut(name) {
            *state = FunctionState::Declared;
        }
    }

    /// Drop every trace of `name`
    pub(crate) fn forget(&mut self, name: &str) {
        self.prototypes.remove(name);
        self.states.remove(name);
    }

    /// Find a callable function: the module's own entry first, otherwise a
    /// declaration materialized from the stored prototype
    pub fn resolve(
        &self,
        builder: &mut IrBuilder,
        name: &str,
        location: &SourceLocation,
    ) -> Result<FunctionHandle, LoweringError> {
        if let Some(function) = builder.module().get_function(name) {
            return Ok(FunctionHandle::new(name, function.arity()));
        }

        match self.prototypes.get(name) {
            Some(proto) => {
                let function = builder.declare_function(name, &proto.params)?;
                Ok(FunctionHandle::new(name, function.arity()))
            }
            None => Err(LoweringError::UnknownFunction {
                name: name.to_string(),
                location: location.clone(),
            }),
        }
    }
}

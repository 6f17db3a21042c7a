//! Function-level lowering: definitions, externs, top-level expressions

use std::collections::HashSet;
use log::{debug, trace, warn};
use crate::ast::{Expression, FunctionDefinition, Prototype};
use crate::codegen::{CodeGenerator, FunctionHandle, FunctionState, LoweringError, ANON_EXPR_NAME};
use crate::ir::{run_function_passes, verify_function, Value};

impl CodeGenerator {
    /// Declare an external function, or refresh an existing declaration
    pub fn declare_extern(&mut self, proto: &Prototype) -> Result<FunctionHandle, LoweringError> {
        if self.registry.state(&proto.name) == FunctionState::Defined {
            warn!("extern '{}' names a function that already has a body; keeping the body", proto.name);
            return self.registry.resolve(&mut self.builder, &proto.name, &proto.span.start);
        }

        self.registry.declare_prototype(proto.clone());
        let function = self.builder.declare_function(&proto.name, &proto.params)?;
        debug!("Declared extern {}", proto);
        Ok(FunctionHandle::new(&function.name, function.arity()))
    }

    /// Lower a function definition into the module
    pub fn lower_function(&mut self, function: &FunctionDefinition) -> Result<FunctionHandle, LoweringError> {
        let proto = &function.prototype;
        let name = proto.name.as_str();

        if self.registry.state(name) == FunctionState::Defined {
            return Err(LoweringError::Redefinition {
                name: name.to_string(),
                location: proto.span.start.clone(),
            });
        }

        let previous = self.registry.prototype(name).cloned();
        let was_declared = self.builder.module().get_function(name).is_some();

        // Materialize (or re-materialize) the declaration from this prototype
        self.registry.declare_prototype(proto.clone());
        self.builder.declare_function(name, &proto.params)?;

        match self.lower_function_body(function) {
            Ok(()) => {
                self.registry.mark_defined(name);
                debug!("Lowered function '{}'", name);
                Ok(FunctionHandle::new(name, proto.arity()))
            }
            Err(err) => {
                self.builder.finish_function();
                self.builder.module_mut().remove_function(name);
                self.restore_declaration(name, previous, was_declared)?;
                debug!("Discarded function '{}' after failed lowering", name);
                Err(err.within(format!("function '{name}'")))
            }
        }
    }

    /// Put back the prototype (and module declaration) a failed body replaced.
    /// Without an earlier prototype the failed one stays registered.
    fn restore_declaration(
        &mut self,
        name: &str,
        previous: Option<Prototype>,
        was_declared: bool,
    ) -> Result<(), LoweringError> {
        if let Some(previous) = previous {
            if was_declared {
                self.builder.declare_function(name, &previous.params)?;
            }
            self.registry.declare_prototype(previous);
        }
        self.registry.mark_declared(name);
        Ok(())
    }

    fn lower_function_body(&mut self, function: &FunctionDefinition) -> Result<(), LoweringError> {
        let name = function.name();
        self.builder.begin_function(name)?;
        self.scopes.clear();

        let params = self.builder.parameters()?;
        let mut seen = HashSet::new();
        for (_, param) in &params {
            if !seen.insert(param.as_str()) {
                warn!("Function '{}' repeats parameter '{}'; the later one shadows", name, param);
            }
        }

        let ret = self.with_bindings(|gen, shadowed| {
            for (temp, param) in &params {
                let slot = gen.builder.build_alloca(Some(param.as_str()))?;
                gen.builder.build_store(Value::Temp(*temp), slot)?;
                shadowed.bind(&mut gen.scopes, param, slot);
            }
            gen.lower_expression(&function.body)
        })?;

        self.builder.build_return(ret)?;
        self.builder.finish_function();

        let options = self.options();
        let module = self.builder.module();
        let lowered = module
            .get_function(name)
            .ok_or_else(|| format!("Function '{name}' missing after lowering"))?;
        trace!("Lowered IR before passes:\n{}", lowered);
        if options.verify {
            verify_function(module, lowered)?;
        }
        if options.optimize {
            if let Some(lowered) = self.builder.module_mut().get_function_mut(name) {
                run_function_passes(lowered);
            }
        }
        Ok(())
    }

    /// Lower a bare expression into the zero-argument `__anon_expr`,
    /// replacing any previous one
    pub fn lower_top_level_expression(&mut self, expr: &Expression) -> Result<FunctionHandle, LoweringError> {
        self.discard_function(ANON_EXPR_NAME);

        let mut prototype = Prototype::new(ANON_EXPR_NAME, &[]);
        prototype.span = expr.span.clone();
        let result = self.lower_function(&FunctionDefinition::new(prototype, expr.clone()));
        if result.is_err() {
            self.registry.forget(ANON_EXPR_NAME);
        }
        result
    }

    /// Remove a function from the module and forget its prototype
    pub fn discard_function(&mut self, name: &str) -> bool {
        let removed = self.builder.module_mut().remove_function(name).is_some();
        let known = self.registry.state(name) != FunctionState::Unknown;
        self.registry.forget(name);
        removed || known
    }
}

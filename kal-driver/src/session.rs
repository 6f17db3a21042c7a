//! Incremental compile-and-run session
//!
//! Definitions and externs persist across chunks. Each top-level
//! expression is lowered into `__anon_expr`, run, then discarded.

use kal_common::{CompilerError, ErrorReporter};
use kal_frontend::ir::Module;
use kal_frontend::{CodeGenerator, CodegenOptions, Frontend, TopLevelItem, ANON_EXPR_NAME};
use kal_vm::{Vm, VmConfig};
use log::debug;

/// Result of one top-level item
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Defined { name: String, ir: String },
    Declared { name: String, ir: String },
    Evaluated { value: f64, ir: String },
    /// Top-level expression lowered but not run
    Lowered { ir: String },
    Failed,
}

pub struct Session {
    codegen: CodeGenerator,
    vm: Vm,
    reporter: ErrorReporter,
    execute: bool,
}

impl Session {
    pub fn new(module_name: &str, options: CodegenOptions, config: VmConfig) -> Self {
        Self {
            codegen: CodeGenerator::with_options(module_name, options),
            vm: Vm::with_config(config),
            reporter: ErrorReporter::new(),
            execute: true,
        }
    }

    /// Session that lowers top-level expressions without running them; the
    /// last one stays in the module
    pub fn compile_only(module_name: &str, options: CodegenOptions) -> Self {
        Self {
            execute: false,
            ..Self::new(module_name, options, VmConfig::default())
        }
    }

    pub fn module(&self) -> &Module {
        self.codegen.module()
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut ErrorReporter {
        &mut self.reporter
    }

    /// Compile and run every item of `source` in order. A chunk that fails
    /// to parse is reported as a whole; a failing item does not stop the
    /// items after it.
    pub fn eval_source(&mut self, source: &str) -> Vec<Outcome> {
        let program = match Frontend::parse_source(source) {
            Ok(program) => program,
            Err(err) => {
                self.reporter.report(&err);
                return vec![Outcome::Failed];
            }
        };

        program
            .items
            .iter()
            .map(|item| match self.eval_item(item) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.reporter.report(&err);
                    Outcome::Failed
                }
            })
            .collect()
    }

    fn eval_item(&mut self, item: &TopLevelItem) -> Result<Outcome, CompilerError> {
        match item {
            TopLevelItem::Function(func) => {
                let handle = self.codegen.lower_function(func)?;
                Ok(Outcome::Defined { ir: self.function_ir(&handle.name), name: handle.name })
            }
            TopLevelItem::Extern(proto) => {
                let handle = self.codegen.declare_extern(proto)?;
                if !self.vm.natives().contains(&handle.name) {
                    self.reporter
                        .warning(format!("extern '{}' has no native implementation", handle.name), proto.span.clone())
                        .notes
                        .push(format!("calls fail at runtime unless '{}' is defined later", handle.name));
                }
                Ok(Outcome::Declared { ir: self.function_ir(&handle.name), name: handle.name })
            }
            TopLevelItem::Expression(expr) => {
                self.codegen.lower_top_level_expression(expr)?;
                let ir = self.function_ir(ANON_EXPR_NAME);
                if !self.execute {
                    return Ok(Outcome::Lowered { ir });
                }

                let result = self.vm.call(self.codegen.module(), ANON_EXPR_NAME, &[]);
                self.codegen.discard_function(ANON_EXPR_NAME);
                let value = result?;
                debug!("Top-level expression evaluated to {} in {} steps", value, self.vm.steps());
                Ok(Outcome::Evaluated { value, ir })
            }
        }
    }

    fn function_ir(&self, name: &str) -> String {
        self.codegen
            .module()
            .get_function(name)
            .map(|f| f.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new("session", CodegenOptions::default(), VmConfig::default())
    }

    fn values(outcomes: &[Outcome]) -> Vec<Option<f64>> {
        outcomes
            .iter()
            .map(|o| match o {
                Outcome::Evaluated { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_definitions_persist_across_chunks() {
        let mut session = session();
        let first = session.eval_source("def double(x) x * 2");
        assert!(matches!(&first[0], Outcome::Defined { name, .. } if name == "double"));

        let second = session.eval_source("double(4); double(double(1))");
        assert_eq!(values(&second), vec![Some(8.0), Some(4.0)]);
        assert!(session.module().get_function(ANON_EXPR_NAME).is_none());
        assert!(!session.reporter().has_errors());
    }

    #[test]
    fn test_failures_are_reported_and_skipped() {
        let mut session = session();
        let outcomes = session.eval_source("def f(x) y\nf(1)\ndef g(x) x + 1\ng(1)");

        assert_eq!(outcomes[0], Outcome::Failed);
        assert!(matches!(outcomes[2], Outcome::Defined { .. }));
        assert_eq!(values(&outcomes)[3], Some(2.0));
        // f keeps its prototype, but nothing callable was ever defined for it
        assert_eq!(outcomes[1], Outcome::Failed);
        assert_eq!(session.reporter().error_count(), 2);
    }

    #[test]
    fn test_parse_error_fails_whole_chunk() {
        let mut session = session();
        let outcomes = session.eval_source("def (x) x");
        assert_eq!(outcomes, vec![Outcome::Failed]);
        assert_eq!(session.reporter().error_count(), 1);
    }

    #[test]
    fn test_runtime_error_discards_expression() {
        let config = VmConfig { max_steps: 100, ..VmConfig::default() };
        let mut session = Session::new("session", CodegenOptions::default(), config);
        let outcomes = session.eval_source("while 1 in 0");

        assert_eq!(outcomes, vec![Outcome::Failed]);
        assert!(session.module().get_function(ANON_EXPR_NAME).is_none());
        let message = &session.reporter().diagnostics()[0].message;
        assert!(message.contains("Step limit"), "{message}");
    }

    #[test]
    fn test_extern_without_native_warns() {
        let mut session = session();
        let outcomes = session.eval_source("extern sqrt(x)\nextern helper(x)");
        assert!(matches!(&outcomes[1], Outcome::Declared { name, .. } if name == "helper"));

        let reporter = session.reporter();
        assert!(!reporter.has_errors());
        assert_eq!(reporter.warning_count(), 1);
        let diagnostic = &reporter.diagnostics()[0];
        assert_eq!(diagnostic.message, "extern 'helper' has no native implementation");
        assert_eq!(diagnostic.notes.len(), 1);
    }

    #[test]
    fn test_compile_only_keeps_last_expression() {
        let mut session = Session::compile_only("session", CodegenOptions::default());
        let outcomes = session.eval_source("extern sin(x)\nsin(1)\n2 + 2");

        assert!(matches!(&outcomes[0], Outcome::Declared { ir, .. } if ir.starts_with("declare double @sin")));
        assert!(matches!(outcomes[2], Outcome::Lowered { .. }));
        let anon = session.module().get_function(ANON_EXPR_NAME).unwrap();
        assert_eq!(anon.to_string(), "define double @__anon_expr() {\nL0:  ; entry\n  ret double 4.0\n}\n");
    }
}

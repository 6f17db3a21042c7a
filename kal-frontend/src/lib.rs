//! Kaleido - Frontend
//!
//! This crate provides the frontend components for the Kaleido language:
//! - Lexer: tokenizes source text
//! - Parser: builds the AST from tokens
//! - AST: expression and item definitions
//! - IR: basic-block intermediate representation, verifier and passes
//! - Codegen: lowers the AST into IR

pub mod lexer;
pub mod parser;
pub mod ast;
pub mod ir;
pub mod codegen;

pub use lexer::{Lexer, Token, TokenType};
pub use parser::{Parser, ParseError};
pub use ast::{
    BinaryOp, Expression, ExpressionKind, FunctionDefinition, Program, Prototype, TopLevelItem,
    VarBinding,
};
pub use codegen::{CodeGenerator, CodegenOptions, FunctionHandle, LoweringError, ANON_EXPR_NAME};

use kal_common::CompilerError;
use crate::ir::Module;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse source code into an AST
    pub fn parse_source(source: &str) -> Result<Program, CompilerError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;

        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    /// Compile source code to an IR module
    ///
    /// Stops at the first item that fails. Each top-level expression
    /// replaces the previous `__anon_expr`, so only the last one remains.
    pub fn compile_to_ir(source: &str, module_name: &str) -> Result<Module, CompilerError> {
        let program = Self::parse_source(source)?;
        let mut codegen = CodeGenerator::new(module_name);

        for item in &program.items {
            match item {
                TopLevelItem::Function(func) => codegen.lower_function(func)?,
                TopLevelItem::Extern(proto) => codegen.declare_extern(proto)?,
                TopLevelItem::Expression(expr) => codegen.lower_top_level_expression(expr)?,
            };
        }

        Ok(codegen.into_module())
    }

    /// Tokenize source code (for debugging)
    pub fn tokenize_source(source: &str) -> Result<Vec<Token>, CompilerError> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_parse_simple_function() {
        let source = r#"
# add two numbers
def add(a, b)
    a + b
"#;

        let program = Frontend::parse_source(source).unwrap();
        assert_eq!(program.items.len(), 1);

        match &program.items[0] {
            TopLevelItem::Function(func) => {
                assert_eq!(func.name(), "add");
                assert_eq!(func.prototype.arity(), 2);
            }
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_frontend_tokenize() {
        let tokens = Frontend::tokenize_source("var x = 42;").unwrap();

        // var, x, =, 42, ;, EOF
        assert_eq!(tokens.len(), 6);
        assert!(matches!(tokens[0].token_type, TokenType::Var));
        assert!(matches!(tokens[1].token_type, TokenType::Identifier(_)));
        assert!(tokens[2].token_type.is_char('='));
        assert!(matches!(tokens[3].token_type, TokenType::Number(n) if n == 42.0));
        assert!(tokens[4].token_type.is_char(';'));
        assert!(matches!(tokens[5].token_type, TokenType::EndOfFile));
    }

    #[test]
    fn test_frontend_compile_to_ir() {
        let module = Frontend::compile_to_ir("extern sin(x)\ndef f(x) sin(x) * 2\nf(1)", "test").unwrap();
        assert_eq!(module.name, "test");
        assert!(module.get_function("sin").is_some_and(|f| f.is_declaration()));
        assert!(module.get_function("f").is_some_and(|f| !f.is_declaration()));
        assert!(module.get_function(ANON_EXPR_NAME).is_some());
    }

    #[test]
    fn test_frontend_reports_first_error() {
        let err = Frontend::compile_to_ir("def f(x) y", "test").unwrap_err();
        assert!(matches!(err, CompilerError::CodegenError { .. }));

        let err = Frontend::compile_to_ir("def (x) y", "test").unwrap_err();
        assert!(matches!(err, CompilerError::ParseError { .. }));
    }
}

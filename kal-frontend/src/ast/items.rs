//! Top-level AST nodes: prototypes, function definitions, programs

use super::expressions::Expression;
use kal_common::SourceSpan;
use serde::{Deserialize, Serialize};

/// Function name plus parameter names; on its own it is an extern or
/// forward declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
    pub span: SourceSpan,
}

impl Prototype {
    pub fn new(name: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            span: SourceSpan::dummy(),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// `def name(params) body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub prototype: Prototype,
    pub body: Expression,
}

impl FunctionDefinition {
    pub fn new(prototype: Prototype, body: Expression) -> Self {
        Self { prototype, body }
    }

    pub fn name(&self) -> &str {
        &self.prototype.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopLevelItem {
    Function(FunctionDefinition),
    Extern(Prototype),
    /// Bare expression, evaluated immediately
    Expression(Expression),
}

/// A parsed source file or REPL chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub items: Vec<TopLevelItem>,
    pub span: SourceSpan,
}

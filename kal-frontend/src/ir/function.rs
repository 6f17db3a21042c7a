//! Function Definitions
//!
//! A function with no blocks is a declaration (an extern or a prototype
//! whose body has not been lowered yet).

use kal_common::{LabelId, TempId};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::ir::BasicBlock;

/// Function in IR; every parameter and the return value are doubles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Incoming temp and source name of each parameter, in order
    pub parameters: Vec<(TempId, String)>,
    pub blocks: Vec<BasicBlock>,
    /// Next unused temp id
    pub next_temp: TempId,
}

impl Function {
    /// Declaration whose parameters take temps `0..params.len()`
    pub fn new(name: &str, params: &[String]) -> Self {
        let parameters: Vec<(TempId, String)> = params
            .iter()
            .enumerate()
            .map(|(i, p)| (i as TempId, p.clone()))
            .collect();
        Self {
            name: name.to_string(),
            next_temp: parameters.len() as TempId,
            parameters,
            blocks: Vec::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn new_temp(&mut self) -> TempId {
        let temp = self.next_temp;
        self.next_temp += 1;
        temp
    }

    pub fn add_block(&mut self, block: BasicBlock) {
        self.blocks.push(block);
    }

    pub fn get_block(&self, id: LabelId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn get_block_mut(&mut self, id: LabelId) -> Option<&mut BasicBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn entry_block_mut(&mut self) -> Option<&mut BasicBlock> {
        self.blocks.first_mut()
    }

    /// Drop the body, turning the function back into a declaration
    pub fn clear_body(&mut self) {
        self.blocks.clear();
        self.next_temp = self.parameters.len() as TempId;
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_declaration() { "declare" } else { "define" };
        write!(f, "{keyword} double @{}(", self.name)?;
        for (i, (temp, _)) in self.parameters.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "double %{temp}")?;
        }
        write!(f, ")")?;

        if !self.is_declaration() {
            write!(f, " {{")?;
        }
        if !self.parameters.is_empty() {
            let names: Vec<&str> = self.parameters.iter().map(|(_, name)| name.as_str()).collect();
            write!(f, "  ; {}", names.join(", "))?;
        }
        writeln!(f)?;
        if self.is_declaration() {
            return Ok(());
        }

        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        writeln!(f, "}}")
    }
}

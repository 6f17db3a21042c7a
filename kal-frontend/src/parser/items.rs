//! Top-level item parsing: definitions, externs, bare expressions

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use kal_common::{CompilerError, SourceSpan};

impl Parser {
    /// Parse one top-level item
    pub fn parse_top_level_item(&mut self) -> Result<TopLevelItem, CompilerError> {
        match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Def) => Ok(TopLevelItem::Function(self.parse_definition()?)),
            Some(TokenType::Extern) => {
                self.advance();
                Ok(TopLevelItem::Extern(self.parse_prototype()?))
            }
            _ => Ok(TopLevelItem::Expression(self.parse_expression()?)),
        }
    }

    /// `def prototype expression`
    pub fn parse_definition(&mut self) -> Result<FunctionDefinition, CompilerError> {
        self.expect(TokenType::Def, "function definition")?;
        let prototype = self.parse_prototype()?;
        let body = self.parse_expression()?;
        Ok(FunctionDefinition::new(prototype, body))
    }

    /// `name(a, b)`; the commas between parameters are optional
    pub fn parse_prototype(&mut self) -> Result<Prototype, CompilerError> {
        let start_location = self.current_location();
        let name = self.expect_identifier("prototype")?;
        self.expect_char('(', "prototype")?;

        let mut params = Vec::new();
        while !self.match_char(')') {
            if !params.is_empty() {
                self.match_char(',');
            }
            params.push(self.expect_identifier("parameter list")?);
        }

        Ok(Prototype {
            name,
            params,
            span: SourceSpan::new(start_location, self.last_end.clone()),
        })
    }
}

//! Token definitions for the Kaleido lexer

use kal_common::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kaleido token types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenType {
    // Literals
    Number(f64),

    Identifier(String),

    // Keywords
    Def, Extern,
    If, Then, Else,
    For, In, While,
    Var,

    /// Any other single character: operators, parens, commas, semicolons
    Char(char),

    EndOfFile,
}

impl TokenType {
    pub fn is_char(&self, expected: char) -> bool {
        matches!(self, TokenType::Char(c) if *c == expected)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Number(n) => write!(f, "{n}"),
            TokenType::Identifier(s) => write!(f, "{s}"),
            TokenType::Def => write!(f, "def"),
            TokenType::Extern => write!(f, "extern"),
            TokenType::If => write!(f, "if"),
            TokenType::Then => write!(f, "then"),
            TokenType::Else => write!(f, "else"),
            TokenType::For => write!(f, "for"),
            TokenType::In => write!(f, "in"),
            TokenType::While => write!(f, "while"),
            TokenType::Var => write!(f, "var"),
            TokenType::Char(c) => write!(f, "'{c}'"),
            TokenType::EndOfFile => write!(f, "EOF"),
        }
    }
}

/// A token with location information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(token_type: TokenType, span: SourceSpan) -> Self {
        Self { token_type, span }
    }

    pub fn eof(location: SourceLocation) -> Self {
        Self {
            token_type: TokenType::EndOfFile,
            span: SourceSpan::from_location(location),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.token_type, self.span.start)
    }
}

//! Kaleido Lexer
//!
//! Tokenizes source text into a stream of tokens. Keywords, identifiers and
//! numbers get their own token types; every other non-whitespace character
//! is passed through as `TokenType::Char` and interpreted by the parser.
//! `#` starts a comment that runs to the end of the line.

pub mod token;

pub use token::{Token, TokenType};

use kal_common::{CompilerError, SourceLocation, SourceSpan};
use std::collections::HashMap;

/// Kaleido Lexer
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    filename: String,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::with_filename(input, "<input>")
    }

    pub fn with_filename(input: &str, filename: &str) -> Self {
        let keywords = [
            ("def", TokenType::Def),
            ("extern", TokenType::Extern),
            ("if", TokenType::If),
            ("then", TokenType::Then),
            ("else", TokenType::Else),
            ("for", TokenType::For),
            ("in", TokenType::In),
            ("while", TokenType::While),
            ("var", TokenType::Var),
        ]
        .into_iter()
        .collect();

        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            filename: filename.to_string(),
            keywords,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(&self.filename, self.line, self.column)
    }

    /// Skip whitespace and `#` comments
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(c) = self.advance() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn tokenize_identifier(&mut self) -> TokenType {
        let mut identifier = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match self.keywords.get(identifier.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenType::Identifier(identifier),
        }
    }

    fn tokenize_number(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() || ch == '.' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        text.parse::<f64>()
            .map(TokenType::Number)
            .map_err(|_| CompilerError::lexer_error(format!("Invalid number literal '{text}'"), start))
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_trivia();

        let start_location = self.current_location();

        let token_type = match self.current_char() {
            None => return Ok(Token::eof(start_location)),
            Some(ch) if ch.is_alphabetic() => self.tokenize_identifier(),
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.tokenize_number()?,
            Some(ch) => {
                self.advance();
                TokenType::Char(ch)
            }
        };

        Ok(Token::new(token_type, SourceSpan::new(start_location, self.current_location())))
    }

    /// Tokenize the whole input; the last token is always `EndOfFile`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.token_type == TokenType::EndOfFile;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

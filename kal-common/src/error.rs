//! Error handling for the Kaleido compiler
//!
//! This module defines common error types and error reporting utilities
//! used throughout the compiler.

use crate::source_loc::{SourceLocation, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Lexical error at {location}: {message}")]
    LexError {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("Code generation error at {location}: {message}")]
    CodegenError {
        location: SourceLocation,
        message: String,
    },

    #[error("Runtime error: {message}")]
    RuntimeError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with location and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: SourceSpan,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: String, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn warning(message: String, span: SourceSpan) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        Ok(())
    }
}

/// Error reporter for collecting and displaying diagnostics
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
        }
    }

    /// Report an error diagnostic
    pub fn error(&mut self, message: String, span: SourceSpan) -> &mut Diagnostic {
        self.error_count += 1;
        self.push(Diagnostic::error(message, span))
    }

    /// Report a warning diagnostic
    pub fn warning(&mut self, message: String, span: SourceSpan) -> &mut Diagnostic {
        self.warning_count += 1;
        self.push(Diagnostic::warning(message, span))
    }

    /// Report a compiler error, using its location when it has one
    pub fn report(&mut self, err: &CompilerError) -> &mut Diagnostic {
        let span = err
            .location()
            .cloned()
            .map(SourceSpan::from_location)
            .unwrap_or_else(SourceSpan::dummy);
        self.error(err.to_string(), span)
    }

    fn push(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        self.diagnostics.push(diagnostic);
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (e, 0) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (e, w) => format!(
                "{} error{} and {} warning{}",
                e,
                if e == 1 { "" } else { "s" },
                w,
                if w == 1 { "" } else { "s" }
            ),
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerError {
    pub fn lexer_error(message: String, location: SourceLocation) -> Self {
        CompilerError::LexError { location, message }
    }

    pub fn parse_error(message: String, location: SourceLocation) -> Self {
        CompilerError::ParseError { location, message }
    }

    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::CodegenError { location, message }
    }

    pub fn runtime_error(message: String) -> Self {
        CompilerError::RuntimeError { message }
    }

    /// Source location of the error, if the phase that raised it had one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CompilerError::LexError { location, .. }
            | CompilerError::ParseError { location, .. }
            | CompilerError::CodegenError { location, .. } => Some(location),
            CompilerError::RuntimeError { .. }
            | CompilerError::IoError { .. }
            | CompilerError::InternalError { .. } => None,
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> SourceSpan {
        SourceSpan::new(
            SourceLocation::new("test.kal", 1, 1),
            SourceLocation::new("test.kal", 1, 5),
        )
    }

    #[test]
    fn test_diagnostic_with_notes() {
        let mut diag = Diagnostic::error("Test error".to_string(), span());
        diag.notes.push("first".to_string());
        diag.notes.push("second".to_string());

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.notes, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(format!("{}", diag), "error: Test error\n  note: first\n  note: second");
    }

    #[test]
    fn test_error_reporter_counts() {
        let mut reporter = ErrorReporter::new();
        assert!(!reporter.has_errors());
        assert_eq!(reporter.summary(), "No errors or warnings");

        reporter.error("Error 1".to_string(), span());
        assert_eq!(reporter.summary(), "1 error");

        reporter.error("Error 2".to_string(), span());
        reporter.warning("Warning 1".to_string(), span());
        assert_eq!(reporter.error_count(), 2);
        assert_eq!(reporter.warning_count(), 1);
        assert_eq!(reporter.summary(), "2 errors and 1 warning");

        reporter.clear();
        assert!(!reporter.has_errors());
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_report_uses_error_location() {
        let mut reporter = ErrorReporter::new();
        let err = CompilerError::parse_error(
            "Expected ')'".to_string(),
            SourceLocation::new("test.kal", 3, 7),
        );
        let diag = reporter.report(&err);
        assert_eq!(diag.span.start.line, 3);
        assert_eq!(diag.message, "Parse error at test.kal:3:7: Expected ')'");

        let runtime = CompilerError::runtime_error("step limit".to_string());
        assert!(runtime.location().is_none());
        assert!(reporter.report(&runtime).span.start.is_dummy());
        assert_eq!(reporter.error_count(), 2);
    }
}

//! Lowering error types

use kal_common::{CompilerError, SourceLocation};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoweringError {
    #[error("Unknown variable name '{name}' at {location}")]
    UnknownVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("Unknown function referenced '{name}' at {location}")]
    UnknownFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("Incorrect number of arguments passed to '{name}' at {location}: expected {expected}, given {given}")]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
        location: SourceLocation,
    },

    #[error("Destination of '=' must be a variable at {location}")]
    InvalidAssignmentTarget {
        location: SourceLocation,
    },

    #[error("Invalid binary operator '{op}' at {location}")]
    UnsupportedOperator {
        op: char,
        location: SourceLocation,
    },

    #[error("Function '{name}' cannot be redefined at {location}")]
    Redefinition {
        name: String,
        location: SourceLocation,
    },

    /// A child of `construct` failed to lower
    #[error("in {construct}: {source}")]
    Inner {
        construct: String,
        source: Box<LoweringError>,
    },

    #[error("Backend error: {0}")]
    Backend(String),
}

impl LoweringError {
    /// Wrap this error as the failure of a child of `construct`
    pub fn within(self, construct: impl Into<String>) -> Self {
        LoweringError::Inner {
            construct: construct.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, below every `Inner` wrapper
    pub fn root_cause(&self) -> &LoweringError {
        let mut err = self;
        while let LoweringError::Inner { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self.root_cause() {
            LoweringError::UnknownVariable { location, .. }
            | LoweringError::UnknownFunction { location, .. }
            | LoweringError::ArityMismatch { location, .. }
            | LoweringError::InvalidAssignmentTarget { location }
            | LoweringError::UnsupportedOperator { location, .. }
            | LoweringError::Redefinition { location, .. } => Some(location),
            LoweringError::Inner { .. } | LoweringError::Backend(_) => None,
        }
    }
}

impl From<String> for LoweringError {
    fn from(message: String) -> Self {
        LoweringError::Backend(message)
    }
}

impl From<LoweringError> for CompilerError {
    fn from(err: LoweringError) -> Self {
        if let LoweringError::Backend(_) = err.root_cause() {
            return CompilerError::InternalError { message: err.to_string() };
        }
        let location = err.location().cloned().unwrap_or_else(SourceLocation::dummy);
        CompilerError::codegen_error(err.to_string(), location)
    }
}

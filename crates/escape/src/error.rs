//! Escape parsing error types

use std::fmt;
use thiserror::Error;

/// Escape parsing result type
pub type EscapeResult<T> = Result<T, EscapeError>;

/// Location of an escape in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while turning an escape into a directive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("Escape '\\{code}' requires an argument")]
    MissingArgument { code: String },

    #[error("Invalid number '{value}' in escape '\\{code}'")]
    InvalidNumber { code: String, value: String },

    #[error("Escape '\\{code}' expects {expected} argument(s), got {found}")]
    ArgumentCount {
        code: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid font style '{value}' (expected b, i or n)")]
    InvalidFontStyle { value: String },
}

impl EscapeError {
    pub fn missing_argument(code: impl Into<String>) -> Self {
        Self::MissingArgument { code: code.into() }
    }

    pub fn invalid_number(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            code: code.into(),
            value: value.into(),
        }
    }

    /// The escape code this error refers to, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { code } => Some(code),
            Self::InvalidNumber { code, .. } => Some(code),
            Self::ArgumentCount { code, .. } => Some(code),
            Self::InvalidFontStyle { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::new(2, 7, 30);
        assert_eq!(format!("{}", loc), "2:7");
    }

    #[test]
    fn test_error_display() {
        let err = EscapeError::invalid_number("ITEM", "abc");
        assert_eq!(format!("{}", err), "Invalid number 'abc' in escape '\\ITEM'");
        assert_eq!(err.code(), Some("ITEM"));
    }
}

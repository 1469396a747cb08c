use crate::ast::SourceLocation;
use thiserror::Error;

/// The single error channel of the Konf pipeline.
///
/// Every variant aborts the phase it occurred in; no partial output is
/// ever produced alongside an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KonfError {
    #[error("unexpected character '{found}' at {location}")]
    Lex {
        found: char,
        location: SourceLocation,
    },
    #[error("expected {expected}, found {found} at {location}")]
    Syntax {
        expected: String,
        found: String,
        location: SourceLocation,
    },
    #[error("invalid number literal '{literal}' at {location}")]
    NumberFormat {
        literal: String,
        location: SourceLocation,
    },
    #[error("reference to undeclared constant '{name}' at {location}")]
    UnboundName {
        name: String,
        location: SourceLocation,
    },
}

impl KonfError {
    /// Stable tag for presenting the error without matching on variants
    pub fn kind(&self) -> &'static str {
        match self {
            KonfError::Lex { .. } => "LexError",
            KonfError::Syntax { .. } => "SyntaxError",
            KonfError::NumberFormat { .. } => "NumberFormatError",
            KonfError::UnboundName { .. } => "UnboundNameError",
        }
    }

    /// Source position the error refers to
    pub fn location(&self) -> &SourceLocation {
        match self {
            KonfError::Lex { location, .. }
            | KonfError::Syntax { location, .. }
            | KonfError::NumberFormat { location, .. }
            | KonfError::UnboundName { location, .. } => location,
        }
    }
}

pub type Result<T> = std::result::Result<T, KonfError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, column: usize, offset: usize) -> SourceLocation {
        SourceLocation {
            line,
            column,
            offset,
        }
    }

    #[test]
    fn test_kind_tags() {
        let lex = KonfError::Lex {
            found: '@',
            location: at(1, 1, 0),
        };
        let unbound = KonfError::UnboundName {
            name: "x".to_string(),
            location: at(2, 5, 9),
        };

        assert_eq!(lex.kind(), "LexError");
        assert_eq!(unbound.kind(), "UnboundNameError");
        assert_eq!(unbound.location().line, 2);
    }

    #[test]
    fn test_display_includes_position() {
        let err = KonfError::Syntax {
            expected: "'.'".to_string(),
            found: "'}'".to_string(),
            location: at(3, 14, 40),
        };

        assert_eq!(err.to_string(), "expected '.', found '}' at line 3, column 14");
    }
}

//! SSH config parse errors

use thiserror::Error;

/// Errors that can occur while decoding an SSH config file
///
/// Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `Host` directive without any patterns
    #[error("line {line}: Host directive requires at least one pattern")]
    EmptyHost { line: usize },

    /// Keyword with nothing after it
    #[error("line {line}: missing value for '{key}'")]
    MissingValue { line: usize, key: String },

    /// Opening double quote without a closing one
    #[error("line {line}: unterminated quoted string")]
    UnterminatedQuote { line: usize },

    /// `Match` blocks are not supported
    #[error("line {line}: Match directive is not supported")]
    UnsupportedMatch { line: usize },

    /// Host pattern could not be compiled
    #[error("line {line}: invalid host pattern '{pattern}': {reason}")]
    InvalidPattern {
        line: usize,
        pattern: String,
        reason: String,
    },
}

impl ParseError {
    /// Line the error was reported on
    pub fn line(&self) -> usize {
        match self {
            ParseError::EmptyHost { line }
            | ParseError::MissingValue { line, .. }
            | ParseError::UnterminatedQuote { line }
            | ParseError::UnsupportedMatch { line }
            | ParseError::InvalidPattern { line, .. } => *line,
        }
    }
}

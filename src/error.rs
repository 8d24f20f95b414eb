//! Error taxonomy shared by the lexer, parser, and evaluator.
//!
//! Each variant renders its wire-level name (`SyntaxError`, `TypeError`,
//! `NameError`, `ZeroDivisionError`) as a `Display` prefix, since host code
//! and tests match on that name rather than the Rust variant.

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
    Type {
        message: String,
        position: Option<(usize, usize)>,
    },
    Name {
        message: String,
        position: Option<(usize, usize)>,
    },
    ZeroDivision {
        message: String,
    },
}

impl RuntimeError {
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        RuntimeError::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::Type {
            message: message.into(),
            position: None,
        }
    }

    pub fn type_error_at(message: impl Into<String>, position: (usize, usize)) -> Self {
        RuntimeError::Type {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        RuntimeError::Name {
            message: message.into(),
            position: None,
        }
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        RuntimeError::ZeroDivision {
            message: message.into(),
        }
    }

    /// Fills in a source position for `Type`/`Name` errors raised without
    /// one (the value system has no notion of position; the evaluator
    /// attaches the offending node's position as the error unwinds).
    /// Errors that already carry a position, or don't have one to carry
    /// (`Syntax`, `ZeroDivision`), are returned unchanged.
    pub fn with_position(self, position: (usize, usize)) -> Self {
        match self {
            RuntimeError::Type { message, position: None } => RuntimeError::Type {
                message,
                position: Some(position),
            },
            RuntimeError::Name { message, position: None } => RuntimeError::Name {
                message,
                position: Some(position),
            },
            other => other,
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Syntax {
                message,
                line,
                column,
            } => write!(f, "SyntaxError: {message} ({line}:{column})"),
            RuntimeError::Type { message, position } => match position {
                Some((line, column)) => write!(f, "TypeError: {message} ({line}:{column})"),
                None => write!(f, "TypeError: {message}"),
            },
            RuntimeError::Name { message, position } => match position {
                Some((line, column)) => write!(f, "NameError: {message} ({line}:{column})"),
                None => write!(f, "NameError: {message}"),
            },
            RuntimeError::ZeroDivision { message } => write!(f, "ZeroDivisionError: {message}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

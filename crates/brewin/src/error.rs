//! The three user-visible error kinds plus an internal catch-all, and the
//! `BrewinError`/`Result` pair every evaluator operation reports through.

use std::fmt;

/// Error kinds reported through the host façade.
///
/// `Internal` is not one of the three user-visible kinds from the spec; it
/// covers AST-contract violations (a node missing a required attribute, an
/// unexpected element kind) that indicate the collaborator producing the
/// AST is broken, not that the Brewin program itself is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Name,
    Type,
    Fault,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "NAME",
            Self::Type => "TYPE",
            Self::Fault => "FAULT",
            Self::Internal => "INTERNAL",
        };
        write!(f, "{s}")
    }
}

/// A fatal, user-visible evaluation error. Errors are fatal: there is no
/// user-recoverable handler, so this is always the terminal `Err` of a
/// `run`/`eval` call, never caught and resumed from within the language.
#[derive(Debug, Clone)]
pub struct BrewinError {
    pub kind: ErrorKind,
    pub message: String,
}

impl BrewinError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Name, message)
    }

    pub fn type_(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fault, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for BrewinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for BrewinError {}

pub type Result<T> = std::result::Result<T, BrewinError>;

//! Error types for contract checking
//!
//! Every fallible check returns `Result<T, Error>`. The four variants never
//! overlap: misuse of the checking API, a bad call-chain depth, and the two
//! kinds of contract violation.

use thiserror::Error;

use crate::message::{Diagnostic, ViolationKind};

/// Contract engine error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The checking API itself was misused (bad constraint shape, bad name)
    #[error("Shape error: {0}")]
    Shape(String),

    /// Requested depth goes past the end of the active call chain
    #[error("Frame error: depth {depth} exceeds call chain of {available} frame(s)")]
    Frame { depth: usize, available: usize },

    /// An argument fell outside its declared constraint set
    #[error("{0}")]
    InputViolation(Diagnostic),

    /// A return value fell outside its declared constraint set
    #[error("{0}")]
    OutputViolation(Diagnostic),
}

/// Tag for selective handling of [`Error`] without matching payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Shape,
    Frame,
    InputViolation,
    OutputViolation,
}

impl Error {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Error::Shape(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Shape(_) => ErrorKind::Shape,
            Error::Frame { .. } => ErrorKind::Frame,
            Error::InputViolation(_) => ErrorKind::InputViolation,
            Error::OutputViolation(_) => ErrorKind::OutputViolation,
        }
    }

    /// The diagnostic carried by a contract violation, if this is one
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::InputViolation(d) | Error::OutputViolation(d) => Some(d),
            Error::Shape(_) | Error::Frame { .. } => None,
        }
    }

    /// True for input and output violations, false for API misuse
    pub fn is_violation(&self) -> bool {
        self.diagnostic().is_some()
    }
}

impl From<Diagnostic> for Error {
    fn from(diagnostic: Diagnostic) -> Self {
        match diagnostic.kind() {
            ViolationKind::Input => Error::InputViolation(diagnostic),
            ViolationKind::Output => Error::OutputViolation(diagnostic),
        }
    }
}

/// Result type alias for contract checks
pub type Result<T> = std::result::Result<T, Error>;

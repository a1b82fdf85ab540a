//! Errors raised while compiling path text and while mutating trees.
//!
//! Read-only operations never fail: a dead end in the tree simply
//! contributes no result. Only parsing and the mutating operations
//! (`set`, `del`, `modify`) return errors.

use std::fmt;

use thiserror::Error;

/// Malformed path or script text.
///
/// Parsing never recovers; no partial expression is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position} near '{near}'")]
pub struct ParseError {
    /// What went wrong
    pub message: String,
    /// Character offset into the input
    pub position: usize,
    /// Input text starting at `position`, truncated
    pub near: String,
}

/// The mutating operation that failed, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Set,
    Delete,
    Modify,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Set => write!(f, "set"),
            Operation::Delete => write!(f, "delete"),
            Operation::Modify => write!(f, "modify"),
        }
    }
}

/// A mutation could not be applied to the tree.
///
/// Mutations are not atomic: locations already changed by an earlier
/// wildcard, union, or descent branch stay changed when a later branch fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("can not {op} with an empty expression")]
    EmptyExpression { op: Operation },

    #[error("can not {op} with an expression ending with a {fragment}")]
    InvalidTarget {
        op: Operation,
        fragment: &'static str,
    },

    #[error("can not follow a {kind} at '{path}'")]
    CannotFollow { kind: &'static str, path: String },

    #[error("can not follow out of bounds array index at '{path}'")]
    OutOfBounds { path: String },

    #[error("can not deduce what element to add at '{path}'")]
    CannotDeduce { path: String },

    #[error("can not create more than one missing level at '{path}'")]
    TooDeep { path: String },
}

/// Errors from typed access through serde.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("conversion failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Path(#[from] PathError),
}

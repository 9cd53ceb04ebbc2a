//! Error types for table and switch functions.

use thiserror::Error;

/// Result type for function construction and binding.
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Errors raised while building or binding functions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FunctionError {
    /// A table or switch definition is not well formed.
    #[error("Malformed function {name}: {reason}")]
    Malformed { name: String, reason: String },

    /// A textual function name has no counterpart in the model.
    #[error("Unknown {kind} function name: {name}")]
    UnknownName { kind: &'static str, name: String },

    /// The same function was bound twice.
    #[error("Duplicate {kind} function: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// A function the model needs was never bound.
    #[error("Unbound {kind} function: {name}")]
    Unbound { kind: &'static str, name: String },

    /// A function was queried with an argument it cannot evaluate.
    #[error("Domain error in {name}: {what}")]
    Domain { name: String, what: String },
}

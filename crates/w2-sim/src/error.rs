//! Error types for simulation operations.

use thiserror::Error;

use crate::quantity::Quantity;

/// Errors encountered while configuring or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Malformed or incomplete configuration, detected before any step runs.
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    /// Arithmetic failure inside a step; the run is aborted.
    #[error("Domain error at step {step} computing {quantity}: {what}")]
    Domain {
        step: usize,
        quantity: Quantity,
        what: String,
    },

    /// An operation was attempted in the wrong phase.
    #[error("Sequencing error: expected {expected}, found {actual}")]
    Sequencing { expected: String, actual: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<w2_functions::FunctionError> for SimError {
    fn from(e: w2_functions::FunctionError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}

impl From<w2_core::CoreError> for SimError {
    fn from(e: w2_core::CoreError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}

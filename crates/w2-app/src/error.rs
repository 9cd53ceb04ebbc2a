//! Error types for the w2-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors so the CLI
/// has a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Model configuration failed: {0}")]
    Compile(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for w2-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<w2_scenario::ScenarioError> for AppError {
    fn from(err: w2_scenario::ScenarioError) -> Self {
        match err {
            w2_scenario::ScenarioError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Scenario(other.to_string()),
        }
    }
}

impl From<w2_scenario::ValidationError> for AppError {
    fn from(err: w2_scenario::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<w2_sim::SimError> for AppError {
    fn from(err: w2_sim::SimError) -> Self {
        match err {
            w2_sim::SimError::Configuration { .. } => AppError::Compile(err.to_string()),
            other => AppError::Simulation(other.to_string()),
        }
    }
}

impl From<w2_results::ResultsError> for AppError {
    fn from(err: w2_results::ResultsError) -> Self {
        match err {
            w2_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<w2_core::CoreError> for AppError {
    fn from(err: w2_core::CoreError) -> Self {
        AppError::Validation(err.to_string())
    }
}

//! Shared application service layer for World2 runs.
//!
//! Centralizes scenario handling, model configuration, cached execution,
//! result queries and parameter sweeps so the CLI stays a thin shell.

pub mod compile;
pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod scenario_service;
pub mod sweep;

pub use compile::compile_scenario;
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use query::{
    Mismatch, RunSummary, STANDARD_RUN_REFERENCE, compare_final, extract_record_series,
    extract_series, final_values, parse_quantities, summary,
};
pub use run_service::{
    ENGINE_VERSION, RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run,
    ensure_run_with_progress, execute, list_runs, load_run,
};
pub use scenario_service::{
    ScenarioSummary, load_preset, load_scenario, resolve_scenario, scenario_dir, summarize,
    validate_scenario_file, write_default_documents,
};
pub use sweep::{SweepOutcome, run_sweep};

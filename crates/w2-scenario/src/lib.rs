//! w2-scenario: scenario files, function documents and their validation.
//!
//! A scenario names a time horizon, model constants, initial conditions and
//! the table and switch documents to use. Resolving a scenario loads every
//! referenced document so the result is self-contained.

pub mod defaults;
pub mod documents;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use defaults::{Preset, default_function_set, default_switches, default_tables};
pub use documents::{SwitchEntry, SwitchValues, TRIGGER_KEY, TableDef, function_set};
pub use schema::{FunctionSource, ResolvedScenario, Scenario, TimeDef};
pub use validate::{ValidationError, validate_scenario};

use w2_functions::FunctionSet;

pub const LATEST_VERSION: u32 = 1;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Preset {name}: {what}")]
    Preset { name: String, what: String },

    #[error("Unsupported file extension: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ScenarioResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a scenario, choosing the format by extension (`.yaml`/`.yml` or
/// `.json`).
pub fn load_scenario(path: &Path) -> ScenarioResult<Scenario> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ScenarioError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

pub fn load_table_document(path: &Path) -> ScenarioResult<Vec<TableDef>> {
    let content = std::fs::read_to_string(path)?;
    Ok(documents::parse_table_document(&content)?)
}

pub fn save_table_document(path: &Path, tables: &[TableDef]) -> ScenarioResult<()> {
    let content = serde_json::to_string_pretty(tables)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_switch_document(path: &Path) -> ScenarioResult<Vec<SwitchEntry>> {
    let content = std::fs::read_to_string(path)?;
    Ok(documents::parse_switch_document(&content)?)
}

pub fn save_switch_document(path: &Path, switches: &[SwitchEntry]) -> ScenarioResult<()> {
    let content = serde_json::to_string_pretty(switches)?;
    std::fs::write(path, content)?;
    Ok(())
}

impl Scenario {
    /// Load every referenced document. Relative document paths resolve
    /// against `base_dir` when given.
    pub fn resolve(&self, base_dir: Option<&Path>) -> ScenarioResult<ResolvedScenario> {
        validate_scenario(self)?;

        let tables = match &self.tables {
            FunctionSource::Default => default_tables()?,
            FunctionSource::File { path } => {
                let path = resolve_path(base_dir, path);
                tracing::debug!(path = %path.display(), "loading table document");
                load_table_document(&path)?
            }
            FunctionSource::Inline { entries } => entries.clone(),
        };
        let switches = match &self.switches {
            FunctionSource::Default => default_switches()?,
            FunctionSource::File { path } => {
                let path = resolve_path(base_dir, path);
                tracing::debug!(path = %path.display(), "loading switch document");
                load_switch_document(&path)?
            }
            FunctionSource::Inline { entries } => entries.clone(),
        };

        let resolved = ResolvedScenario {
            name: self.name.clone(),
            time: self.time,
            constants: self.constants,
            initial: self.initial,
            tables,
            switches,
        };
        // Surface document errors here rather than at compile time.
        resolved.function_set()?;
        Ok(resolved)
    }
}

fn resolve_path(base_dir: Option<&Path>, path: &Path) -> PathBuf {
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

impl ResolvedScenario {
    pub fn function_set(&self) -> ScenarioResult<FunctionSet> {
        Ok(function_set(&self.tables, &self.switches)?)
    }
}

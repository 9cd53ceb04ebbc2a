//! Scenario loading, validation and introspection.

use std::path::{Path, PathBuf};

use w2_scenario::{FunctionSource, Preset, ResolvedScenario, Scenario};

use crate::error::{AppError, AppResult};

/// Summary of a scenario for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: Option<String>,
    pub year_min: f64,
    pub year_max: f64,
    pub dt: f64,
    pub points: usize,
    pub tables: String,
    pub switches: String,
}

/// Load a scenario file (YAML or JSON by extension).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(w2_scenario::load_scenario(path)?)
}

pub fn load_preset(name: &str) -> AppResult<Scenario> {
    let preset: Preset = name.parse()?;
    Ok(preset.scenario()?)
}

/// Directory relative document paths of the scenario at `path` resolve
/// against.
pub fn scenario_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load every referenced document; errors in any of them surface here.
pub fn resolve_scenario(
    scenario: &Scenario,
    base_dir: Option<&Path>,
) -> AppResult<ResolvedScenario> {
    Ok(scenario.resolve(base_dir)?)
}

/// Load, resolve and summarize a scenario file.
pub fn validate_scenario_file(path: &Path) -> AppResult<ScenarioSummary> {
    let scenario = load_scenario(path)?;
    resolve_scenario(&scenario, Some(&scenario_dir(path)))?;
    summarize(&scenario)
}

pub fn summarize(scenario: &Scenario) -> AppResult<ScenarioSummary> {
    let grid = scenario.time.grid()?;
    Ok(ScenarioSummary {
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        year_min: grid.year_min(),
        year_max: grid.last_time(),
        dt: grid.dt(),
        points: grid.len(),
        tables: describe_source(&scenario.tables),
        switches: describe_source(&scenario.switches),
    })
}

fn describe_source<T>(source: &FunctionSource<T>) -> String {
    match source {
        FunctionSource::Default => "default".to_string(),
        FunctionSource::File { path } => format!("file {}", path.display()),
        FunctionSource::Inline { entries } => format!("inline ({} entries)", entries.len()),
    }
}

/// Write the default table and switch documents into `dir`.
pub fn write_default_documents(dir: &Path) -> AppResult<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let tables_path = dir.join("functions_table_default.json");
    let switches_path = dir.join("functions_switch_default.json");
    w2_scenario::save_table_document(&tables_path, &w2_scenario::default_tables()?)?;
    w2_scenario::save_switch_document(&switches_path, &w2_scenario::default_switches()?)?;
    Ok((tables_path, switches_path))
}

//! Scenario file schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use w2_core::{CoreResult, InitialConditions, ModelConstants, Real, TimeGrid};

use crate::documents::{SwitchEntry, TableDef};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub time: TimeDef,
    #[serde(default)]
    pub constants: ModelConstants,
    #[serde(default)]
    pub initial: InitialConditions,
    #[serde(default)]
    pub tables: FunctionSource<TableDef>,
    #[serde(default)]
    pub switches: FunctionSource<SwitchEntry>,
}

impl Scenario {
    /// Scenario with every section at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: name.into(),
            description: None,
            time: TimeDef::default(),
            constants: ModelConstants::default(),
            initial: InitialConditions::default(),
            tables: FunctionSource::Default,
            switches: FunctionSource::Default,
        }
    }
}

/// Simulated horizon and step, in years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TimeDef {
    pub year_min: Real,
    pub year_max: Real,
    pub dt: Real,
}

impl Default for TimeDef {
    fn default() -> Self {
        Self {
            year_min: 1900.0,
            year_max: 2100.0,
            dt: 0.2,
        }
    }
}

impl TimeDef {
    pub fn grid(&self) -> CoreResult<TimeGrid> {
        TimeGrid::new(self.year_min, self.year_max, self.dt)
    }
}

/// Where a function document comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FunctionSource<T> {
    /// The embedded default document.
    Default,
    /// A JSON document on disk; relative paths resolve against the
    /// scenario file's directory.
    File { path: PathBuf },
    Inline { entries: Vec<T> },
}

impl<T> Default for FunctionSource<T> {
    fn default() -> Self {
        Self::Default
    }
}

/// A scenario with every function document loaded.
///
/// This is the canonical form a run is keyed on: two scenarios that resolve
/// to equal values describe the same run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedScenario {
    pub name: String,
    pub time: TimeDef,
    pub constants: ModelConstants,
    pub initial: InitialConditions,
    pub tables: Vec<TableDef>,
    pub switches: Vec<SwitchEntry>,
}

impl ResolvedScenario {
    pub fn grid(&self) -> CoreResult<TimeGrid> {
        self.time.grid()
    }
}

//! Embedded default function documents and built-in presets.

use std::fmt;
use std::str::FromStr;

use w2_functions::{FunctionSet, SwitchName};

use crate::documents::{self, SwitchEntry, TableDef};
use crate::schema::{FunctionSource, Scenario};
use crate::{ScenarioError, ScenarioResult};

const DEFAULT_TABLES: &str = include_str!("../data/functions_table_default.json");
const DEFAULT_SWITCHES: &str = include_str!("../data/functions_switch_default.json");

/// The standard-run table document.
pub fn default_tables() -> ScenarioResult<Vec<TableDef>> {
    Ok(documents::parse_table_document(DEFAULT_TABLES)?)
}

/// The standard-run switch document.
pub fn default_switches() -> ScenarioResult<Vec<SwitchEntry>> {
    Ok(documents::parse_switch_document(DEFAULT_SWITCHES)?)
}

/// Function set of the standard run.
pub fn default_function_set() -> ScenarioResult<FunctionSet> {
    Ok(documents::function_set(
        &default_tables()?,
        &default_switches()?,
    )?)
}

/// Built-in scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Default documents and parameters, 1900 to 2100.
    Standard,
    /// Standard run with natural-resource usage cut to a quarter after 1970.
    ReducedResourceUsage,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Self::Standard, Self::ReducedResourceUsage];

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::ReducedResourceUsage => "reduced-resource-usage",
        }
    }

    pub fn scenario(self) -> ScenarioResult<Scenario> {
        let mut scenario = Scenario::new(self.name());
        match self {
            Self::Standard => {
                scenario.description = Some("Standard run".to_string());
            }
            Self::ReducedResourceUsage => {
                scenario.description =
                    Some("Natural-resource usage rate reduced after 1970".to_string());
                let mut switches = default_switches()?;
                let nrun = switches
                    .iter_mut()
                    .find_map(|entry| entry.values_mut(SwitchName::Nrun))
                    .ok_or_else(|| ScenarioError::Preset {
                        name: self.name().to_string(),
                        what: "default switches carry no NRUN".to_string(),
                    })?;
                nrun.after = 0.25;
                scenario.switches = FunctionSource::Inline { entries: switches };
            }
        }
        Ok(scenario)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ScenarioError::Preset {
                name: s.to_string(),
                what: format!(
                    "unknown preset (expected one of: {})",
                    Self::ALL.map(Preset::name).join(", ")
                ),
            })
    }
}

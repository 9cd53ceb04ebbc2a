//! Scenario validation.

use w2_core::CoreError;
use w2_functions::FunctionError;

use crate::documents::function_set;
use crate::schema::{FunctionSource, Scenario};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} ({reason})")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid function document: {0}")]
    Function(#[from] FunctionError),

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    scenario.time.grid().map_err(|e| invalid("time", e))?;
    scenario
        .constants
        .validate()
        .map_err(|e| invalid("constants", e))?;
    scenario
        .initial
        .validate()
        .map_err(|e| invalid("initial", e))?;

    // Inline documents are checked on their own; file and default sources
    // are checked once resolved.
    if let FunctionSource::Inline { entries } = &scenario.tables {
        let mut seen = std::collections::HashSet::new();
        for def in entries {
            let table = def.to_function()?;
            if !seen.insert(table.name()) {
                return Err(FunctionError::DuplicateName {
                    kind: "table",
                    name: def.name.clone(),
                }
                .into());
            }
        }
    }
    if let FunctionSource::Inline { entries } = &scenario.switches {
        let mut seen = std::collections::HashSet::new();
        for entry in entries {
            for switch in entry.to_functions()? {
                if !seen.insert(switch.name()) {
                    return Err(FunctionError::DuplicateName {
                        kind: "switch",
                        name: switch.name().code().to_string(),
                    }
                    .into());
                }
            }
        }
    }
    if let (
        FunctionSource::Inline { entries: tables },
        FunctionSource::Inline { entries: switches },
    ) = (&scenario.tables, &scenario.switches)
    {
        function_set(tables, switches)?;
    }

    Ok(())
}

fn invalid(field: &str, err: CoreError) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{SwitchEntry, SwitchValues, TableDef};

    #[test]
    fn default_scenario_is_valid() {
        validate_scenario(&Scenario::new("standard")).unwrap();
    }

    #[test]
    fn future_version_is_rejected() {
        let mut scenario = Scenario::new("s");
        scenario.version = crate::LATEST_VERSION + 1;
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn bad_grid_is_rejected() {
        let mut scenario = Scenario::new("s");
        scenario.time.dt = 0.0;
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "time"
        ));

        let mut scenario = Scenario::new("s");
        scenario.time.year_max = 1800.0;
        assert!(validate_scenario(&scenario).is_err());
    }

    #[test]
    fn non_finite_constant_is_rejected() {
        let mut scenario = Scenario::new("s");
        scenario.constants.land_area = f64::NAN;
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "constants"
        ));
    }

    #[test]
    fn inline_table_with_decreasing_x_is_rejected() {
        let mut scenario = Scenario::new("s");
        scenario.tables = FunctionSource::Inline {
            entries: vec![TableDef {
                name: "BRCM".to_string(),
                input: None,
                x: vec![1.0, 0.0],
                y: vec![0.0, 1.0],
            }],
        };
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::Function(FunctionError::Malformed { ref name, .. }))
                if name == "BRCM"
        ));
    }

    #[test]
    fn inline_switch_listed_twice_is_rejected() {
        let entry = SwitchEntry {
            trigger: 1970.0,
            values: vec![SwitchValues {
                name: "FC".to_string(),
                before: 1.0,
                after: 1.0,
            }],
        };
        let mut scenario = Scenario::new("s");
        scenario.switches = FunctionSource::Inline {
            entries: vec![entry.clone(), entry],
        };
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::Function(FunctionError::DuplicateName { kind: "switch", .. }))
        ));
    }
}

//! Table and switch documents.
//!
//! A table document is a JSON array of objects:
//!
//! ```json
//! [{"y.name": "BRCM", "x.name": "CR", "x.values": [0, 1], "y.values": [1.05, 1]}]
//! ```
//!
//! A switch document is a JSON array of flat maps holding the before value
//! under the switch code, the after value under the code suffixed with `1`,
//! and the trigger year under `trigger.value`:
//!
//! ```json
//! [{"BRN": 0.04, "BRN1": 0.04, "trigger.value": 1970}]
//! ```
//!
//! Names stay textual here so that an unknown name is reported against the
//! document entry that carries it rather than as a parse failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use w2_core::Real;
use w2_functions::{FunctionSet, SwitchFunction, SwitchName, TableFunction, TableName};

use crate::validate::ValidationError;

/// Key holding the trigger year in switch documents.
pub const TRIGGER_KEY: &str = "trigger.value";

/// One lookup table as written in a table document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    #[serde(rename = "y.name")]
    pub name: String,
    /// Informational only; the model fixes each table's input.
    #[serde(rename = "x.name", default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(rename = "x.values")]
    pub x: Vec<Real>,
    #[serde(rename = "y.values")]
    pub y: Vec<Real>,
}

impl TableDef {
    pub fn from_function(table: &TableFunction) -> Self {
        Self {
            name: table.name().code().to_string(),
            input: Some(table.name().input_code().to_string()),
            x: table.x().to_vec(),
            y: table.y().to_vec(),
        }
    }

    pub fn to_function(&self) -> Result<TableFunction, ValidationError> {
        let name: TableName = self.name.parse()?;
        Ok(TableFunction::new(name, self.x.clone(), self.y.clone())?)
    }
}

/// Before/after values of one switch inside a [`SwitchEntry`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchValues {
    pub name: String,
    pub before: Real,
    pub after: Real,
}

/// One entry of a switch document: a trigger year shared by one or more
/// switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Real>", into = "BTreeMap<String, Real>")]
pub struct SwitchEntry {
    pub trigger: Real,
    pub values: Vec<SwitchValues>,
}

impl SwitchEntry {
    pub fn from_function(switch: &SwitchFunction) -> Self {
        Self {
            trigger: switch.trigger_time(),
            values: vec![SwitchValues {
                name: switch.name().code().to_string(),
                before: switch.value_before(),
                after: switch.value_after(),
            }],
        }
    }

    pub fn to_functions(&self) -> Result<Vec<SwitchFunction>, ValidationError> {
        self.values
            .iter()
            .map(|v| {
                let name: SwitchName = v.name.parse()?;
                Ok(SwitchFunction::new(name, v.before, v.after, self.trigger)?)
            })
            .collect()
    }

    /// Value slot for `name`, if this entry carries that switch.
    pub fn values_mut(&mut self, name: SwitchName) -> Option<&mut SwitchValues> {
        self.values.iter_mut().find(|v| v.name == name.code())
    }
}

impl TryFrom<BTreeMap<String, Real>> for SwitchEntry {
    type Error = String;

    fn try_from(mut map: BTreeMap<String, Real>) -> Result<Self, Self::Error> {
        let Some(trigger) = map.remove(TRIGGER_KEY) else {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            return Err(format!(
                "switch entry {{{}}} is missing `{TRIGGER_KEY}`",
                keys.join(", ")
            ));
        };

        let mut values = Vec::new();
        for (key, &before) in &map {
            let after_key = format!("{key}1");
            if let Some(&after) = map.get(&after_key) {
                values.push(SwitchValues {
                    name: key.clone(),
                    before,
                    after,
                });
                continue;
            }
            match key.strip_suffix('1') {
                Some(base) if map.contains_key(base) => {}
                Some(base) => {
                    return Err(format!(
                        "switch value `{key}` has no matching before value `{base}`"
                    ));
                }
                None => {
                    return Err(format!("switch `{key}` has no after value `{after_key}`"));
                }
            }
        }

        if values.is_empty() {
            return Err("switch entry names no switch".to_string());
        }
        Ok(Self { trigger, values })
    }
}

impl From<SwitchEntry> for BTreeMap<String, Real> {
    fn from(entry: SwitchEntry) -> Self {
        let mut map = BTreeMap::new();
        for v in entry.values {
            map.insert(format!("{}1", v.name), v.after);
            map.insert(v.name, v.before);
        }
        map.insert(TRIGGER_KEY.to_string(), entry.trigger);
        map
    }
}

/// Build a fully bound function set from a table and a switch document.
///
/// Every table and switch the model uses must appear exactly once across
/// the documents; unknown names are rejected.
pub fn function_set(
    tables: &[TableDef],
    switches: &[SwitchEntry],
) -> Result<FunctionSet, ValidationError> {
    let mut builder = FunctionSet::builder();
    for def in tables {
        builder.bind_table(def.to_function()?)?;
    }
    for entry in switches {
        builder.bind_switches(entry.to_functions()?)?;
    }
    Ok(builder.build()?)
}

/// Table document describing every table of `functions`.
pub fn table_document(functions: &FunctionSet) -> Vec<TableDef> {
    functions.tables().map(TableDef::from_function).collect()
}

/// Switch document with one entry per switch of `functions`.
pub fn switch_document(functions: &FunctionSet) -> Vec<SwitchEntry> {
    functions.switches().map(SwitchEntry::from_function).collect()
}

pub fn parse_table_document(json: &str) -> Result<Vec<TableDef>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn parse_switch_document(json: &str) -> Result<Vec<SwitchEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use w2_functions::FunctionError;

    #[test]
    fn switch_entry_reads_before_after_and_trigger() {
        let entries =
            parse_switch_document(r#"[{"BRN": 0.04, "BRN1": 0.03, "trigger.value": 1970}]"#)
                .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trigger, 1970.0);
        assert_eq!(
            entries[0].values,
            vec![SwitchValues {
                name: "BRN".to_string(),
                before: 0.04,
                after: 0.03,
            }]
        );
    }

    #[test]
    fn switch_entry_may_group_several_switches() {
        let entries = parse_switch_document(
            r#"[{"BRN": 0.04, "BRN1": 0.03, "DRN": 0.028, "DRN1": 0.02, "trigger.value": 1980}]"#,
        )
        .unwrap();
        let switches = entries[0].to_functions().unwrap();
        assert_eq!(switches.len(), 2);
        assert!(switches.iter().all(|s| s.trigger_time() == 1980.0));
    }

    #[test]
    fn switch_entry_without_trigger_is_rejected() {
        let err = parse_switch_document(r#"[{"BRN": 0.04, "BRN1": 0.04}]"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("trigger.value"), "{msg}");
        assert!(msg.contains("{BRN, BRN1}"), "{msg}");
    }

    #[test]
    fn switch_entry_without_after_value_is_rejected() {
        let err =
            parse_switch_document(r#"[{"BRN": 0.04, "trigger.value": 1970}]"#).unwrap_err();
        assert!(err.to_string().contains("BRN1"));
    }

    #[test]
    fn orphan_after_value_is_rejected() {
        let err =
            parse_switch_document(r#"[{"DRN1": 0.04, "trigger.value": 1970}]"#).unwrap_err();
        assert!(err.to_string().contains("DRN"));
    }

    #[test]
    fn switch_entry_writes_flat_map() {
        let entry = SwitchEntry {
            trigger: 1970.0,
            values: vec![SwitchValues {
                name: "NRUN".to_string(),
                before: 1.0,
                after: 0.25,
            }],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"NRUN": 1.0, "NRUN1": 0.25, "trigger.value": 1970.0})
        );
    }

    #[test]
    fn table_def_x_name_is_optional() {
        let tables =
            parse_table_document(r#"[{"y.name": "QLF", "x.values": [0, 1], "y.values": [0, 1]}]"#)
                .unwrap();
        assert_eq!(tables[0].input, None);
        assert_eq!(tables[0].to_function().unwrap().name(), TableName::Qlf);
    }

    #[test]
    fn unknown_table_name_is_reported() {
        let def = TableDef {
            name: "POLR".to_string(),
            input: None,
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
        };
        assert!(matches!(
            def.to_function(),
            Err(ValidationError::Function(FunctionError::UnknownName { ref name, .. }))
                if name == "POLR"
        ));
    }

    #[test]
    fn unknown_switch_name_is_reported() {
        let entries =
            parse_switch_document(r#"[{"XYZ": 1, "XYZ1": 2, "trigger.value": 1970}]"#).unwrap();
        assert!(matches!(
            entries[0].to_functions(),
            Err(ValidationError::Function(FunctionError::UnknownName { .. }))
        ));
    }

    #[test]
    fn incomplete_documents_do_not_build() {
        let tables = parse_table_document(
            r#"[{"y.name": "QLF", "x.values": [0, 1], "y.values": [0, 1]}]"#,
        )
        .unwrap();
        assert!(matches!(
            function_set(&tables, &[]),
            Err(ValidationError::Function(FunctionError::Unbound { .. }))
        ));
    }
}

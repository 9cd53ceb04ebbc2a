//! Result data types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use w2_scenario::TimeDef;

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: String,
    pub time: TimeDef,
    pub points: usize,
    pub engine_version: String,
    /// Final values of the stocks and of quality of life, keyed by code.
    pub final_values: BTreeMap<String, f64>,
}

/// One time index of a stored run. Not-applicable samples are `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRecord {
    pub time: f64,
    pub values: BTreeMap<String, Option<f64>>,
}

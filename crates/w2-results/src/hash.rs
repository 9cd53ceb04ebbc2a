//! Content-based hashing for run IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};
use w2_core::{InitialConditions, ModelConstants};
use w2_scenario::{ResolvedScenario, SwitchEntry, TableDef, TimeDef};

/// Everything that determines a run's output. The scenario name is left out
/// so renaming a scenario keeps its cached runs.
#[derive(Serialize)]
struct RunKey<'a> {
    time: &'a TimeDef,
    constants: &'a ModelConstants,
    initial: &'a InitialConditions,
    tables: &'a [TableDef],
    switches: &'a [SwitchEntry],
}

pub fn compute_run_id(scenario: &ResolvedScenario, engine_version: &str) -> String {
    let key = RunKey {
        time: &scenario.time,
        constants: &scenario.constants,
        initial: &scenario.initial,
        tables: &scenario.tables,
        switches: &scenario.switches,
    };

    let mut hasher = Sha256::new();

    let key_json = serde_json::to_string(&key).unwrap_or_default();
    hasher.update(key_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

//! Turning a resolved scenario into a run configuration.

use w2_scenario::ResolvedScenario;
use w2_sim::{ModelBuilder, RunConfig};

use crate::error::AppResult;

/// Drive the model builder through its phases for `scenario`.
pub fn compile_scenario(scenario: &ResolvedScenario) -> AppResult<RunConfig> {
    let grid = scenario.grid()?;
    let functions = scenario.function_set()?;

    let mut builder = ModelBuilder::new(grid);
    builder
        .set_constants(scenario.constants)?
        .set_initial_conditions(scenario.initial)?
        .bind_tables(functions.tables().cloned())?
        .bind_switches(functions.switches().cloned())?;
    let config = builder.build()?;

    tracing::debug!(scenario = %scenario.name, points = config.grid().len(), "scenario compiled");
    Ok(config)
}

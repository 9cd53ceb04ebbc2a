//! Independent runs of many scenarios in parallel.
//!
//! Each scenario gets its own simulation; nothing is shared between runs,
//! so outcomes do not depend on scheduling. Outcomes come back in input
//! order. Sweeps never read or write the run cache.

use rayon::prelude::*;
use w2_core::Real;
use w2_scenario::ResolvedScenario;
use w2_sim::Quantity;

use crate::query;
use crate::run_service::execute;

/// Result of one scenario in a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    pub name: String,
    /// Final values of the stocks and quality of life, or the error that
    /// stopped the run.
    pub result: Result<Vec<(Quantity, Real)>, String>,
}

impl SweepOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn run_sweep(scenarios: &[ResolvedScenario]) -> Vec<SweepOutcome> {
    tracing::debug!(scenarios = scenarios.len(), "starting sweep");
    let outcomes: Vec<SweepOutcome> = scenarios
        .par_iter()
        .map(|scenario| SweepOutcome {
            name: scenario.name.clone(),
            result: execute(scenario)
                .map(|output| query::summary(&output).final_values)
                .map_err(|e| e.to_string()),
        })
        .collect();
    tracing::info!(
        scenarios = outcomes.len(),
        failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
        "sweep finished"
    );
    outcomes
}

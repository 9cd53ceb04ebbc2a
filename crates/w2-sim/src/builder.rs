//! Phase-ordered configuration of a run.
//!
//! Configuration happens in a fixed order: constants, initial conditions,
//! tables, switches. [`ModelBuilder`] enforces that order and hands out an
//! immutable [`RunConfig`] once every phase is complete.

use std::fmt;

use w2_core::{InitialConditions, ModelConstants, TimeGrid};
use w2_functions::{FunctionSet, FunctionSetBuilder, SwitchFunction, TableFunction};

use crate::error::{SimError, SimResult};

/// Configuration phases, in the order they must be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildPhase {
    Unconfigured,
    ConstantsSet,
    InitialConditionsSet,
    TablesBound,
    SwitchesBound,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unconfigured => "unconfigured",
            Self::ConstantsSet => "constants set",
            Self::InitialConditionsSet => "initial conditions set",
            Self::TablesBound => "tables bound",
            Self::SwitchesBound => "switches bound",
        };
        f.write_str(label)
    }
}

/// Validated, immutable configuration of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    grid: TimeGrid,
    constants: ModelConstants,
    initial: InitialConditions,
    functions: FunctionSet,
}

impl RunConfig {
    /// Assemble a configuration from already-resolved parts.
    pub fn new(
        grid: TimeGrid,
        constants: ModelConstants,
        initial: InitialConditions,
        functions: FunctionSet,
    ) -> SimResult<Self> {
        constants.validate()?;
        initial.validate()?;
        Ok(Self {
            grid,
            constants,
            initial,
            functions,
        })
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    pub fn initial(&self) -> &InitialConditions {
        &self.initial
    }

    pub fn functions(&self) -> &FunctionSet {
        &self.functions
    }

    /// Same configuration over a different grid.
    pub fn with_grid(&self, grid: TimeGrid) -> Self {
        Self {
            grid,
            ..self.clone()
        }
    }

    /// Same configuration with another function set (e.g. a policy switch).
    pub fn with_functions(&self, functions: FunctionSet) -> Self {
        Self {
            functions,
            ..self.clone()
        }
    }
}

/// Builder walking the configuration phases in order.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    grid: TimeGrid,
    phase: BuildPhase,
    constants: Option<ModelConstants>,
    initial: Option<InitialConditions>,
    functions: FunctionSetBuilder,
}

impl ModelBuilder {
    pub fn new(grid: TimeGrid) -> Self {
        Self {
            grid,
            phase: BuildPhase::Unconfigured,
            constants: None,
            initial: None,
            functions: FunctionSetBuilder::new(),
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    fn advance(&mut self, from: BuildPhase, to: BuildPhase) -> SimResult<()> {
        if self.phase != from {
            return Err(SimError::Sequencing {
                expected: from.to_string(),
                actual: self.phase.to_string(),
            });
        }
        self.phase = to;
        Ok(())
    }

    pub fn set_constants(&mut self, constants: ModelConstants) -> SimResult<&mut Self> {
        constants.validate()?;
        self.advance(BuildPhase::Unconfigured, BuildPhase::ConstantsSet)?;
        self.constants = Some(constants);
        Ok(self)
    }

    pub fn set_initial_conditions(&mut self, initial: InitialConditions) -> SimResult<&mut Self> {
        initial.validate()?;
        self.advance(BuildPhase::ConstantsSet, BuildPhase::InitialConditionsSet)?;
        self.initial = Some(initial);
        Ok(self)
    }

    /// Complete the first two phases with the standard-run constants and
    /// initial conditions.
    pub fn with_defaults_for_constants(&mut self) -> SimResult<&mut Self> {
        self.set_constants(ModelConstants::default())?
            .set_initial_conditions(InitialConditions::default())
    }

    /// Bind every table. All names must be present exactly once.
    pub fn bind_tables(
        &mut self,
        tables: impl IntoIterator<Item = TableFunction>,
    ) -> SimResult<&mut Self> {
        if self.phase != BuildPhase::InitialConditionsSet {
            return Err(SimError::Sequencing {
                expected: BuildPhase::InitialConditionsSet.to_string(),
                actual: self.phase.to_string(),
            });
        }
        let mut functions = self.functions.clone();
        functions.bind_tables(tables)?;
        if let Some(name) = functions.missing_tables().first() {
            return Err(SimError::Configuration {
                what: format!("missing table function {name}"),
            });
        }
        self.functions = functions;
        self.advance(BuildPhase::InitialConditionsSet, BuildPhase::TablesBound)?;
        Ok(self)
    }

    /// Bind every switch. All names must be present exactly once.
    pub fn bind_switches(
        &mut self,
        switches: impl IntoIterator<Item = SwitchFunction>,
    ) -> SimResult<&mut Self> {
        if self.phase != BuildPhase::TablesBound {
            return Err(SimError::Sequencing {
                expected: BuildPhase::TablesBound.to_string(),
                actual: self.phase.to_string(),
            });
        }
        let mut functions = self.functions.clone();
        functions.bind_switches(switches)?;
        if let Some(name) = functions.missing_switches().first() {
            return Err(SimError::Configuration {
                what: format!("missing switch function {name}"),
            });
        }
        self.functions = functions;
        self.advance(BuildPhase::TablesBound, BuildPhase::SwitchesBound)?;
        Ok(self)
    }

    pub fn build(self) -> SimResult<RunConfig> {
        match (self.phase, self.constants, self.initial) {
            (BuildPhase::SwitchesBound, Some(constants), Some(initial)) => {
                let functions = self.functions.build()?;
                tracing::debug!(points = self.grid.len(), "run configuration built");
                RunConfig::new(self.grid, constants, initial, functions)
            }
            (phase, _, _) => Err(SimError::Sequencing {
                expected: BuildPhase::SwitchesBound.to_string(),
                actual: phase.to_string(),
            }),
        }
    }
}

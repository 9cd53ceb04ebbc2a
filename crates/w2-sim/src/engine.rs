//! The step engine.
//!
//! Index 0 is computed from the initial conditions; every later index `k`
//! reads the completed step `k - 1` plus values already produced earlier in
//! step `k`. The order inside a step is part of the model and must not be
//! rearranged.

use std::fmt;

use w2_core::{Real, TimeGrid, checked_div};
use w2_functions::{SwitchName, TableName};

use crate::builder::RunConfig;
use crate::error::{SimError, SimResult};
use crate::quantity::Quantity::{self, *};
use crate::store::StateStore;

/// Lifecycle of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Configured, nothing computed.
    Configured,
    /// Index 0 and possibly later steps computed; `next` is the next step.
    Running { next: usize },
    Complete,
    /// A step failed; results are withheld.
    Failed { step: usize },
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => f.write_str("configured"),
            Self::Running { next } => write!(f, "running (next step {next})"),
            Self::Complete => f.write_str("complete"),
            Self::Failed { step } => write!(f, "failed at step {step}"),
        }
    }
}

/// Completed run: the grid and every series aligned with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub grid: TimeGrid,
    pub store: StateStore,
}

impl RunOutput {
    pub fn final_value(&self, quantity: Quantity) -> Option<Real> {
        self.store.last_value(quantity)
    }
}

/// One run of the model over its grid.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: RunConfig,
    store: StateStore,
    status: RunStatus,
}

impl Simulation {
    pub fn new(config: RunConfig) -> Self {
        let store = StateStore::new(config.grid().len());
        Self {
            config,
            store,
            status: RunStatus::Configured,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Store as it stands, possibly mid-run.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Compute index 0.
    pub fn step_init(&mut self) -> SimResult<()> {
        if self.status != RunStatus::Configured {
            return Err(self.sequencing("configured"));
        }
        let result = initialize(&self.config, &mut self.store);
        self.finish(0, result)
    }

    /// Compute index `k` from index `k - 1`. Steps must be taken in order.
    pub fn step(&mut self, k: usize) -> SimResult<()> {
        if self.status != (RunStatus::Running { next: k }) {
            return Err(self.sequencing(&format!("running (next step {k})")));
        }
        let result = advance(&self.config, &mut self.store, k);
        self.finish(k, result)
    }

    /// Run every step and return the completed store.
    pub fn run(&mut self) -> SimResult<&StateStore> {
        self.run_with_progress(|_, _| {})
    }

    /// Like [`run`](Self::run), calling `progress(step, total)` after each step.
    pub fn run_with_progress(
        &mut self,
        mut progress: impl FnMut(usize, usize),
    ) -> SimResult<&StateStore> {
        let total = self.store.len();
        self.step_init()?;
        progress(0, total);
        for k in 1..total {
            self.step(k)?;
            progress(k, total);
        }
        tracing::info!(
            steps = total,
            final_year = self.config.grid().last_time(),
            "run complete"
        );
        Ok(&self.store)
    }

    /// Completed results; refused until the run has finished successfully.
    pub fn results(&self) -> SimResult<&StateStore> {
        if self.status != RunStatus::Complete {
            return Err(self.sequencing("complete"));
        }
        Ok(&self.store)
    }

    pub fn into_output(self) -> SimResult<RunOutput> {
        if self.status != RunStatus::Complete {
            return Err(self.sequencing("complete"));
        }
        Ok(RunOutput {
            grid: self.config.grid().clone(),
            store: self.store,
        })
    }

    fn sequencing(&self, expected: &str) -> SimError {
        SimError::Sequencing {
            expected: expected.to_string(),
            actual: self.status.to_string(),
        }
    }

    fn finish(&mut self, k: usize, result: SimResult<()>) -> SimResult<()> {
        match result {
            Ok(()) => {
                self.store.mark_completed(k);
                self.status = if k + 1 == self.store.len() {
                    RunStatus::Complete
                } else {
                    RunStatus::Running { next: k + 1 }
                };
                tracing::trace!(step = k, "step complete");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(step = k, error = %err, "step failed, aborting run");
                self.status = RunStatus::Failed { step: k };
                Err(err)
            }
        }
    }
}

fn div(
    num: Real,
    den: Real,
    step: usize,
    quantity: Quantity,
    divisor: &'static str,
) -> SimResult<Real> {
    checked_div(num, den, divisor).map_err(|_| SimError::Domain {
        step,
        quantity,
        what: format!("division by {divisor} = {den}"),
    })
}

fn initialize(config: &RunConfig, store: &mut StateStore) -> SimResult<()> {
    let c = config.constants();
    let init = config.initial();
    let f = config.functions();
    let t0 = config.grid().year_min();

    let p = store.record(Population, 0, init.population)?;

    let nr = store.record(NaturalResources, 0, init.natural_resources)?;
    let nrfr = div(nr, init.natural_resources, 0, NaturalResourceFractionRemaining, "NRI")?;
    store.record(NaturalResourceFractionRemaining, 0, nrfr)?;

    let ci = store.record(CapitalInvestment, 0, init.capital_investment)?;
    let cr = div(p, c.land_area * c.population_density_normal, 0, CrowdingRatio, "LA*PDN")?;
    store.record(CrowdingRatio, 0, cr)?;
    let cir = div(ci, p, 0, CapitalInvestmentRatio, "P")?;
    store.record(CapitalInvestmentRatio, 0, cir)?;

    let pol = store.record(Pollution, 0, init.pollution)?;
    let polg = p * f.at(SwitchName::Poln, t0) * f.lookup(TableName::Polcm, cir);
    store.record(PollutionGeneration, 0, polg)?;
    let polr = div(pol, c.pollution_standard, 0, PollutionRatio, "POLS")?;
    store.record(PollutionRatio, 0, polr)?;
    let pola = div(pol, f.lookup(TableName::Polat, polr), 0, PollutionAbsorption, "POLAT")?;
    store.record(PollutionAbsorption, 0, pola)?;

    let ciaf = store.record(AgricultureFraction, 0, init.agriculture_fraction)?;

    let cira = div(
        cir * ciaf,
        c.agriculture_fraction_normal,
        0,
        CapitalInvestmentRatioAgriculture,
        "CIAFN",
    )?;
    store.record(CapitalInvestmentRatioAgriculture, 0, cira)?;
    let fr = div(
        f.lookup(TableName::Fpci, cira)
            * f.lookup(TableName::Fcm, cr)
            * f.lookup(TableName::Fpm, polr)
            * f.at(SwitchName::Fc, t0),
        c.food_normal,
        0,
        FoodRatio,
        "FN",
    )?;
    store.record(FoodRatio, 0, fr)?;
    let ecir = div(
        cir * (1.0 - ciaf) * f.lookup(TableName::Nrem, nrfr),
        1.0 - c.agriculture_fraction_normal,
        0,
        EffectiveCapitalInvestmentRatio,
        "1-CIAFN",
    )?;
    store.record(EffectiveCapitalInvestmentRatio, 0, ecir)?;
    let msl = div(ecir, c.effective_capital_ratio_normal, 0, MaterialStandardOfLiving, "ECIRN")?;
    store.record(MaterialStandardOfLiving, 0, msl)?;

    tracing::debug!(year = t0, population = p, msl, "initial state computed");
    Ok(())
}

fn advance(config: &RunConfig, store: &mut StateStore, k: usize) -> SimResult<()> {
    let c = config.constants();
    let init = config.initial();
    let f = config.functions();
    let grid = config.grid();
    let dt = grid.dt();
    let j = k - 1;
    let t_j = grid.year_min() + j as Real * dt;
    let t_k = grid.year_min() + k as Real * dt;

    let p_j = store.get(Population, j);
    let msl_j = store.get(MaterialStandardOfLiving, j);
    let cr_j = store.get(CrowdingRatio, j);
    let fr_j = store.get(FoodRatio, j);
    let polr_j = store.get(PollutionRatio, j);
    let cir_j = store.get(CapitalInvestmentRatio, j);

    // 1-2: population
    let br = p_j
        * f.at(SwitchName::Brn, t_j)
        * f.lookup(TableName::Brmm, msl_j)
        * f.lookup(TableName::Brcm, cr_j)
        * f.lookup(TableName::Brfm, fr_j)
        * f.lookup(TableName::Brpm, polr_j);
    store.record(BirthRate, k, br)?;
    let dr = p_j
        * f.at(SwitchName::Drn, t_j)
        * f.lookup(TableName::Drmm, msl_j)
        * f.lookup(TableName::Drpm, polr_j)
        * f.lookup(TableName::Drfm, fr_j)
        * f.lookup(TableName::Drcm, cr_j);
    store.record(DeathRate, k, dr)?;
    let p = store.record(Population, k, p_j + (br - dr) * dt)?;

    // 3: natural resources
    let nrur = p_j * f.at(SwitchName::Nrun, t_j) * f.lookup(TableName::Nrmm, msl_j);
    store.record(NaturalResourceUsageRate, k, nrur)?;
    let nr = store.record(NaturalResources, k, store.get(NaturalResources, j) - nrur * dt)?;
    let nrfr = div(nr, init.natural_resources, k, NaturalResourceFractionRemaining, "NRI")?;
    store.record(NaturalResourceFractionRemaining, k, nrfr)?;

    // 4: capital investment
    let ci_j = store.get(CapitalInvestment, j);
    let cid = ci_j * f.at(SwitchName::Cidn, t_j);
    store.record(CapitalInvestmentDiscard, k, cid)?;
    let cig = p_j * f.lookup(TableName::Cim, msl_j) * f.at(SwitchName::Cign, t_j);
    store.record(CapitalInvestmentGeneration, k, cig)?;
    let ci = store.record(CapitalInvestment, k, ci_j + dt * (cig - cid))?;
    let cr = div(p, c.land_area * c.population_density_normal, k, CrowdingRatio, "LA*PDN")?;
    store.record(CrowdingRatio, k, cr)?;
    let cir = div(ci, p, k, CapitalInvestmentRatio, "P")?;
    store.record(CapitalInvestmentRatio, k, cir)?;

    // 5: pollution; generation uses CIR from step j
    let pol_j = store.get(Pollution, j);
    let polg = p_j * f.at(SwitchName::Poln, t_j) * f.lookup(TableName::Polcm, cir_j);
    store.record(PollutionGeneration, k, polg)?;
    let pola = div(pol_j, f.lookup(TableName::Polat, polr_j), k, PollutionAbsorption, "POLAT")?;
    store.record(PollutionAbsorption, k, pola)?;
    let pol = store.record(Pollution, k, pol_j + (polg - pola) * dt)?;
    let polr = div(pol, c.pollution_standard, k, PollutionRatio, "POLS")?;
    store.record(PollutionRatio, k, polr)?;

    // 6: agriculture fraction relaxes toward its indicated value
    let ciaf_j = store.get(AgricultureFraction, j);
    let quality_ratio = div(
        f.lookup(TableName::Qlm, msl_j),
        f.lookup(TableName::Qlf, fr_j),
        k,
        AgricultureFraction,
        "QLF",
    )?;
    let relax = div(dt, c.agriculture_adjustment_time, k, AgricultureFraction, "CIAFT")?;
    let ciaf = ciaf_j
        + (f.lookup(TableName::Cfifr, fr_j) * f.lookup(TableName::Ciqr, quality_ratio) - ciaf_j)
            * relax;
    store.record(AgricultureFraction, k, ciaf)?;

    // 7: auxiliaries from step-k values
    let cira = div(
        cir * ciaf,
        c.agriculture_fraction_normal,
        k,
        CapitalInvestmentRatioAgriculture,
        "CIAFN",
    )?;
    store.record(CapitalInvestmentRatioAgriculture, k, cira)?;
    let fr = div(
        f.lookup(TableName::Fcm, cr)
            * f.lookup(TableName::Fpci, cira)
            * f.lookup(TableName::Fpm, polr)
            * f.at(SwitchName::Fc, t_k),
        c.food_normal,
        k,
        FoodRatio,
        "FN",
    )?;
    store.record(FoodRatio, k, fr)?;
    let ecir = div(
        cir * (1.0 - ciaf) * f.lookup(TableName::Nrem, nrfr),
        1.0 - c.agriculture_fraction_normal,
        k,
        EffectiveCapitalInvestmentRatio,
        "1-CIAFN",
    )?;
    store.record(EffectiveCapitalInvestmentRatio, k, ecir)?;
    let msl = div(ecir, c.effective_capital_ratio_normal, k, MaterialStandardOfLiving, "ECIRN")?;
    store.record(MaterialStandardOfLiving, k, msl)?;

    // 8: quality of life
    let ql = c.quality_of_life_standard
        * f.lookup(TableName::Qlm, msl)
        * f.lookup(TableName::Qlc, cr)
        * f.lookup(TableName::Qlf, fr)
        * f.lookup(TableName::Qlp, polr);
    store.record(QualityOfLife, k, ql)?;

    Ok(())
}

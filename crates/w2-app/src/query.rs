//! Query helpers for extracting data from run output and stored runs.

use w2_core::Real;
use w2_results::SeriesRecord;
use w2_sim::{Quantity, RunOutput};

use crate::error::{AppError, AppResult};

/// Final values of the standard run (1900 to 2100, dt 0.2, default
/// documents and parameters).
pub const STANDARD_RUN_REFERENCE: [(Quantity, Real); 4] = [
    (Quantity::QualityOfLife, 0.54940464789),
    (Quantity::PollutionRatio, 2.58741372815),
    (Quantity::NaturalResources, 278240023740.0),
    (Quantity::CapitalInvestment, 6010240430.13),
];

/// Summary of a run's time range and headline values.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (Real, Real),
    pub points: usize,
    pub final_values: Vec<(Quantity, Real)>,
}

/// A final value that is missing or too far from its expected value.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub quantity: Quantity,
    pub expected: Real,
    pub actual: Option<Real>,
}

pub fn final_values(
    output: &RunOutput,
    quantities: &[Quantity],
) -> Vec<(Quantity, Option<Real>)> {
    quantities
        .iter()
        .map(|&q| (q, output.final_value(q)))
        .collect()
}

/// Time series of one quantity; not-applicable samples are `None`.
pub fn extract_series(output: &RunOutput, quantity: Quantity) -> Vec<(Real, Option<Real>)> {
    output
        .grid
        .times()
        .into_iter()
        .zip(output.store.series(quantity))
        .map(|(t, sample)| (t, sample.value()))
        .collect()
}

/// Compare final values against `expected` with `|a-b| <= rel_tol*max(|a|,|b|)`.
pub fn compare_final(
    output: &RunOutput,
    expected: &[(Quantity, Real)],
    rel_tol: Real,
) -> Vec<Mismatch> {
    expected
        .iter()
        .filter_map(|&(quantity, expected)| {
            let actual = output.final_value(quantity);
            match actual {
                Some(a) if w2_core::relatively_close(a, expected, rel_tol) => None,
                _ => Some(Mismatch {
                    quantity,
                    expected,
                    actual,
                }),
            }
        })
        .collect()
}

pub fn summary(output: &RunOutput) -> RunSummary {
    let final_values = Quantity::STOCKS
        .into_iter()
        .chain([Quantity::QualityOfLife])
        .filter_map(|q| output.final_value(q).map(|v| (q, v)))
        .collect();
    RunSummary {
        time_range: (output.grid.year_min(), output.grid.last_time()),
        points: output.grid.len(),
        final_values,
    }
}

/// Time series of one quantity from stored records.
pub fn extract_record_series(
    records: &[SeriesRecord],
    quantity: Quantity,
) -> AppResult<Vec<(Real, Option<Real>)>> {
    records
        .iter()
        .map(|record| {
            record
                .values
                .get(quantity.code())
                .map(|v| (record.time, *v))
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "Quantity {} not present in stored run",
                        quantity.code()
                    ))
                })
        })
        .collect()
}

/// Parse quantity codes such as `P` or `ql`.
pub fn parse_quantities(codes: &[String]) -> AppResult<Vec<Quantity>> {
    codes
        .iter()
        .map(|c| {
            c.parse::<Quantity>()
                .map_err(|e| AppError::InvalidInput(e.to_string()))
        })
        .collect()
}

//! Per-step storage for every simulated quantity.

use w2_core::Real;

use crate::error::{SimError, SimResult};
use crate::quantity::Quantity;

/// What a reader sees at one index of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Not computed yet.
    Unset,
    /// Defined as having no value at this index (look-back flows at index 0).
    NotApplicable,
    Value(Real),
}

impl Sample {
    pub fn value(self) -> Option<Real> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

/// Fixed-length series for every [`Quantity`], filled one index at a time.
///
/// Only the step engine writes. Index `k` becomes readable once the whole of
/// step `k` has completed, so a failed step leaves no partial values behind.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStore {
    len: usize,
    data: Vec<Vec<Real>>,
    completed: usize,
}

impl StateStore {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            data: vec![vec![Real::NAN; len]; Quantity::COUNT],
            completed: 0,
        }
    }

    /// Length of every series (the grid length).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of leading indices whose step has completed.
    pub fn completed_steps(&self) -> usize {
        self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.len
    }

    /// Sample at `index`, or `None` past the end of the grid.
    pub fn sample(&self, quantity: Quantity, index: usize) -> Option<Sample> {
        if index >= self.len {
            return None;
        }
        if index >= self.completed {
            return Some(Sample::Unset);
        }
        if index == 0 && quantity.is_lookback_flow() {
            return Some(Sample::NotApplicable);
        }
        Some(Sample::Value(self.data[quantity.index()][index]))
    }

    pub fn value(&self, quantity: Quantity, index: usize) -> Option<Real> {
        self.sample(quantity, index).and_then(Sample::value)
    }

    /// Every sample of `quantity`, index-aligned with the grid.
    pub fn series(&self, quantity: Quantity) -> Vec<Sample> {
        (0..self.len)
            .map(|k| self.sample(quantity, k).unwrap_or(Sample::Unset))
            .collect()
    }

    /// Series with every non-value sample as NaN, for numeric consumers.
    pub fn values_or_nan(&self, quantity: Quantity) -> Vec<Real> {
        (0..self.len)
            .map(|k| self.value(quantity, k).unwrap_or(Real::NAN))
            .collect()
    }

    /// Value at the last completed index.
    pub fn last_value(&self, quantity: Quantity) -> Option<Real> {
        self.completed
            .checked_sub(1)
            .and_then(|k| self.value(quantity, k))
    }

    /// Raw read for the engine: the value written at `index`, complete or not.
    pub(crate) fn get(&self, quantity: Quantity, index: usize) -> Real {
        self.data[quantity.index()][index]
    }

    /// Write `value` at `index`, rejecting non-finite results.
    pub(crate) fn record(
        &mut self,
        quantity: Quantity,
        index: usize,
        value: Real,
    ) -> SimResult<Real> {
        if !value.is_finite() {
            return Err(SimError::Domain {
                step: index,
                quantity,
                what: format!("non-finite result {value}"),
            });
        }
        self.data[quantity.index()][index] = value;
        Ok(value)
    }

    pub(crate) fn mark_completed(&mut self, index: usize) {
        debug_assert_eq!(index, self.completed);
        self.completed = index + 1;
    }
}

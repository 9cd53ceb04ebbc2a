//! Fixed-step year grid.
//!
//! Every series a run produces is aligned with one `TimeGrid`. Times are
//! computed as `year_min + i * dt` rather than accumulated, so index `i`
//! always maps to the same year no matter how long the grid is.

use crate::{CoreError, CoreResult, Real};

/// Guard applied before flooring the step count so that spans which are an
/// exact multiple of `dt` in decimal do not lose their last point to binary
/// rounding (e.g. `200.0 / 0.2`).
const STEP_COUNT_GUARD: Real = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    year_min: Real,
    year_max: Real,
    dt: Real,
    n: usize,
}

impl TimeGrid {
    pub fn new(year_min: Real, year_max: Real, dt: Real) -> CoreResult<Self> {
        if !year_min.is_finite() {
            return Err(CoreError::NonFinite {
                what: "year_min",
                value: year_min,
            });
        }
        if !year_max.is_finite() {
            return Err(CoreError::NonFinite {
                what: "year_max",
                value: year_max,
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CoreError::InvalidArg {
                what: "dt must be finite and positive",
            });
        }
        if year_max < year_min {
            return Err(CoreError::InvalidArg {
                what: "year_max must not precede year_min",
            });
        }

        let steps = (year_max - year_min) / dt;
        let steps = (steps + STEP_COUNT_GUARD * steps.max(1.0)).floor();
        if steps > (usize::MAX - 1) as Real {
            return Err(CoreError::InvalidArg {
                what: "time grid is too long",
            });
        }

        Ok(Self {
            year_min,
            year_max,
            dt,
            n: steps as usize + 1,
        })
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.n
    }

    /// A grid always holds at least its start year.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn dt(&self) -> Real {
        self.dt
    }

    pub fn year_min(&self) -> Real {
        self.year_min
    }

    /// Requested end year. The last grid point may fall short of it when the
    /// span is not a multiple of `dt`.
    pub fn year_max(&self) -> Real {
        self.year_max
    }

    pub fn time(&self, index: usize) -> CoreResult<Real> {
        if index >= self.n {
            return Err(CoreError::IndexOob {
                what: "time grid",
                index,
                len: self.n,
            });
        }
        Ok(self.time_unchecked(index))
    }

    pub(crate) fn time_unchecked(&self, index: usize) -> Real {
        self.year_min + index as Real * self.dt
    }

    pub fn times(&self) -> Vec<Real> {
        (0..self.n).map(|i| self.time_unchecked(i)).collect()
    }

    pub fn last_time(&self) -> Real {
        self.time_unchecked(self.n - 1)
    }

    /// Index of the grid point within half a step of `year`.
    pub fn index_of(&self, year: Real) -> Option<usize> {
        if !year.is_finite() {
            return None;
        }
        let pos = ((year - self.year_min) / self.dt).round();
        if pos < 0.0 || pos >= self.n as Real {
            return None;
        }
        let index = pos as usize;
        if (self.time_unchecked(index) - year).abs() <= 0.5 * self.dt {
            Some(index)
        } else {
            None
        }
    }

    /// True when `other` starts at the same year with the same step and is at
    /// least as long, so every point of `self` appears in `other` at the same
    /// index.
    pub fn is_prefix_of(&self, other: &TimeGrid) -> bool {
        self.year_min == other.year_min && self.dt == other.dt && self.n <= other.n
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn last_point_never_passes_year_max(
            year_min in 1800.0_f64..2000.0,
            span in 0.0_f64..400.0,
            dt in 0.01_f64..5.0,
        ) {
            let grid = TimeGrid::new(year_min, year_min + span, dt).unwrap();
            prop_assert!(grid.len() >= 1);
            prop_assert!(grid.last_time() <= year_min + span + 1e-6);
            prop_assert!(grid.last_time() + dt > year_min + span - 1e-6);
            prop_assert_eq!(grid.time(0).unwrap(), year_min);
        }
    }
}

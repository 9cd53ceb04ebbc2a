//! Piecewise-linear lookup tables with clamped edges.

use w2_core::Real;

use crate::{FunctionError, FunctionResult, TableName};

/// A named piecewise-linear interpolant.
///
/// Queries below the first breakpoint return exactly the first y value and
/// queries above the last breakpoint return exactly the last one; the table
/// never extrapolates. A query equal to a breakpoint returns that
/// breakpoint's y value exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFunction {
    name: TableName,
    x: Vec<Real>,
    y: Vec<Real>,
}

impl TableFunction {
    /// Build a table, rejecting mismatched lengths, fewer than two points,
    /// non-finite values and non-increasing x breakpoints.
    pub fn new(name: TableName, x: Vec<Real>, y: Vec<Real>) -> FunctionResult<Self> {
        let malformed = |reason: String| FunctionError::Malformed {
            name: name.code().to_string(),
            reason,
        };

        if x.len() != y.len() {
            return Err(malformed(format!(
                "{} x breakpoints but {} y values",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(malformed(format!(
                "at least 2 breakpoints required, got {}",
                x.len()
            )));
        }
        if let Some(i) = x.iter().chain(y.iter()).position(|v| !v.is_finite()) {
            return Err(malformed(format!("non-finite value at position {i}")));
        }
        if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(malformed(format!(
                "x breakpoints must be strictly increasing (x[{}]={} >= x[{}]={})",
                i,
                x[i],
                i + 1,
                x[i + 1]
            )));
        }

        Ok(Self { name, x, y })
    }

    pub fn name(&self) -> TableName {
        self.name
    }

    pub fn x(&self) -> &[Real] {
        &self.x
    }

    pub fn y(&self) -> &[Real] {
        &self.y
    }

    /// Lower and upper edge of the table domain.
    pub fn domain(&self) -> (Real, Real) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Evaluate at `xq`. A NaN query yields NaN.
    pub fn evaluate(&self, xq: Real) -> Real {
        let last = self.x.len() - 1;
        if xq <= self.x[0] {
            return self.y[0];
        }
        if xq >= self.x[last] {
            return self.y[last];
        }
        if xq.is_nan() {
            return Real::NAN;
        }

        // x[i] <= xq < x[i + 1], with 0 <= i < last
        let i = self.x.partition_point(|&bp| bp <= xq) - 1;
        if xq == self.x[i] {
            return self.y[i];
        }
        let slope = (self.y[i + 1] - self.y[i]) / (self.x[i + 1] - self.x[i]);
        slope * (xq - self.x[i]) + self.y[i]
    }

    /// Evaluate, rejecting non-finite queries.
    pub fn try_evaluate(&self, xq: Real) -> FunctionResult<Real> {
        if !xq.is_finite() {
            return Err(FunctionError::Domain {
                name: self.name.code().to_string(),
                what: format!("non-finite query {xq}"),
            });
        }
        Ok(self.evaluate(xq))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_table() -> impl Strategy<Value = TableFunction> {
        prop::collection::vec((0.01_f64..10.0, -100.0_f64..100.0), 2..12).prop_map(|points| {
            let mut x = Vec::with_capacity(points.len());
            let mut acc = -5.0;
            for (step, _) in &points {
                acc += step;
                x.push(acc);
            }
            let y = points.iter().map(|(_, y)| *y).collect();
            TableFunction::new(TableName::Fpci, x, y).unwrap()
        })
    }

    proptest! {
        #[test]
        fn below_domain_is_first_value(table in arb_table(), gap in 0.0_f64..1e6) {
            let (lo, _) = table.domain();
            prop_assert_eq!(table.evaluate(lo - gap), table.y()[0]);
        }

        #[test]
        fn above_domain_is_last_value(table in arb_table(), gap in 0.0_f64..1e6) {
            let (_, hi) = table.domain();
            prop_assert_eq!(table.evaluate(hi + gap), *table.y().last().unwrap());
        }

        #[test]
        fn every_breakpoint_is_exact(table in arb_table()) {
            for (x, y) in table.x().iter().zip(table.y()) {
                prop_assert_eq!(table.evaluate(*x), *y);
            }
        }

        #[test]
        fn interior_values_stay_within_bracket(table in arb_table(), frac in 0.0_f64..1.0) {
            let (lo, hi) = table.domain();
            let xq = lo + frac * (hi - lo);
            let i = table.x().partition_point(|&bp| bp <= xq).saturating_sub(1);
            let j = (i + 1).min(table.x().len() - 1);
            let (a, b) = (table.y()[i], table.y()[j]);
            let v = table.evaluate(xq);
            prop_assert!(v >= a.min(b) - 1e-9 && v <= a.max(b) + 1e-9);
        }
    }
}

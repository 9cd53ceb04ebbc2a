use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Relative closeness with no absolute floor: `|a - b| <= rel * max(|a|, |b|)`.
///
/// Used when comparing run outputs against published reference values.
pub fn relatively_close(a: Real, b: Real, rel: Real) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Divide, rejecting an exactly-zero divisor and any non-finite quotient.
pub fn checked_div(num: Real, den: Real, what: &'static str) -> Result<Real, CoreError> {
    if den == 0.0 {
        return Err(CoreError::InvalidArg { what });
    }
    ensure_finite(num / den, what)
}

//! Two-valued step functions of time.

use w2_core::Real;

use crate::{FunctionError, FunctionResult, SwitchName};

/// A named policy switch.
///
/// Returns `value_before` up to and including `trigger_time` and
/// `value_after` strictly afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchFunction {
    name: SwitchName,
    value_before: Real,
    value_after: Real,
    trigger_time: Real,
}

impl SwitchFunction {
    pub fn new(
        name: SwitchName,
        value_before: Real,
        value_after: Real,
        trigger_time: Real,
    ) -> FunctionResult<Self> {
        for (what, v) in [
            ("value before trigger", value_before),
            ("value after trigger", value_after),
            ("trigger time", trigger_time),
        ] {
            if !v.is_finite() {
                return Err(FunctionError::Malformed {
                    name: name.code().to_string(),
                    reason: format!("non-finite {what}: {v}"),
                });
            }
        }

        Ok(Self {
            name,
            value_before,
            value_after,
            trigger_time,
        })
    }

    /// Switch holding the same value on both sides of the trigger.
    pub fn constant(name: SwitchName, value: Real, trigger_time: Real) -> FunctionResult<Self> {
        Self::new(name, value, value, trigger_time)
    }

    pub fn name(&self) -> SwitchName {
        self.name
    }

    pub fn value_before(&self) -> Real {
        self.value_before
    }

    pub fn value_after(&self) -> Real {
        self.value_after
    }

    pub fn trigger_time(&self) -> Real {
        self.trigger_time
    }

    pub fn evaluate(&self, t: Real) -> Real {
        if t <= self.trigger_time {
            self.value_before
        } else {
            self.value_after
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn boundary_law(
            before in -10.0_f64..10.0,
            after in -10.0_f64..10.0,
            trigger in 1800.0_f64..2300.0,
            eps in 1e-9_f64..100.0,
        ) {
            let sw = SwitchFunction::new(SwitchName::Poln, before, after, trigger).unwrap();
            prop_assert_eq!(sw.evaluate(trigger), before);
            prop_assert_eq!(sw.evaluate(trigger + eps), after);
            prop_assert_eq!(sw.evaluate(trigger - eps), before);
        }
    }
}

//! Model constants and initial conditions.
//!
//! Both are plain data fixed for the lifetime of a run. Serialized field
//! names are the short model codes (`la`, `pdn`, `pi`, ...) used by scenario
//! files.

use crate::{CoreResult, Real, ensure_finite};

/// Scalar constants that parameterize the model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ModelConstants {
    /// LA - land area [square kilometers]
    #[cfg_attr(feature = "serde", serde(rename = "la"))]
    pub land_area: Real,
    /// PDN - population density normal [people/square kilometer]
    #[cfg_attr(feature = "serde", serde(rename = "pdn"))]
    pub population_density_normal: Real,
    /// CIAFN - capital-investment-in-agriculture fraction normal []
    #[cfg_attr(feature = "serde", serde(rename = "ciafn"))]
    pub agriculture_fraction_normal: Real,
    /// ECIRN - effective-capital-investment ratio normal [capital units/person]
    #[cfg_attr(feature = "serde", serde(rename = "ecirn"))]
    pub effective_capital_ratio_normal: Real,
    /// CIAFT - agriculture fraction adjustment time [years]
    #[cfg_attr(feature = "serde", serde(rename = "ciaft"))]
    pub agriculture_adjustment_time: Real,
    /// POLS - pollution standard [pollution units]
    #[cfg_attr(feature = "serde", serde(rename = "pols"))]
    pub pollution_standard: Real,
    /// FN - food normal [food units/person/year]
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    pub food_normal: Real,
    /// QLS - quality-of-life standard [satisfaction units]
    #[cfg_attr(feature = "serde", serde(rename = "qls"))]
    pub quality_of_life_standard: Real,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            land_area: 135e6,
            population_density_normal: 26.5,
            agriculture_fraction_normal: 0.3,
            effective_capital_ratio_normal: 1.0,
            agriculture_adjustment_time: 15.0,
            pollution_standard: 3.6e9,
            food_normal: 1.0,
            quality_of_life_standard: 1.0,
        }
    }
}

impl ModelConstants {
    pub fn validate(&self) -> CoreResult<()> {
        ensure_finite(self.land_area, "la")?;
        ensure_finite(self.population_density_normal, "pdn")?;
        ensure_finite(self.agriculture_fraction_normal, "ciafn")?;
        ensure_finite(self.effective_capital_ratio_normal, "ecirn")?;
        ensure_finite(self.agriculture_adjustment_time, "ciaft")?;
        ensure_finite(self.pollution_standard, "pols")?;
        ensure_finite(self.food_normal, "fn")?;
        ensure_finite(self.quality_of_life_standard, "qls")?;
        Ok(())
    }
}

/// Initial values of the five stocks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct InitialConditions {
    /// PI - population [people]
    #[cfg_attr(feature = "serde", serde(rename = "pi"))]
    pub population: Real,
    /// NRI - natural resources [natural resource units]
    #[cfg_attr(feature = "serde", serde(rename = "nri"))]
    pub natural_resources: Real,
    /// CII - capital investment [capital units]
    #[cfg_attr(feature = "serde", serde(rename = "cii"))]
    pub capital_investment: Real,
    /// POLI - pollution [pollution units]
    #[cfg_attr(feature = "serde", serde(rename = "poli"))]
    pub pollution: Real,
    /// CIAFI - capital-investment-in-agriculture fraction []
    #[cfg_attr(feature = "serde", serde(rename = "ciafi"))]
    pub agriculture_fraction: Real,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            population: 1.65e9,
            natural_resources: 900e9,
            capital_investment: 0.4e9,
            pollution: 0.2e9,
            agriculture_fraction: 0.2,
        }
    }
}

impl InitialConditions {
    pub fn validate(&self) -> CoreResult<()> {
        ensure_finite(self.population, "pi")?;
        ensure_finite(self.natural_resources, "nri")?;
        ensure_finite(self.capital_investment, "cii")?;
        ensure_finite(self.pollution, "poli")?;
        ensure_finite(self.agriculture_fraction, "ciafi")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    #[test]
    fn defaults_are_valid() {
        ModelConstants::default().validate().unwrap();
        InitialConditions::default().validate().unwrap();
    }

    #[test]
    fn non_finite_constant_is_named() {
        let constants = ModelConstants {
            pollution_standard: f64::NAN,
            ..ModelConstants::default()
        };
        assert!(matches!(
            constants.validate(),
            Err(CoreError::NonFinite { what: "pols", .. })
        ));
    }

    #[test]
    fn non_finite_initial_condition_is_named() {
        let initial = InitialConditions {
            natural_resources: f64::INFINITY,
            ..InitialConditions::default()
        };
        assert!(matches!(
            initial.validate(),
            Err(CoreError::NonFinite { what: "nri", .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_documents_fill_defaults() {
        let constants: ModelConstants = serde_json::from_str(r#"{"la": 1.0e8}"#).unwrap();
        assert_eq!(constants.land_area, 1.0e8);
        assert_eq!(constants.population_density_normal, 26.5);

        let err = serde_json::from_str::<InitialConditions>(r#"{"bogus": 1.0}"#);
        assert!(err.is_err());
    }
}

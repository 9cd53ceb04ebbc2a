//! Simulated quantities.

use std::fmt;
use std::str::FromStr;

use crate::SimError;

/// Every time series a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    /// P - Population [people]. Stock.
    Population,
    /// BR - Birth rate [people/year]
    BirthRate,
    /// DR - Death rate [people/year]
    DeathRate,
    /// CR - Crowding ratio []
    CrowdingRatio,
    /// NR - Natural resources [natural resource units]. Stock.
    NaturalResources,
    /// NRUR - Natural-resource usage rate [natural resource units/year]
    NaturalResourceUsageRate,
    /// NRFR - Natural-resource fraction remaining []
    NaturalResourceFractionRemaining,
    /// CI - Capital investment [capital units]. Stock.
    CapitalInvestment,
    /// CIR - Capital-investment ratio [capital units/person]
    CapitalInvestmentRatio,
    /// CIG - Capital-investment generation [capital units/year]
    CapitalInvestmentGeneration,
    /// CID - Capital-investment discard [capital units/year]
    CapitalInvestmentDiscard,
    /// CIRA - Capital-investment ratio in agriculture [capital units/person]
    CapitalInvestmentRatioAgriculture,
    /// MSL - Material standard of living []
    MaterialStandardOfLiving,
    /// ECIR - Effective-capital-investment ratio [capital units/person]
    EffectiveCapitalInvestmentRatio,
    /// CIAF - Capital-investment-in-agriculture fraction []. Stock.
    AgricultureFraction,
    /// FR - Food ratio []
    FoodRatio,
    /// POL - Pollution [pollution units]. Stock.
    Pollution,
    /// POLR - Pollution ratio []
    PollutionRatio,
    /// POLG - Pollution generation [pollution units/year]
    PollutionGeneration,
    /// POLA - Pollution absorption [pollution units/year]
    PollutionAbsorption,
    /// QL - Quality of life [satisfaction units]
    QualityOfLife,
}

impl Quantity {
    pub const COUNT: usize = 21;

    pub const ALL: [Quantity; Self::COUNT] = [
        Self::Population,
        Self::BirthRate,
        Self::DeathRate,
        Self::CrowdingRatio,
        Self::NaturalResources,
        Self::NaturalResourceUsageRate,
        Self::NaturalResourceFractionRemaining,
        Self::CapitalInvestment,
        Self::CapitalInvestmentRatio,
        Self::CapitalInvestmentGeneration,
        Self::CapitalInvestmentDiscard,
        Self::CapitalInvestmentRatioAgriculture,
        Self::MaterialStandardOfLiving,
        Self::EffectiveCapitalInvestmentRatio,
        Self::AgricultureFraction,
        Self::FoodRatio,
        Self::Pollution,
        Self::PollutionRatio,
        Self::PollutionGeneration,
        Self::PollutionAbsorption,
        Self::QualityOfLife,
    ];

    /// The five integrated state variables.
    pub const STOCKS: [Quantity; 5] = [
        Self::Population,
        Self::NaturalResources,
        Self::CapitalInvestment,
        Self::Pollution,
        Self::AgricultureFraction,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Population => "P",
            Self::BirthRate => "BR",
            Self::DeathRate => "DR",
            Self::CrowdingRatio => "CR",
            Self::NaturalResources => "NR",
            Self::NaturalResourceUsageRate => "NRUR",
            Self::NaturalResourceFractionRemaining => "NRFR",
            Self::CapitalInvestment => "CI",
            Self::CapitalInvestmentRatio => "CIR",
            Self::CapitalInvestmentGeneration => "CIG",
            Self::CapitalInvestmentDiscard => "CID",
            Self::CapitalInvestmentRatioAgriculture => "CIRA",
            Self::MaterialStandardOfLiving => "MSL",
            Self::EffectiveCapitalInvestmentRatio => "ECIR",
            Self::AgricultureFraction => "CIAF",
            Self::FoodRatio => "FR",
            Self::Pollution => "POL",
            Self::PollutionRatio => "POLR",
            Self::PollutionGeneration => "POLG",
            Self::PollutionAbsorption => "POLA",
            Self::QualityOfLife => "QL",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Population => "Population",
            Self::BirthRate => "Birth rate",
            Self::DeathRate => "Death rate",
            Self::CrowdingRatio => "Crowding ratio",
            Self::NaturalResources => "Natural resources",
            Self::NaturalResourceUsageRate => "Natural-resource usage rate",
            Self::NaturalResourceFractionRemaining => "Natural-resource fraction remaining",
            Self::CapitalInvestment => "Capital investment",
            Self::CapitalInvestmentRatio => "Capital-investment ratio",
            Self::CapitalInvestmentGeneration => "Capital-investment generation",
            Self::CapitalInvestmentDiscard => "Capital-investment discard",
            Self::CapitalInvestmentRatioAgriculture => "Capital-investment ratio in agriculture",
            Self::MaterialStandardOfLiving => "Material standard of living",
            Self::EffectiveCapitalInvestmentRatio => "Effective-capital-investment ratio",
            Self::AgricultureFraction => "Capital-investment-in-agriculture fraction",
            Self::FoodRatio => "Food ratio",
            Self::Pollution => "Pollution",
            Self::PollutionRatio => "Pollution ratio",
            Self::PollutionGeneration => "Pollution generation",
            Self::PollutionAbsorption => "Pollution absorption",
            Self::QualityOfLife => "Quality of life",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Population => "people",
            Self::BirthRate | Self::DeathRate => "people/year",
            Self::NaturalResources => "natural resource units",
            Self::NaturalResourceUsageRate => "natural resource units/year",
            Self::CapitalInvestment => "capital units",
            Self::CapitalInvestmentRatio
            | Self::CapitalInvestmentRatioAgriculture
            | Self::EffectiveCapitalInvestmentRatio => "capital units/person",
            Self::CapitalInvestmentGeneration | Self::CapitalInvestmentDiscard => {
                "capital units/year"
            }
            Self::Pollution => "pollution units",
            Self::PollutionGeneration | Self::PollutionAbsorption => "pollution units/year",
            Self::QualityOfLife => "satisfaction units",
            Self::CrowdingRatio
            | Self::NaturalResourceFractionRemaining
            | Self::MaterialStandardOfLiving
            | Self::AgricultureFraction
            | Self::FoodRatio
            | Self::PollutionRatio => "dimensionless",
        }
    }

    pub fn is_stock(self) -> bool {
        Self::STOCKS.contains(&self)
    }

    /// Flows defined only from a previous step; index 0 holds no value.
    pub fn is_lookback_flow(self) -> bool {
        matches!(
            self,
            Self::BirthRate
                | Self::DeathRate
                | Self::NaturalResourceUsageRate
                | Self::CapitalInvestmentGeneration
                | Self::CapitalInvestmentDiscard
                | Self::QualityOfLife
        )
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Quantity {
    type Err = SimError;

    /// Parse a model code, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::Configuration {
                what: format!("unknown quantity: {s}"),
            })
    }
}

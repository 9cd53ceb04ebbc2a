//! Closed sets of function names.
//!
//! Names display and parse as their upper-case model codes (`BRCM`,
//! `NRUN`, ...).

use std::fmt;
use std::str::FromStr;

use crate::FunctionError;

/// Lookup tables consulted by the step engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    /// Birth-rate-from-crowding multiplier
    Brcm,
    /// Birth-rate-from-food multiplier
    Brfm,
    /// Birth-rate-from-material multiplier
    Brmm,
    /// Birth-rate-from-pollution multiplier
    Brpm,
    /// Death-rate-from-crowding multiplier
    Drcm,
    /// Death-rate-from-food multiplier
    Drfm,
    /// Death-rate-from-material multiplier
    Drmm,
    /// Death-rate-from-pollution multiplier
    Drpm,
    /// Capital fraction indicated by food ratio
    Cfifr,
    /// Capital-investment multiplier
    Cim,
    /// Capital-investment-from-quality ratio
    Ciqr,
    /// Food-from-crowding multiplier
    Fcm,
    /// Food potential from capital investment
    Fpci,
    /// Food-from-pollution multiplier
    Fpm,
    /// Natural-resource-extraction multiplier
    Nrem,
    /// Natural-resource-from-material multiplier
    Nrmm,
    /// Pollution-absorption time
    Polat,
    /// Pollution-from-capital multiplier
    Polcm,
    /// Quality of life from crowding
    Qlc,
    /// Quality of life from food
    Qlf,
    /// Quality of life from material
    Qlm,
    /// Quality of life from pollution
    Qlp,
}

impl TableName {
    pub const COUNT: usize = 22;

    pub const ALL: [TableName; Self::COUNT] = [
        Self::Brcm,
        Self::Brfm,
        Self::Brmm,
        Self::Brpm,
        Self::Drcm,
        Self::Drfm,
        Self::Drmm,
        Self::Drpm,
        Self::Cfifr,
        Self::Cim,
        Self::Ciqr,
        Self::Fcm,
        Self::Fpci,
        Self::Fpm,
        Self::Nrem,
        Self::Nrmm,
        Self::Polat,
        Self::Polcm,
        Self::Qlc,
        Self::Qlf,
        Self::Qlm,
        Self::Qlp,
    ];

    /// Position in [`TableName::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Brcm => "BRCM",
            Self::Brfm => "BRFM",
            Self::Brmm => "BRMM",
            Self::Brpm => "BRPM",
            Self::Drcm => "DRCM",
            Self::Drfm => "DRFM",
            Self::Drmm => "DRMM",
            Self::Drpm => "DRPM",
            Self::Cfifr => "CFIFR",
            Self::Cim => "CIM",
            Self::Ciqr => "CIQR",
            Self::Fcm => "FCM",
            Self::Fpci => "FPCI",
            Self::Fpm => "FPM",
            Self::Nrem => "NREM",
            Self::Nrmm => "NRMM",
            Self::Polat => "POLAT",
            Self::Polcm => "POLCM",
            Self::Qlc => "QLC",
            Self::Qlf => "QLF",
            Self::Qlm => "QLM",
            Self::Qlp => "QLP",
        }
    }

    /// Code of the quantity the table is indexed by.
    pub fn input_code(self) -> &'static str {
        match self {
            Self::Brcm | Self::Drcm | Self::Fcm | Self::Qlc => "CR",
            Self::Brfm | Self::Drfm | Self::Cfifr | Self::Qlf => "FR",
            Self::Brmm | Self::Drmm | Self::Cim | Self::Nrmm | Self::Qlm => "MSL",
            Self::Brpm | Self::Drpm | Self::Fpm | Self::Polat | Self::Qlp => "POLR",
            Self::Ciqr => "QLM/QLF",
            Self::Fpci => "CIRA",
            Self::Nrem => "NRFR",
            Self::Polcm => "CIR",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TableName {
    type Err = FunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.code() == s)
            .ok_or_else(|| FunctionError::UnknownName {
                kind: "table",
                name: s.to_string(),
            })
    }
}


/// Time-triggered policy switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SwitchName {
    /// Birth rate normal [fraction/year]
    Brn,
    /// Death rate normal [fraction/year]
    Drn,
    /// Capital-investment discard normal [fraction/year]
    Cidn,
    /// Capital-investment generation normal [fraction/year]
    Cign,
    /// Food coefficient []
    Fc,
    /// Natural-resource usage normal [natural resource units/person/year]
    Nrun,
    /// Pollution normal [pollution units/person/year]
    Poln,
}

impl SwitchName {
    pub const COUNT: usize = 7;

    pub const ALL: [SwitchName; Self::COUNT] = [
        Self::Brn,
        Self::Drn,
        Self::Cidn,
        Self::Cign,
        Self::Fc,
        Self::Nrun,
        Self::Poln,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Brn => "BRN",
            Self::Drn => "DRN",
            Self::Cidn => "CIDN",
            Self::Cign => "CIGN",
            Self::Fc => "FC",
            Self::Nrun => "NRUN",
            Self::Poln => "POLN",
        }
    }

    /// Key holding the after-trigger value in switch documents (`BRN1`, ...).
    pub fn after_key(self) -> String {
        format!("{}1", self.code())
    }
}

impl fmt::Display for SwitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SwitchName {
    type Err = FunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.code() == s)
            .ok_or_else(|| FunctionError::UnknownName {
                kind: "switch",
                name: s.to_string(),
            })
    }
}

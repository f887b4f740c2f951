//! Time units and the unit conversion table.
//!
//! The table is ordered coarsest to finest. That order drives both the
//! placeholder substitution in [`crate::template`] and the remainder cascade
//! in [`crate::calendar`], so it must never change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;

/// A calendar or clock unit, ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

/// One row of the conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// Two-character marker substituted in templates (e.g. `%h`).
    pub placeholder: &'static str,
    /// Fixed approximation of the unit length in seconds.
    pub seconds: i64,
    pub unit: TimeUnit,
    /// Letter used in duration notation (e.g. `h`).
    pub abbreviation: char,
}

/// The conversion table, coarsest first.
pub const CONVERSIONS: [Conversion; 7] = [
    Conversion {
        placeholder: "%y",
        seconds: 31_536_000,
        unit: TimeUnit::Year,
        abbreviation: 'Y',
    },
    Conversion {
        placeholder: "%M",
        seconds: 2_592_000,
        unit: TimeUnit::Month,
        abbreviation: 'M',
    },
    Conversion {
        placeholder: "%w",
        seconds: 604_800,
        unit: TimeUnit::Week,
        abbreviation: 'W',
    },
    Conversion {
        placeholder: "%d",
        seconds: 86_400,
        unit: TimeUnit::Day,
        abbreviation: 'D',
    },
    Conversion {
        placeholder: "%h",
        seconds: 3_600,
        unit: TimeUnit::Hour,
        abbreviation: 'h',
    },
    Conversion {
        placeholder: "%m",
        seconds: 60,
        unit: TimeUnit::Minute,
        abbreviation: 'm',
    },
    Conversion {
        placeholder: "%s",
        seconds: 1,
        unit: TimeUnit::Second,
        abbreviation: 's',
    },
];

impl TimeUnit {
    /// Every unit, coarsest first.
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Week,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
    ];

    /// The conversion table row for this unit.
    pub fn conversion(self) -> &'static Conversion {
        &CONVERSIONS[self as usize]
    }

    pub fn seconds(self) -> i64 {
        self.conversion().seconds
    }

    pub fn placeholder(self) -> &'static str {
        self.conversion().placeholder
    }

    pub fn abbreviation(self) -> char {
        self.conversion().abbreviation
    }

    /// The next finer unit, or `None` for [`TimeUnit::Second`].
    pub fn finer(self) -> Option<TimeUnit> {
        Self::ALL.get(self as usize + 1).copied()
    }

    /// Whether the unit is written in the time segment (after `T`) of a duration.
    pub fn is_time_scale(self) -> bool {
        self >= TimeUnit::Hour
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Year => "year",
            TimeUnit::Month => "month",
            TimeUnit::Week => "week",
            TimeUnit::Day => "day",
            TimeUnit::Hour => "hour",
            TimeUnit::Minute => "minute",
            TimeUnit::Second => "second",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for TimeUnit {
    type Error = FuzzyError;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or_else(|| FuzzyError::InvalidUnit(format!("no unit with ordinal {ordinal}")))
    }
}

impl FromStr for TimeUnit {
    type Err = FuzzyError;

    /// Parse a singular or plural unit name, case-insensitively ("day", "Hours").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let singular = name.strip_suffix('s').unwrap_or(&name);
        Self::ALL
            .iter()
            .copied()
            .find(|unit| unit.name() == singular)
            .ok_or_else(|| FuzzyError::InvalidUnit(format!("'{}'", s.trim())))
    }
}

/// Look up the unit whose abbreviation is exactly `abbreviation`.
///
/// The match is case-sensitive: `M` is a month, `m` a minute.
///
/// # Errors
///
/// Returns [`FuzzyError::MalformedDuration`] for a letter that is not in the table.
pub fn find_unit(abbreviation: char) -> Result<TimeUnit, FuzzyError> {
    CONVERSIONS
        .iter()
        .find(|c| c.abbreviation == abbreviation)
        .map(|c| c.unit)
        .ok_or_else(|| {
            FuzzyError::MalformedDuration(format!("unknown unit abbreviation '{abbreviation}'"))
        })
}

//! Datetime and timezone arguments.
//!
//! The engine works on wall-clock time. RFC 3339 inputs carry an offset, so
//! they are converted to the wall clock of the selected timezone; naive inputs
//! are taken as already being wall-clock time there.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Output format for datetimes printed by the CLI.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse an IANA timezone name.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| anyhow!("invalid timezone '{s}'"))
}

/// Parse a datetime argument into wall-clock time in `tz`.
pub fn parse_datetime(s: &str, tz: Tz) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    bail!("invalid datetime '{s}' (expected RFC 3339, 'YYYY-MM-DDTHH:MM[:SS]' or 'YYYY-MM-DD')")
}

/// The current wall-clock time in `tz`.
pub fn now_in(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

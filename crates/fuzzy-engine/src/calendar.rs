//! Calendar-aware arithmetic on wall-clock datetimes.
//!
//! Months and years have no fixed length, so a fractional offset cannot be
//! turned into seconds up front. [`add_time`] applies the whole part of the
//! magnitude to its calendar field, then carries the fractional remainder into
//! the next finer unit, measured against the date it has already shifted to:
//! half a month landing in March is 15.5 days, landing in February 14 days.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

use crate::duration::Duration;
use crate::error::FuzzyError;
use crate::unit::TimeUnit;

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

/// Number of days in `month` (1-12) of `year`. Any other month has 0 days.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Add `magnitude` units of `unit` to `date`.
///
/// The whole part (`floor(magnitude)`) is applied to the calendar field. A
/// positive fractional remainder is rounded to 3 decimals and cascaded into
/// the next finer unit: years into days of the resulting year, months into
/// days of the resulting month, weeks into 7 days, days into 24 hours, hours
/// into 60 minutes, minutes into 60 seconds. Seconds are rounded to the
/// nearest whole second.
///
/// Month and year shifts keep the day of month; a day that does not exist in
/// the target month rolls over into the following one (Jan 31 + 1 month is
/// Mar 3 in a common year).
///
/// # Errors
///
/// Returns [`FuzzyError::InvalidMagnitude`] for a NaN or infinite magnitude and
/// [`FuzzyError::DateOutOfRange`] when the result cannot be represented.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fuzzy_engine::{add_time, TimeUnit};
///
/// let jan1 = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let shifted = add_time(jan1, 2.5, TimeUnit::Month).unwrap();
/// assert_eq!(shifted.to_string(), "2013-03-16 12:00:00");
/// ```
pub fn add_time(
    date: NaiveDateTime,
    magnitude: f64,
    unit: TimeUnit,
) -> Result<NaiveDateTime, FuzzyError> {
    if !magnitude.is_finite() {
        return Err(FuzzyError::InvalidMagnitude(format!(
            "{magnitude} {unit}s is not a finite amount"
        )));
    }

    let mut date = date;
    let mut magnitude = magnitude;
    let mut unit = unit;

    loop {
        if unit == TimeUnit::Second {
            let seconds = whole_units(magnitude.round(), unit)?;
            return shift(date, seconds, unit);
        }

        let whole = magnitude.floor();
        let remainder = magnitude - whole;
        date = shift(date, whole_units(whole, unit)?, unit)?;

        if remainder <= 0.0 {
            return Ok(date);
        }

        let (finer, scale) = match unit {
            TimeUnit::Year => (TimeUnit::Day, days_in_year(date.year())),
            TimeUnit::Month => (TimeUnit::Day, days_in_month(date.year(), date.month())),
            TimeUnit::Week => (TimeUnit::Day, 7),
            TimeUnit::Day => (TimeUnit::Hour, 24),
            TimeUnit::Hour => (TimeUnit::Minute, 60),
            TimeUnit::Minute | TimeUnit::Second => (TimeUnit::Second, 60),
        };
        magnitude = round_to_millis(remainder) * f64::from(scale);
        unit = finer;
    }
}

/// Apply every component of `duration` in order, each to the previous result.
pub fn apply_duration(
    date: NaiveDateTime,
    duration: &Duration,
) -> Result<NaiveDateTime, FuzzyError> {
    duration
        .iter()
        .try_fold(date, |acc, c| add_time(acc, c.magnitude, c.unit))
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Round to 3 decimal places to keep float drift bounded across cascades.
fn round_to_millis(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn whole_units(value: f64, unit: TimeUnit) -> Result<i64, FuzzyError> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if value >= -(i64::MAX as f64) && value < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(out_of_range(value, unit))
    }
}

fn out_of_range(amount: impl std::fmt::Display, unit: TimeUnit) -> FuzzyError {
    FuzzyError::DateOutOfRange(format!("cannot shift by {amount} {unit}s"))
}

/// Apply a whole number of units to the matching calendar field.
fn shift(date: NaiveDateTime, amount: i64, unit: TimeUnit) -> Result<NaiveDateTime, FuzzyError> {
    if amount == 0 {
        return Ok(date);
    }

    let delta = match unit {
        TimeUnit::Year => {
            let months = amount
                .checked_mul(12)
                .ok_or_else(|| out_of_range(amount, unit))?;
            return shift_months(date, months).ok_or_else(|| out_of_range(amount, unit));
        }
        TimeUnit::Month => {
            return shift_months(date, amount).ok_or_else(|| out_of_range(amount, unit));
        }
        TimeUnit::Week => amount.checked_mul(7).and_then(TimeDelta::try_days),
        TimeUnit::Day => TimeDelta::try_days(amount),
        TimeUnit::Hour => TimeDelta::try_hours(amount),
        TimeUnit::Minute => TimeDelta::try_minutes(amount),
        TimeUnit::Second => TimeDelta::try_seconds(amount),
    };

    delta
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| out_of_range(amount, unit))
}

/// Move `months` calendar months, keeping day of month and time of day.
/// Days past the end of the target month spill into the next month.
fn shift_months(date: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let current = i64::from(date.year()) * 12 + i64::from(date.month0());
    let target = current.checked_add(months)?;
    let year = i32::try_from(target.div_euclid(12)).ok()?;
    let month = u32::try_from(target.rem_euclid(12)).ok()? + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let day = first.checked_add_signed(TimeDelta::try_days(i64::from(date.day0()))?)?;
    Some(day.and_time(date.time()))
}

// ── Tests ───────────────────────────────────────────────────────────────────

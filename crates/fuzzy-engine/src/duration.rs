//! Duration notation and its parsed form.
//!
//! A duration is written ISO-8601 style: an optional `P`, date-scale
//! components, then an optional `T` followed by time-scale components, each
//! component being `<number><letter>`:
//!
//! ```text
//! P1Y2WT2M3S   1 year, 2 weeks, 2 minutes, 3 seconds
//! P2.5M        2.5 months
//! 0.6D         0.6 days (the P is optional)
//! T-30S        30 seconds earlier
//! ```
//!
//! The whole string is lowercased first. Letters before `T` are then upcased
//! and looked up in the conversion table (so `m` there means months); letters
//! after `T` are looked up lowercase (so `m` there means minutes).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::unit::{find_unit, TimeUnit};

/// A signed, possibly fractional, amount of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationComponent {
    pub magnitude: f64,
    pub unit: TimeUnit,
}

impl DurationComponent {
    pub fn new(magnitude: f64, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }
}

/// An ordered list of components, kept in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(Vec<DurationComponent>);

impl Duration {
    pub fn new(components: Vec<DurationComponent>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[DurationComponent] {
        &self.0
    }

    pub fn push(&mut self, component: DurationComponent) {
        self.0.push(component);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DurationComponent> {
        self.0.iter()
    }
}

impl From<Vec<DurationComponent>> for Duration {
    fn from(components: Vec<DurationComponent>) -> Self {
        Self(components)
    }
}

impl FromIterator<DurationComponent> for Duration {
    fn from_iter<I: IntoIterator<Item = DurationComponent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Duration {
    type Item = &'a DurationComponent;
    type IntoIter = std::slice::Iter<'a, DurationComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for Duration {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

/// Canonical notation: `P`, the date-scale components, then `T` and the
/// time-scale components if any. Date letters are uppercase, time letters
/// lowercase, e.g. `P1Y2WT2m3s`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        for c in self.0.iter().filter(|c| !c.unit.is_time_scale()) {
            write!(f, "{}{}", c.magnitude, c.unit.abbreviation())?;
        }
        let mut time = self.0.iter().filter(|c| c.unit.is_time_scale()).peekable();
        if time.peek().is_some() {
            f.write_str("T")?;
            for c in time {
                write!(f, "{}{}", c.magnitude, c.unit.abbreviation())?;
            }
        }
        Ok(())
    }
}

/// Either a duration string or already-parsed components.
///
/// Accepted by the rule registration methods and by rule files, where a
/// duration may be written as `"T30S"` or as
/// `[{"magnitude": 30, "unit": "second"}]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationSpec {
    Text(String),
    Components(Vec<DurationComponent>),
}

impl DurationSpec {
    /// Parse the text form, or check and wrap the component form.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MalformedDuration`] if the text does not parse and
    /// [`FuzzyError::InvalidMagnitude`] if a component's magnitude is NaN or
    /// infinite.
    pub fn into_duration(self) -> Result<Duration, FuzzyError> {
        match self {
            DurationSpec::Text(text) => parse_duration(&text),
            DurationSpec::Components(components) => {
                if let Some(bad) = components.iter().find(|c| !c.magnitude.is_finite()) {
                    return Err(FuzzyError::InvalidMagnitude(format!(
                        "{} {}s is not a finite amount",
                        bad.magnitude, bad.unit
                    )));
                }
                Ok(Duration(components))
            }
        }
    }
}

impl From<&str> for DurationSpec {
    fn from(text: &str) -> Self {
        DurationSpec::Text(text.to_string())
    }
}

impl From<String> for DurationSpec {
    fn from(text: String) -> Self {
        DurationSpec::Text(text)
    }
}

impl From<Vec<DurationComponent>> for DurationSpec {
    fn from(components: Vec<DurationComponent>) -> Self {
        DurationSpec::Components(components)
    }
}

impl From<Duration> for DurationSpec {
    fn from(duration: Duration) -> Self {
        DurationSpec::Components(duration.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Scale {
    Date,
    Time,
}

/// Parse duration notation into its components.
///
/// # Errors
///
/// Returns [`FuzzyError::MalformedDuration`] when a unit letter is not in the
/// conversion table, when a magnitude is missing or is not a number, when a
/// number is left without a unit at the end of a segment, or when the time
/// marker `T` appears more than once.
///
/// # Examples
///
/// ```
/// use fuzzy_engine::{parse_duration, TimeUnit};
///
/// let duration = parse_duration("P2.5M").unwrap();
/// assert_eq!(duration.components()[0].magnitude, 2.5);
/// assert_eq!(duration.components()[0].unit, TimeUnit::Month);
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, FuzzyError> {
    let lowered = text.trim().to_lowercase();
    let mut segments = lowered.split('t');
    let period = segments.next().unwrap_or_default();
    let time = segments.next();
    if segments.next().is_some() {
        return Err(FuzzyError::MalformedDuration(format!(
            "more than one time marker in '{}'",
            text.trim()
        )));
    }

    let period = period.strip_prefix('p').unwrap_or(period);
    let mut components = Vec::new();
    scan_segment(text, period, Scale::Date, &mut components)?;
    if let Some(time) = time {
        scan_segment(text, time, Scale::Time, &mut components)?;
    }

    Ok(Duration(components))
}

/// Scan one segment, pushing a component at every unit letter.
fn scan_segment(
    original: &str,
    segment: &str,
    scale: Scale,
    out: &mut Vec<DurationComponent>,
) -> Result<(), FuzzyError> {
    let mut number = String::new();

    for ch in segment.chars() {
        if !ch.is_alphabetic() {
            number.push(ch);
            continue;
        }

        let letter = match scale {
            Scale::Date => ch.to_ascii_uppercase(),
            Scale::Time => ch,
        };
        let unit = find_unit(letter).map_err(|_| {
            FuzzyError::MalformedDuration(format!(
                "unknown unit '{letter}' in '{}'",
                original.trim()
            ))
        })?;
        let magnitude = parse_magnitude(&number, ch, original)?;
        out.push(DurationComponent::new(magnitude, unit));
        number.clear();
    }

    if !number.trim().is_empty() {
        return Err(FuzzyError::MalformedDuration(format!(
            "number without unit at end of '{}'",
            original.trim()
        )));
    }

    Ok(())
}

fn parse_magnitude(number: &str, unit: char, original: &str) -> Result<f64, FuzzyError> {
    let number = number.trim();
    if number.is_empty() {
        return Err(FuzzyError::MalformedDuration(format!(
            "expected number before '{unit}' in '{}'",
            original.trim()
        )));
    }
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(FuzzyError::MalformedDuration(format!(
            "number '{number}' is too large in '{}'",
            original.trim()
        ))),
        Err(_) => Err(FuzzyError::MalformedDuration(format!(
            "invalid number '{number}' in '{}'",
            original.trim()
        ))),
    }
}

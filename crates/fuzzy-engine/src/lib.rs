//! # fuzzy-engine
//!
//! Fuzzy relative timestamps ("2 hours ago", "yesterday") chosen from
//! user-registered rules.
//!
//! Rules pair a template with an ISO-8601-like duration. Evaluating a start
//! and a reference datetime materializes each rule's duration against the
//! start with calendar-aware arithmetic, picks the first rule that fits, and
//! fills the template's unit placeholders from the elapsed seconds. All
//! functions are pure and take the reference time explicitly; nothing here
//! reads the system clock.
//!
//! ## Modules
//!
//! - [`unit`] - Time units and the unit conversion table
//! - [`duration`] - Duration notation (`P1Y2WT2M3S`) → ordered components
//! - [`calendar`] - Leap years, month lengths, fractional unit cascading
//! - [`template`] - Placeholder substitution (`%y %M %w %d %h %m %s`)
//! - [`rules`] - at/before/after rule sets and evaluation
//! - [`error`] - Error types

pub mod calendar;
pub mod duration;
pub mod error;
pub mod rules;
pub mod template;
pub mod unit;

pub use calendar::{add_time, apply_duration, days_in_month, days_in_year, is_leap_year};
pub use duration::{parse_duration, Duration, DurationComponent, DurationSpec};
pub use error::FuzzyError;
pub use rules::{
    delta_seconds, Fuzzy, FuzzyOptions, Rule, RuleKind, RuleMatch, DEFAULT_FALLBACK_FORMAT,
};
pub use template::render_template;
pub use unit::{find_unit, Conversion, TimeUnit, CONVERSIONS};

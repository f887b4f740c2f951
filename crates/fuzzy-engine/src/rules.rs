//! Rule registration and fuzzy timestamp evaluation.
//!
//! A [`Fuzzy`] holds three ordered rule lists:
//!
//! - **at**: fires when `start + duration` lands exactly on the reference time
//!   (to the second), in either direction.
//! - **before**: fires while the elapsed time has not yet reached the duration.
//! - **after**: fires once the elapsed time has passed the duration.
//!
//! [`Fuzzy::build`] checks every at rule first, then (only when the reference
//! is after the start) the before rules, then the after rules. Within a list
//! the first registered rule that fits wins. When nothing fits, the start date
//! is formatted with [`FuzzyOptions::fallback_format`].
//!
//! ```
//! use chrono::NaiveDate;
//! use fuzzy_engine::Fuzzy;
//!
//! let mut fuzzy = Fuzzy::new();
//! fuzzy.register_before("%h hours ago", "T16H").unwrap();
//! fuzzy.register_before("yesterday", "1D").unwrap();
//!
//! let start = NaiveDate::from_ymd_opt(2013, 10, 22).unwrap().and_hms_opt(12, 54, 58).unwrap();
//! let now = NaiveDate::from_ymd_opt(2013, 10, 22).unwrap().and_hms_opt(14, 54, 58).unwrap();
//! assert_eq!(fuzzy.build(start, now).unwrap(), "2 hours ago");
//! ```

use std::fmt::Write as _;

use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::calendar::{add_time, apply_duration};
use crate::duration::{Duration, DurationSpec};
use crate::error::FuzzyError;
use crate::template::render_template;

/// Which list a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    At,
    Before,
    After,
}

/// A template paired with the duration that triggers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleSpec")]
pub struct Rule {
    template: String,
    duration: Duration,
}

impl Rule {
    pub fn new(template: impl Into<String>, duration: Duration) -> Self {
        Self {
            template: template.into(),
            duration,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn duration(&self) -> &Duration {
        &self.duration
    }
}

/// Wire form of a rule: the duration may still be unparsed text.
#[derive(Deserialize)]
struct RuleSpec {
    template: String,
    duration: DurationSpec,
}

impl TryFrom<RuleSpec> for Rule {
    type Error = FuzzyError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        Ok(Rule::new(spec.template, spec.duration.into_duration()?))
    }
}

/// Options for [`Fuzzy::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyOptions {
    /// strftime pattern used for the start date when no rule matches.
    #[serde(default = "default_fallback_format")]
    pub fallback_format: String,
}

pub const DEFAULT_FALLBACK_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

fn default_fallback_format() -> String {
    DEFAULT_FALLBACK_FORMAT.to_string()
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            fallback_format: default_fallback_format(),
        }
    }
}

/// The rule that produced a fuzzy timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    pub kind: RuleKind,
    /// Position of the rule within its list.
    pub index: usize,
    /// Rounded seconds from start to reference (negative if start is later).
    pub delta_seconds: i64,
    /// The rendered template.
    pub text: String,
}

/// A set of fuzzy timestamp rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fuzzy {
    #[serde(rename = "at", default)]
    at_rules: Vec<Rule>,
    #[serde(rename = "before", default)]
    before_rules: Vec<Rule>,
    #[serde(rename = "after", default)]
    after_rules: Vec<Rule>,
    #[serde(default)]
    options: FuzzyOptions,
}

impl Fuzzy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FuzzyOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &FuzzyOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: FuzzyOptions) {
        self.options = options;
    }

    /// The rules of one kind, in registration order.
    pub fn rules(&self, kind: RuleKind) -> &[Rule] {
        match kind {
            RuleKind::At => &self.at_rules,
            RuleKind::Before => &self.before_rules,
            RuleKind::After => &self.after_rules,
        }
    }

    /// Append a rule to the list for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MalformedDuration`] if `duration` is text that does
    /// not parse, or [`FuzzyError::InvalidMagnitude`] if a component is NaN or
    /// infinite. The rule is not added in either case.
    pub fn register(
        &mut self,
        kind: RuleKind,
        template: impl Into<String>,
        duration: impl Into<DurationSpec>,
    ) -> Result<&mut Self, FuzzyError> {
        let rule = Rule::new(template, duration.into().into_duration()?);
        match kind {
            RuleKind::At => self.at_rules.push(rule),
            RuleKind::Before => self.before_rules.push(rule),
            RuleKind::After => self.after_rules.push(rule),
        }
        Ok(self)
    }

    /// Show `template` when the reference lands exactly `duration` after the start.
    pub fn register_at(
        &mut self,
        template: impl Into<String>,
        duration: impl Into<DurationSpec>,
    ) -> Result<&mut Self, FuzzyError> {
        self.register(RuleKind::At, template, duration)
    }

    /// Show `template` while less than `duration` has elapsed.
    pub fn register_before(
        &mut self,
        template: impl Into<String>,
        duration: impl Into<DurationSpec>,
    ) -> Result<&mut Self, FuzzyError> {
        self.register(RuleKind::Before, template, duration)
    }

    /// Show `template` once `duration` has elapsed.
    pub fn register_after(
        &mut self,
        template: impl Into<String>,
        duration: impl Into<DurationSpec>,
    ) -> Result<&mut Self, FuzzyError> {
        self.register(RuleKind::After, template, duration)
    }

    /// Describe the time from `start` to `reference`.
    ///
    /// Returns the rendered template of the first matching rule, or `start`
    /// formatted with the fallback format when no rule matches.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DateOutOfRange`] if a rule's duration moves the
    /// start outside the representable range, or [`FuzzyError::InvalidFormat`]
    /// if the fallback format cannot be rendered.
    pub fn build(
        &self,
        start: NaiveDateTime,
        reference: NaiveDateTime,
    ) -> Result<String, FuzzyError> {
        match self.evaluate(start, reference)? {
            Some(matched) => Ok(matched.text),
            None => self.format_fallback(start),
        }
    }

    /// Find the rule that applies to `start`/`reference`, if any.
    pub fn evaluate(
        &self,
        start: NaiveDateTime,
        reference: NaiveDateTime,
    ) -> Result<Option<RuleMatch>, FuzzyError> {
        let delta = delta_seconds(start, reference);

        for (index, rule) in self.at_rules.iter().enumerate() {
            let candidate = apply_duration(start, &rule.duration)?;
            tracing::trace!(kind = "at", index, %candidate, "candidate");
            if candidate.trunc_subsecs(0) == reference.trunc_subsecs(0) {
                return Ok(Some(self.matched(RuleKind::At, index, rule, delta)));
            }
        }

        if delta > 0 {
            for (index, rule) in self.before_rules.iter().enumerate() {
                let candidate = apply_duration(start, &rule.duration)?;
                tracing::trace!(kind = "before", index, %candidate, "candidate");
                if start <= reference && candidate >= reference {
                    return Ok(Some(self.matched(RuleKind::Before, index, rule, delta)));
                }
            }

            for (index, rule) in self.after_rules.iter().enumerate() {
                // Every component offsets the original start, so only the
                // last one decides the threshold.
                let mut candidate = start;
                for c in &rule.duration {
                    candidate = add_time(start, c.magnitude, c.unit)?;
                }
                tracing::trace!(kind = "after", index, %candidate, "candidate");
                if start <= reference && candidate <= reference {
                    return Ok(Some(self.matched(RuleKind::After, index, rule, delta)));
                }
            }
        }

        tracing::debug!(delta_seconds = delta, "no rule matched");
        Ok(None)
    }

    /// Format `start` with the fallback format.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidFormat`] if the pattern contains an
    /// unknown or unrenderable specifier.
    pub fn format_fallback(&self, start: NaiveDateTime) -> Result<String, FuzzyError> {
        let mut out = String::new();
        write!(out, "{}", start.format(&self.options.fallback_format)).map_err(|_| {
            FuzzyError::InvalidFormat(format!("'{}'", self.options.fallback_format))
        })?;
        Ok(out)
    }

    fn matched(&self, kind: RuleKind, index: usize, rule: &Rule, delta: i64) -> RuleMatch {
        tracing::debug!(?kind, index, delta_seconds = delta, "rule matched");
        RuleMatch {
            kind,
            index,
            delta_seconds: delta,
            text: render_template(delta, &rule.template),
        }
    }
}

/// Seconds from `start` to `reference`, rounded half up.
pub fn delta_seconds(start: NaiveDateTime, reference: NaiveDateTime) -> i64 {
    let millis = (reference - start).num_milliseconds();
    (millis + 500).div_euclid(1000)
}

// ── Tests ───────────────────────────────────────────────────────────────────

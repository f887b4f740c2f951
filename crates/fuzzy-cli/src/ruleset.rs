//! Building a rule set from a JSON file and inline flags.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use fuzzy_engine::{Fuzzy, RuleKind};

/// Split an inline `DURATION=TEMPLATE` rule.
///
/// Durations never contain `=`, so the first one separates the two halves and
/// the template may contain further `=` signs.
pub fn split_inline_rule(s: &str) -> Result<(&str, &str)> {
    s.split_once('=')
        .ok_or_else(|| anyhow!("inline rule '{s}' must be written as DURATION=TEMPLATE"))
}

/// Read a rule file, or start empty when no path is given.
pub fn load(path: Option<&Path>) -> Result<Fuzzy> {
    let Some(path) = path else {
        return Ok(Fuzzy::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    let fuzzy: Fuzzy = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse rules file {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        at = fuzzy.rules(RuleKind::At).len(),
        before = fuzzy.rules(RuleKind::Before).len(),
        after = fuzzy.rules(RuleKind::After).len(),
        "loaded rules file"
    );
    Ok(fuzzy)
}

/// Append inline rules of one kind, in the order given.
pub fn register_inline(fuzzy: &mut Fuzzy, kind: RuleKind, rules: &[String]) -> Result<()> {
    for raw in rules {
        let (duration, template) = split_inline_rule(raw)?;
        fuzzy
            .register(kind, template, duration)
            .with_context(|| format!("invalid {kind:?} rule '{raw}'"))?;
    }
    Ok(())
}

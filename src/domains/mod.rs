//! Built-in domain profiles
//!
//! Each submodule declares its rules as static tables, grouped and ordered
//! most specific first, and assembles them into a [`DomainProfile`].

pub mod config;
pub mod docker;
pub mod kotlin;
pub mod shell;
pub mod sql;
pub mod swift;

use crate::diagnostic::Severity;
use crate::domain::Domain;
use crate::profile::{DomainProfile, Fallback, RuleGroup};
use crate::rule::{Rule, RuleError, Suggestion};

/// (title, code, confidence)
type SuggestionDef = (&'static str, &'static str, f64);

/// Static rule declaration
struct RuleDef {
    id: &'static str,
    pattern: &'static str,
    severity: Severity,
    explanation: &'static str,
    suggestions: &'static [SuggestionDef],
}

fn suggestions(defs: &[SuggestionDef]) -> Result<Vec<Suggestion>, RuleError> {
    defs.iter()
        .map(|(title, code, confidence)| Suggestion::new(*title, *code, *confidence))
        .collect()
}

fn group(domain: Domain, name: &str, defs: &[RuleDef]) -> Result<RuleGroup, RuleError> {
    let rules = defs
        .iter()
        .map(|d| {
            Rule::new(
                domain,
                d.id,
                d.pattern,
                d.severity,
                d.explanation,
                suggestions(d.suggestions)?,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RuleGroup::new(name, rules))
}

fn fallback(explanation: &str, defs: &[SuggestionDef]) -> Result<Fallback, RuleError> {
    Fallback::new(explanation, suggestions(defs)?)
}

/// All six built-in profiles
pub fn builtin_profiles() -> Result<Vec<DomainProfile>, RuleError> {
    Ok(vec![
        config::profile()?,
        docker::profile()?,
        kotlin::profile()?,
        shell::profile()?,
        sql::profile()?,
        swift::profile()?,
    ])
}

//! Rule and suggestion definitions

use crate::diagnostic::Severity;
use crate::domain::Domain;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building rules, templates or suggestions
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern in '{id}': {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid confidence {0}: must be greater than 0 and at most 1")]
    InvalidConfidence(f64),

    #[error("Rule '{0}' has no suggestions")]
    EmptySuggestions(String),
}

/// A remediation hint attached to a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSuggestion")]
pub struct Suggestion {
    title: String,
    code: String,
    confidence: f64,
}

#[derive(Deserialize)]
struct RawSuggestion {
    title: String,
    #[serde(default)]
    code: String,
    confidence: f64,
}

impl TryFrom<RawSuggestion> for Suggestion {
    type Error = RuleError;

    fn try_from(raw: RawSuggestion) -> Result<Self, Self::Error> {
        Suggestion::new(raw.title, raw.code, raw.confidence)
    }
}

impl Suggestion {
    /// Create a suggestion; confidence must lie in (0, 1]
    pub fn new(
        title: impl Into<String>,
        code: impl Into<String>,
        confidence: f64,
    ) -> Result<Self, RuleError> {
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(RuleError::InvalidConfidence(confidence));
        }
        Ok(Self {
            title: title.into(),
            code: code.into(),
            confidence,
        })
    }

    /// Suggestion at the default fallback confidence of 0.5
    pub(crate) fn fallback(title: &str, code: &str) -> Self {
        Self {
            title: title.to_string(),
            code: code.to_string(),
            confidence: 0.5,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Illustrative snippet; may be empty
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence as a whole percentage
    pub fn percent(&self) -> String {
        format!("{:.0}", self.confidence * 100.0)
    }
}

/// Compile a rule pattern: case-insensitive, multi-line, unanchored
pub(crate) fn compile_pattern(id: &str, pattern: &str) -> Result<Regex, RuleError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|source| RuleError::InvalidPattern {
            id: id.to_string(),
            source,
        })
}

/// A classification rule
///
/// Rules are immutable once built; matching is a plain regex search over
/// the whole input text.
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    domain: Domain,
    group: String,
    pattern: Regex,
    severity: Severity,
    explanation: String,
    suggestions: Vec<Suggestion>,
}

impl Rule {
    pub fn new(
        domain: Domain,
        id: impl Into<String>,
        pattern: &str,
        severity: Severity,
        explanation: impl Into<String>,
        suggestions: Vec<Suggestion>,
    ) -> Result<Self, RuleError> {
        let id = id.into();
        if suggestions.is_empty() {
            return Err(RuleError::EmptySuggestions(id));
        }
        let pattern = compile_pattern(&id, pattern)?;
        Ok(Self {
            id,
            domain,
            group: String::new(),
            pattern,
            severity,
            explanation: explanation.into(),
            suggestions,
        })
    }

    /// Set the group name (listing only)
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Source text of the pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Search the text for this rule's pattern
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion() -> Suggestion {
        Suggestion::new("Fix it", "do_the_thing()", 0.9).unwrap()
    }

    #[test]
    fn test_suggestion_confidence_bounds() {
        assert!(Suggestion::new("t", "", 1.0).is_ok());
        assert!(Suggestion::new("t", "", 0.01).is_ok());
        assert!(matches!(
            Suggestion::new("t", "", 0.0),
            Err(RuleError::InvalidConfidence(_))
        ));
        assert!(Suggestion::new("t", "", 1.5).is_err());
        assert!(Suggestion::new("t", "", -0.2).is_err());
        assert!(Suggestion::new("t", "", f64::NAN).is_err());
    }

    #[test]
    fn test_suggestion_percent() {
        assert_eq!(Suggestion::new("t", "", 0.95).unwrap().percent(), "95");
        assert_eq!(Suggestion::new("t", "", 0.5).unwrap().percent(), "50");
        assert_eq!(Suggestion::new("t", "", 1.0).unwrap().percent(), "100");
    }

    #[test]
    fn test_suggestion_deserialize_validates() {
        let ok: Suggestion =
            serde_yaml::from_str("title: Retry\ncode: retry()\nconfidence: 0.7").unwrap();
        assert_eq!(ok.title(), "Retry");
        assert_eq!(ok.code(), "retry()");

        let no_code: Suggestion = serde_yaml::from_str("title: Retry\nconfidence: 0.7").unwrap();
        assert_eq!(no_code.code(), "");

        let bad = serde_yaml::from_str::<Suggestion>("title: Retry\nconfidence: 2.0");
        assert!(bad.is_err());
    }

    #[test]
    fn test_rule_is_case_insensitive() {
        let rule = Rule::new(
            Domain::Shell,
            "command_not_found",
            "command not found",
            Severity::High,
            "Missing command",
            vec![suggestion()],
        )
        .unwrap();
        assert!(rule.is_match("bash: foo: COMMAND NOT FOUND"));
        assert!(!rule.is_match("all good"));
    }

    #[test]
    fn test_rule_is_multiline() {
        let rule = Rule::new(
            Domain::Sql,
            "anchored",
            "^deadlock",
            Severity::Critical,
            "x",
            vec![suggestion()],
        )
        .unwrap();
        assert!(rule.is_match("first line\nDeadlock found when trying to get lock"));
    }

    #[test]
    fn test_rule_requires_suggestions() {
        let err = Rule::new(Domain::Sql, "empty", "x", Severity::Low, "x", vec![]).unwrap_err();
        assert!(matches!(err, RuleError::EmptySuggestions(ref id) if id == "empty"));
    }

    #[test]
    fn test_rule_invalid_pattern() {
        let err = Rule::new(
            Domain::Sql,
            "broken",
            "(unclosed",
            Severity::Low,
            "x",
            vec![suggestion()],
        )
        .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_rule_with_group() {
        let rule = Rule::new(
            Domain::Swift,
            "r",
            "x",
            Severity::Low,
            "x",
            vec![suggestion()],
        )
        .unwrap()
        .with_group("runtime");
        assert_eq!(rule.group(), "runtime");
        assert_eq!(rule.domain(), Domain::Swift);
        assert_eq!(rule.pattern(), "x");
    }
}

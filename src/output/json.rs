//! JSON output formatter

use super::OutputFormatter;
use crate::diagnostic::DiagnosticRecord;
use crate::rule::{Rule, Suggestion};
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

#[derive(Serialize)]
struct JsonRule<'a> {
    id: &'a str,
    domain: &'a str,
    group: &'a str,
    severity: String,
    pattern: &'a str,
    explanation: &'a str,
    suggestions: &'a [Suggestion],
}

impl<'a> From<&'a Rule> for JsonRule<'a> {
    fn from(rule: &'a Rule) -> Self {
        Self {
            id: rule.id(),
            domain: rule.domain().as_str(),
            group: rule.group(),
            severity: rule.severity().to_string(),
            pattern: rule.pattern(),
            explanation: rule.explanation(),
            suggestions: rule.suggestions(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, record: &DiagnosticRecord) -> String {
        self.to_json(record)
    }

    fn format_rule(&self, rule: &Rule) -> String {
        self.to_json(&JsonRule::from(rule))
    }

    fn format_rules(&self, rules: &[Rule]) -> String {
        let rules: Vec<JsonRule> = rules.iter().map(JsonRule::from).collect();
        self.to_json(&rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Extra, Location, Severity};
    use crate::domain::Domain;

    fn record() -> DiagnosticRecord {
        DiagnosticRecord {
            error_type: "authentication_failed".to_string(),
            domain: Domain::Sql,
            severity: Severity::Critical,
            message: "ERROR 1045".to_string(),
            explanation: "Bad credentials".to_string(),
            suggestions: vec![Suggestion::new("Verify credentials", "mysql -u root -p", 0.9).unwrap()],
            location: Location::default(),
            extra: Extra {
                dialect: Some("mysql".to_string()),
                ..Extra::default()
            },
        }
    }

    #[test]
    fn test_record_field_names() {
        let json = JsonFormatter::new().format(&record());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error_type"], "authentication_failed");
        assert_eq!(value["domain"], "sql");
        assert_eq!(value["severity"], "critical");
        assert_eq!(value["extra"]["dialect"], "mysql");
        assert_eq!(value["suggestions"][0]["confidence"], 0.9);
        assert!(value["location"].as_object().unwrap().is_empty());
        assert!(value["extra"].get("command").is_none());
    }

    #[test]
    fn test_record_deserializes_back() {
        let json = JsonFormatter::new().pretty().format(&record());
        assert!(json.contains('\n'));
        let back: DiagnosticRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record());
    }

    #[test]
    fn test_rules_listing() {
        let rule = Rule::new(
            Domain::Sql,
            "deadlock",
            "deadlock",
            Severity::Critical,
            "x",
            vec![Suggestion::new("Retry", "", 0.8).unwrap()],
        )
        .unwrap()
        .with_group("performance");
        let json = JsonFormatter::new().format_rules(&[rule]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "deadlock");
        assert_eq!(value[0]["group"], "performance");
        assert_eq!(value[0]["severity"], "critical");
    }
}

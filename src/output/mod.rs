//! Output formatters for diagnostic records

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::diagnostic::DiagnosticRecord;
use crate::domain::Locale;
use crate::rule::Rule;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format a classified record
    fn format(&self, record: &DiagnosticRecord) -> String;

    /// Format one rule in full (explanation and suggestions)
    fn format_rule(&self, rule: &Rule) -> String;

    /// Format a rule listing in match order
    fn format_rules(&self, rules: &[Rule]) -> String;
}

/// Plain-text report for a record in the given locale
pub fn render(record: &DiagnosticRecord, locale: Locale) -> String {
    TextFormatter::new(locale).without_color().format(record)
}

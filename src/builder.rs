//! Assembles diagnostic records

use crate::diagnostic::{DiagnosticRecord, Severity};
use crate::domain::Domain;
use crate::extract::Context;
use crate::profile::Fallback;
use crate::rule::Rule;

/// Combines a matched rule (or the domain fallback) with extracted context
pub struct ResultBuilder<'a> {
    domain: Domain,
    message: &'a str,
    context: Context,
}

impl<'a> ResultBuilder<'a> {
    pub fn new(domain: Domain, message: &'a str) -> Self {
        Self {
            domain,
            message,
            context: Context::default(),
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Record for a matched rule; suggestions are copied verbatim
    pub fn build(self, rule: &Rule) -> DiagnosticRecord {
        DiagnosticRecord {
            error_type: rule.id().to_string(),
            domain: self.domain,
            severity: rule.severity(),
            message: self.message.to_string(),
            explanation: rule.explanation().to_string(),
            suggestions: rule.suggestions().to_vec(),
            location: self.context.location,
            extra: self.context.extra,
        }
    }

    /// Record for unmatched text: `unknown_<domain>_error`, medium severity
    pub fn build_fallback(self, fallback: &Fallback) -> DiagnosticRecord {
        DiagnosticRecord {
            error_type: self.domain.fallback_error_type(),
            domain: self.domain,
            severity: Severity::Medium,
            message: self.message.to_string(),
            explanation: fallback.explanation().to_string(),
            suggestions: fallback.suggestions().to_vec(),
            location: self.context.location,
            extra: self.context.extra,
        }
    }
}

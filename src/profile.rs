//! Domain profiles: ordered rule groups plus extraction tables

use crate::domain::Domain;
use crate::extract::ContextExtractor;
use crate::rule::{Rule, RuleError, Suggestion};

/// A named, ordered run of rules
#[derive(Debug, Clone)]
pub struct RuleGroup {
    name: String,
    rules: Vec<Rule>,
}

impl RuleGroup {
    /// Build a group; every rule is tagged with the group name
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        let name = name.into();
        let rules = rules
            .into_iter()
            .map(|r| r.with_group(name.clone()))
            .collect();
        Self { name, rules }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}

/// What a domain reports when no rule matches
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
    explanation: String,
    suggestions: Vec<Suggestion>,
}

impl Fallback {
    pub fn new(explanation: impl Into<String>, suggestions: Vec<Suggestion>) -> Result<Self, RuleError> {
        if suggestions.is_empty() {
            return Err(RuleError::EmptySuggestions("fallback".to_string()));
        }
        Ok(Self {
            explanation: explanation.into(),
            suggestions,
        })
    }

    /// Used for a domain that has rules but never registered a fallback
    pub fn generic(domain: Domain) -> Self {
        Self {
            explanation: format!(
                "This appears to be a {} error, but doesn't match common patterns.",
                domain.as_str()
            ),
            suggestions: vec![Suggestion::fallback(
                "Search the exact error message",
                "# Copy the first error line into your search engine or issue tracker",
            )],
        }
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }
}

/// Everything the engine knows about one domain
///
/// Rule groups are listed most specific first. Their order is the match
/// order and is never changed after construction.
#[derive(Debug, Clone)]
pub struct DomainProfile {
    domain: Domain,
    groups: Vec<RuleGroup>,
    extractor: ContextExtractor,
    fallback: Option<Fallback>,
}

impl DomainProfile {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            groups: Vec::new(),
            extractor: ContextExtractor::new(),
            fallback: None,
        }
    }

    pub fn with_group(mut self, group: RuleGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_extractor(mut self, extractor: ContextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn extractor(&self) -> &ContextExtractor {
        &self.extractor
    }

    pub fn fallback(&self) -> Option<&Fallback> {
        self.fallback.as_ref()
    }

    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules().len()).sum()
    }

    pub(crate) fn into_parts(self) -> (Vec<RuleGroup>, ContextExtractor, Option<Fallback>) {
        (self.groups, self.extractor, self.fallback)
    }
}

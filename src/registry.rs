//! Pattern registry
//!
//! Holds one ordered rule table per domain. Profiles are appended in
//! registration order; after initialization the registry is read-only and
//! can be shared freely between threads.

use crate::domain::Domain;
use crate::domains;
use crate::extract::ContextExtractor;
use crate::profile::{DomainProfile, Fallback};
use crate::rule::{Rule, RuleError};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::BTreeMap;

static EMPTY_EXTRACTOR: Lazy<ContextExtractor> = Lazy::new(ContextExtractor::new);

#[derive(Debug, Clone, Default)]
struct DomainTable {
    rules: Vec<Rule>,
    extractor: ContextExtractor,
    fallback: Option<Fallback>,
}

/// Ordered rule tables for every registered domain
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    tables: BTreeMap<Domain, DomainTable>,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six built-in domain profiles
    pub fn builtin() -> Result<Self, RuleError> {
        let mut registry = Self::new();
        for profile in domains::builtin_profiles()? {
            registry.register(profile);
        }
        log::debug!(
            "Built-in registry ready: {} domains, {} rules",
            registry.tables.len(),
            registry.rule_count()
        );
        Ok(registry)
    }

    /// Append a profile's rule groups, in declared order, to its domain's table
    ///
    /// Extraction tables are appended as well. The first fallback registered
    /// for a domain is kept.
    pub fn register(&mut self, profile: DomainProfile) {
        let domain = profile.domain();
        let count = profile.rule_count();
        let (groups, extractor, fallback) = profile.into_parts();

        let table = self.tables.entry(domain).or_default();
        for group in groups {
            table.rules.extend(group.into_rules());
        }
        table.extractor.extend(extractor);
        if table.fallback.is_none() {
            table.fallback = fallback;
        }

        log::debug!(
            "Registered {} rules for {} ({} total)",
            count,
            domain,
            table.rules.len()
        );
    }

    /// Drop rules for which the predicate returns false
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Rule) -> bool,
    {
        for table in self.tables.values_mut() {
            table.rules.retain(|rule| {
                let kept = keep(rule);
                if !kept {
                    log::debug!("Disabled rule {}/{}", rule.domain(), rule.id());
                }
                kept
            });
        }
    }

    /// The domain's full rule sequence in match order
    pub fn rules_for(&self, domain: Domain) -> &[Rule] {
        self.tables
            .get(&domain)
            .map(|t| t.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Extraction tables for a domain (empty if none registered)
    pub fn extractor_for(&self, domain: Domain) -> &ContextExtractor {
        self.tables
            .get(&domain)
            .map(|t| &t.extractor)
            .unwrap_or(&*EMPTY_EXTRACTOR)
    }

    /// The domain's fallback, or a generic one if none was registered
    pub fn fallback_for(&self, domain: Domain) -> Cow<'_, Fallback> {
        match self.tables.get(&domain).and_then(|t| t.fallback.as_ref()) {
            Some(fallback) => Cow::Borrowed(fallback),
            None => Cow::Owned(Fallback::generic(domain)),
        }
    }

    /// Look up a rule by id within a domain
    pub fn find_rule(&self, domain: Domain, id: &str) -> Option<&Rule> {
        self.rules_for(domain).iter().find(|r| r.id() == id)
    }

    /// Domains with at least one registered profile
    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.tables.keys().copied()
    }

    /// Total number of rules across all domains
    pub fn rule_count(&self) -> usize {
        self.tables.values().map(|t| t.rules.len()).sum()
    }
}

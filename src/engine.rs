//! Classification engine
//!
//! Ties the pipeline together:
//!
//! ```text
//! text -> ContextExtractor -+
//!      -> Matcher ----------+-> ResultBuilder -> DiagnosticRecord -> render
//! ```

use crate::builder::ResultBuilder;
use crate::config::Config;
use crate::diagnostic::DiagnosticRecord;
use crate::domain::{Domain, Locale};
use crate::extract::Context;
use crate::loader::{LoadError, Precedence, RuleFile};
use crate::matcher::Matcher;
use crate::output;
use crate::registry::PatternRegistry;
use crate::rule::RuleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Classifies error text against an immutable registry
#[derive(Debug, Clone)]
pub struct Engine {
    registry: PatternRegistry,
}

impl Engine {
    /// Engine over an already-built registry
    pub fn new(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    /// Engine with the built-in rules only
    pub fn builtin() -> Result<Self, RuleError> {
        Ok(Self::new(PatternRegistry::builtin()?))
    }

    /// Engine with built-in rules plus the config's rule files, minus disabled rules
    ///
    /// Files with `precedence: before` are registered ahead of the built-ins,
    /// the rest after them, each group in file order.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let files = config
            .rule_files()
            .iter()
            .map(|path| RuleFile::load(path))
            .collect::<Result<Vec<_>, _>>()?;
        let (before, after): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| f.precedence == Precedence::Before);

        let mut registry = PatternRegistry::new();
        for file in before {
            log::debug!("Rules from {} take precedence over built-ins", file.path.display());
            registry.register(file.profile);
        }
        for profile in crate::domains::builtin_profiles()? {
            registry.register(profile);
        }
        for file in after {
            log::debug!("Rules from {} follow the built-ins", file.path.display());
            registry.register(file.profile);
        }
        if !config.rules.disabled.is_empty() {
            registry.retain(|rule| !config.is_disabled(rule.id()));
        }

        log::debug!("Engine ready with {} rules", registry.rule_count());
        Ok(Self::new(registry))
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Location and metadata for the text; never fails
    pub fn extract(&self, domain: Domain, text: &str) -> Context {
        self.registry.extractor_for(domain).extract(text)
    }

    /// Classify error text; `None` only for empty input
    pub fn analyze(&self, domain: Domain, text: &str) -> Option<DiagnosticRecord> {
        if text.is_empty() {
            return None;
        }

        let context = self.extract(domain, text);
        let builder = ResultBuilder::new(domain, text).with_context(context);

        let record = match Matcher::new(self.registry.rules_for(domain)).first_match(text) {
            Some(rule) => builder.build(rule),
            None => builder.build_fallback(&self.registry.fallback_for(domain)),
        };
        Some(record)
    }

    /// Plain-text report for a record
    pub fn render(&self, record: &DiagnosticRecord, locale: Locale) -> String {
        output::render(record, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_input_is_none() {
        let engine = Engine::builtin().unwrap();
        for domain in Domain::ALL {
            assert!(engine.analyze(domain, "").is_none());
        }
    }

    #[test]
    fn test_whitespace_input_falls_back() {
        let engine = Engine::builtin().unwrap();
        let record = engine.analyze(Domain::Swift, "   ").unwrap();
        assert_eq!(record.error_type, "unknown_swift_error");
        assert_eq!(record.severity, Severity::Medium);
    }

    #[test]
    fn test_empty_registry_uses_generic_fallback() {
        let engine = Engine::new(PatternRegistry::new());
        let record = engine.analyze(Domain::Sql, "anything").unwrap();
        assert_eq!(record.error_type, "unknown_sql_error");
        assert!(!record.suggestions.is_empty());
    }

    #[test]
    fn test_from_config_precedence_and_disable() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("first.yaml"),
            r#"
domain: shell
group: team
precedence: before
rules:
  - id: team_not_found
    pattern: "command not found"
    severity: low
    explanation: "Install the team toolbox."
    suggestions:
      - { title: "Run setup", code: "./setup.sh", confidence: 0.9 }
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("last.yaml"),
            r#"
domain: shell
rules:
  - id: late_rule
    pattern: "zzz-marker"
    explanation: "Only reached when nothing built-in matches."
    suggestions:
      - { title: "x", confidence: 0.6 }
"#,
        )
        .unwrap();
        let config_path = dir.path().join(".errtriagerc.yaml");
        fs::write(
            &config_path,
            "rules:\n  disabled: [permission_denied]\n  files: [first.yaml, last.yaml]\n",
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        let engine = Engine::from_config(&config).unwrap();

        let rules = engine.registry().rules_for(Domain::Shell);
        assert_eq!(rules.first().unwrap().id(), "team_not_found");
        assert_eq!(rules.last().unwrap().id(), "late_rule");
        assert!(engine.registry().find_rule(Domain::Shell, "permission_denied").is_none());

        let record = engine.analyze(Domain::Shell, "bash: kubectl: command not found").unwrap();
        assert_eq!(record.error_type, "team_not_found");
        assert_eq!(record.severity, Severity::Low);

        let record = engine.analyze(Domain::Shell, "zzz-marker").unwrap();
        assert_eq!(record.error_type, "late_rule");

        let record = engine.analyze(Domain::Shell, "./x.sh: Permission denied").unwrap();
        assert_ne!(record.error_type, "permission_denied");
    }

    #[test]
    fn test_from_config_missing_file() {
        let config = Config {
            rules: crate::config::RulesConfig {
                files: vec!["/nonexistent/rules.yaml".into()],
                ..Default::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            Engine::from_config(&config),
            Err(EngineError::Load(_))
        ));
    }

    #[test]
    fn test_engine_render() {
        let engine = Engine::builtin().unwrap();
        let record = engine
            .analyze(Domain::Swift, "Fatal error: Index out of range")
            .unwrap();
        let text = engine.render(&record, Locale::En);
        assert!(text.contains("array_bounds"));
        assert!(text.contains("CRITICAL"));
    }
}

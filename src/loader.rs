//! Custom rule files
//!
//! A rule file adds one group of rules to one domain:
//!
//! ```yaml
//! domain: sql
//! group: team
//! precedence: before
//! rules:
//!   - id: replica_lag
//!     pattern: "replica lag"
//!     severity: high
//!     explanation: "The read replica is behind the primary."
//!     suggestions:
//!       - title: Read from the primary
//!         code: "SET SESSION read_from = 'primary';"
//!         confidence: 0.8
//! ```

use crate::diagnostic::Severity;
use crate::domain::Domain;
use crate::profile::{DomainProfile, RuleGroup};
use crate::rule::{Rule, RuleError, Suggestion};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid rule in {path}: {source}")]
    Rule { path: PathBuf, source: RuleError },
}

/// Where a file's rules go relative to the built-in ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precedence {
    /// Checked before built-in rules
    Before,
    /// Checked after built-in rules
    #[default]
    After,
}

fn default_group() -> String {
    "custom".to_string()
}

#[derive(Debug, Deserialize)]
struct RuleFileSpec {
    domain: Domain,
    #[serde(default = "default_group")]
    group: String,
    #[serde(default)]
    precedence: Precedence,
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
struct RuleSpec {
    id: String,
    pattern: String,
    #[serde(default)]
    severity: Severity,
    explanation: String,
    suggestions: Vec<Suggestion>,
}

/// A loaded rule file, ready to register
#[derive(Debug)]
pub struct RuleFile {
    pub path: PathBuf,
    pub precedence: Precedence,
    pub profile: DomainProfile,
}

impl RuleFile {
    /// Load a YAML or JSON rule file, chosen by extension
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let spec: RuleFileSpec = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            "json" => serde_json::from_str(&content).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        };

        let file = Self::from_spec(spec, path)?;
        log::debug!(
            "Loaded {} {} rules from {} ({:?})",
            file.profile.rule_count(),
            file.profile.domain(),
            path.display(),
            file.precedence
        );
        Ok(file)
    }

    fn from_spec(spec: RuleFileSpec, path: &Path) -> Result<Self, LoadError> {
        let rules = spec
            .rules
            .into_iter()
            .map(|r| {
                Rule::new(
                    spec.domain,
                    r.id,
                    &r.pattern,
                    r.severity,
                    r.explanation,
                    r.suggestions,
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| LoadError::Rule {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            precedence: spec.precedence,
            profile: DomainProfile::new(spec.domain).with_group(RuleGroup::new(spec.group, rules)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_rule_file() {
        let file = write_temp(
            ".yaml",
            r#"
domain: sql
group: team
precedence: before
rules:
  - id: replica_lag
    pattern: "replica lag"
    severity: high
    explanation: "Replica is behind."
    suggestions:
      - title: Read from primary
        code: "SELECT 1;"
        confidence: 0.8
"#,
        );
        let loaded = RuleFile::load(file.path()).unwrap();
        assert_eq!(loaded.precedence, Precedence::Before);
        assert_eq!(loaded.profile.domain(), Domain::Sql);
        let rule = &loaded.profile.groups()[0].rules()[0];
        assert_eq!(rule.id(), "replica_lag");
        assert_eq!(rule.group(), "team");
        assert_eq!(rule.severity(), Severity::High);
    }

    #[test]
    fn test_load_json_rule_file_defaults() {
        let file = write_temp(
            ".json",
            r#"{"domain": "docker", "rules": [{"id": "x", "pattern": "x", "explanation": "x",
               "suggestions": [{"title": "t", "confidence": 1.0}]}]}"#,
        );
        let loaded = RuleFile::load(file.path()).unwrap();
        assert_eq!(loaded.path, file.path());
        assert_eq!(loaded.precedence, Precedence::After);
        assert_eq!(loaded.profile.groups()[0].name(), "custom");
        assert_eq!(loaded.profile.groups()[0].rules()[0].severity(), Severity::Medium);
    }

    #[test]
    fn test_aliases_in_rule_file() {
        let file = write_temp(
            ".yaml",
            "domain: bash\nrules:\n  - id: a\n    pattern: a\n    severity: fatal\n    explanation: a\n    suggestions:\n      - {title: t, confidence: 0.5}\n",
        );
        let loaded = RuleFile::load(file.path()).unwrap();
        assert_eq!(loaded.profile.domain(), Domain::Shell);
        assert_eq!(loaded.profile.groups()[0].rules()[0].severity(), Severity::Critical);
    }

    #[test]
    fn test_bad_confidence_is_rejected() {
        let file = write_temp(
            ".yaml",
            "domain: sql\nrules:\n  - id: a\n    pattern: a\n    explanation: a\n    suggestions:\n      - {title: t, confidence: 0}\n",
        );
        assert!(matches!(RuleFile::load(file.path()), Err(LoadError::Yaml { .. })));
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let file = write_temp(
            ".yaml",
            "domain: sql\nrules:\n  - id: a\n    pattern: '(oops'\n    explanation: a\n    suggestions:\n      - {title: t, confidence: 0.5}\n",
        );
        let err = RuleFile::load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Rule { .. }));
        assert!(err.to_string().contains("Invalid rule"));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".toml", "domain = 'sql'");
        assert!(matches!(
            RuleFile::load(file.path()),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = RuleFile::load(Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}

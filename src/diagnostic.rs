//! Diagnostic types produced by classification

use crate::domain::Domain;
use crate::rule::Suggestion;
use serde::{Deserialize, Serialize};

/// Severity level of a classified error
///
/// Deserialized through [`FromStr`](std::str::FromStr), so rule files may use
/// the common aliases (`info`, `warning`, `error`, `fatal`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    /// Cosmetic or informational
    Low,
    /// Worth fixing, rarely blocking
    #[default]
    Medium,
    /// Blocks the build or the feature
    High,
    /// Crash, data loss or outage
    Critical,
}

impl Severity {
    /// Uppercase label used in report headers
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "info" => Ok(Severity::Low),
            "medium" | "warning" | "warn" => Ok(Severity::Medium),
            "high" | "error" => Ok(Severity::High),
            "critical" | "fatal" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Where the error points, when the text says so
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File or script path as it appears in the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line number (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Column or character position (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// True when no field was extracted
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.line.is_none() && self.column.is_none()
    }
}

/// Domain-specific metadata slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraField {
    /// SQL dialect (mysql, postgresql, ...)
    Dialect,
    /// Dockerfile instruction (COPY, RUN, ...)
    Instruction,
    /// Shell command that failed
    Command,
    /// Configuration flavour (k8s, github, yaml, ...)
    ConfigType,
}

/// Domain-specific metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_type: Option<String>,
}

impl Extra {
    pub fn get(&self, field: ExtraField) -> Option<&str> {
        match field {
            ExtraField::Dialect => self.dialect.as_deref(),
            ExtraField::Instruction => self.instruction.as_deref(),
            ExtraField::Command => self.command.as_deref(),
            ExtraField::ConfigType => self.config_type.as_deref(),
        }
    }

    pub fn set(&mut self, field: ExtraField, value: String) {
        let slot = match field {
            ExtraField::Dialect => &mut self.dialect,
            ExtraField::Instruction => &mut self.instruction,
            ExtraField::Command => &mut self.command,
            ExtraField::ConfigType => &mut self.config_type,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.dialect.is_none()
            && self.instruction.is_none()
            && self.command.is_none()
            && self.config_type.is_none()
    }
}

/// Structured classification of one piece of error text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Rule id, or `unknown_<domain>_error`
    pub error_type: String,
    pub domain: Domain,
    pub severity: Severity,
    /// The original input text
    pub message: String,
    pub explanation: String,
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub extra: Extra,
}

impl DiagnosticRecord {
    /// True when no rule matched and the domain fallback was used
    pub fn is_fallback(&self) -> bool {
        self.error_type == self.domain.fallback_error_type()
    }

    /// Suggestion with the highest confidence (first one on ties)
    pub fn best_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.iter().fold(None, |best, s| match best {
            Some(b) if b.confidence() >= s.confidence() => Some(b),
            _ => Some(s),
        })
    }
}

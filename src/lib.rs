//! errtriage - pattern-based error classification
//!
//! Turns free-text error output from configuration files, Docker, Kotlin,
//! shell scripts, SQL databases and Swift into a structured diagnosis: an
//! error type, a severity, an explanation and ranked suggestions.
//!
//! # Architecture
//!
//! ```text
//! domains::* -> DomainProfile -> PatternRegistry
//!                                     |
//! text -> Engine::analyze -> ContextExtractor + Matcher -> ResultBuilder
//!                                     |
//!                              DiagnosticRecord -> TextFormatter / JsonFormatter
//! ```
//!
//! Rules are tried in registration order and the first match wins. When
//! nothing matches, the domain's fallback produces `unknown_<domain>_error`.
//!
//! # Example
//!
//! ```
//! use errtriage::{Domain, Engine, Locale};
//!
//! let engine = Engine::builtin().unwrap();
//! let record = engine
//!     .analyze(Domain::Docker, "COPY failed: file not found: package.json")
//!     .unwrap();
//! assert_eq!(record.error_type, "copy_failed");
//! assert_eq!(record.extra.instruction.as_deref(), Some("COPY"));
//!
//! let report = engine.render(&record, Locale::En);
//! assert!(report.contains("HIGH Priority"));
//! ```
//!
//! # Custom rules
//!
//! Teams can add their own rules from YAML or JSON files listed in
//! `.errtriagerc.yaml`:
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
//!       - { title: "Read from the primary", code: "SET SESSION read_only = 0;", confidence: 0.8 }
//! ```

pub mod builder;
pub mod config;
pub mod diagnostic;
pub mod domain;
pub mod domains;
pub mod engine;
pub mod extract;
pub mod loader;
pub mod matcher;
pub mod output;
pub mod profile;
pub mod registry;
pub mod rule;

// Re-export main types
pub use builder::ResultBuilder;
pub use config::{ColorMode, Config, ConfigError, OutputFormat};
pub use diagnostic::{DiagnosticRecord, Extra, ExtraField, Location, Severity};
pub use domain::{Domain, Locale};
pub use engine::{Engine, EngineError};
pub use extract::{Context, ContextExtractor, ExtractionTemplate, FieldCapture, SubtypeDetector, Transform};
pub use loader::{LoadError, Precedence, RuleFile};
pub use matcher::Matcher;
pub use output::{render, JsonFormatter, OutputFormatter, TextFormatter};
pub use profile::{DomainProfile, Fallback, RuleGroup};
pub use registry::PatternRegistry;
pub use rule::{Rule, RuleError, Suggestion};

//! Context extraction
//!
//! Pulls location and domain metadata out of raw error text. Extraction is
//! independent of rule matching and never fails: a template that does not
//! match, or a number that does not parse, simply leaves the field absent.

use crate::diagnostic::{Extra, ExtraField, Location};
use crate::rule::RuleError;
use regex::Regex;

/// Location and metadata found in a piece of error text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub location: Location,
    pub extra: Extra,
}

/// Parse a 1-based position; zero, overflow and junk are treated as absent
fn parse_position(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|n| *n > 0)
}

fn compile(id: &str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        id: id.to_string(),
        source,
    })
}

/// A location template with named groups `file`, `line` and `column`
///
/// Patterns are compiled verbatim, so case-insensitivity must be requested
/// inline with `(?i)`.
#[derive(Debug, Clone)]
pub struct ExtractionTemplate {
    regex: Regex,
    fixed_file: Option<String>,
}

impl ExtractionTemplate {
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        Ok(Self {
            regex: compile("template", pattern)?,
            fixed_file: None,
        })
    }

    /// Report this file name whenever the template matches
    pub fn with_fixed_file(mut self, file: impl Into<String>) -> Self {
        self.fixed_file = Some(file.into());
        self
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Fields from this template, or None if it does not match at all
    pub fn apply(&self, text: &str) -> Option<Location> {
        let caps = self.regex.captures(text)?;
        let file = caps
            .name("file")
            .map(|m| m.as_str().to_string())
            .or_else(|| self.fixed_file.clone());
        Some(Location {
            file,
            line: caps.name("line").and_then(|m| parse_position(m.as_str())),
            column: caps.name("column").and_then(|m| parse_position(m.as_str())),
        })
    }
}

/// Code-shaped signature: every pattern must match (case-sensitive)
#[derive(Debug, Clone)]
struct Signature {
    tag: String,
    patterns: Vec<Regex>,
}

/// Detects a sub-type (SQL dialect, config flavour) from the text
///
/// Signatures are checked first, in order; then indicator substrings,
/// compared case-insensitively, in order.
#[derive(Debug, Clone)]
pub struct SubtypeDetector {
    field: ExtraField,
    signatures: Vec<Signature>,
    indicators: Vec<(String, Vec<String>)>,
}

impl SubtypeDetector {
    pub fn new(field: ExtraField) -> Self {
        Self {
            field,
            signatures: Vec::new(),
            indicators: Vec::new(),
        }
    }

    pub fn with_signature(mut self, tag: &str, patterns: &[&str]) -> Result<Self, RuleError> {
        let patterns = patterns
            .iter()
            .map(|p| compile(tag, p))
            .collect::<Result<Vec<_>, _>>()?;
        self.signatures.push(Signature {
            tag: tag.to_string(),
            patterns,
        });
        Ok(self)
    }

    pub fn with_indicators(mut self, tag: &str, needles: &[&str]) -> Self {
        self.indicators.push((
            tag.to_string(),
            needles.iter().map(|n| n.to_lowercase()).collect(),
        ));
        self
    }

    pub fn field(&self) -> ExtraField {
        self.field
    }

    pub fn detect(&self, text: &str) -> Option<&str> {
        if let Some(sig) = self
            .signatures
            .iter()
            .find(|sig| sig.patterns.iter().all(|p| p.is_match(text)))
        {
            return Some(&sig.tag);
        }

        let lower = text.to_lowercase();
        self.indicators
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| lower.contains(n.as_str())))
            .map(|(tag, _)| tag.as_str())
    }
}

/// How a captured value is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Trim,
    Uppercase,
}

/// Captures a metadata value from the first group of the first matching pattern
#[derive(Debug, Clone)]
pub struct FieldCapture {
    field: ExtraField,
    patterns: Vec<Regex>,
    transform: Transform,
}

impl FieldCapture {
    pub fn new(field: ExtraField, patterns: &[&str], transform: Transform) -> Result<Self, RuleError> {
        let patterns = patterns
            .iter()
            .map(|p| compile("capture", p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            field,
            patterns,
            transform,
        })
    }

    pub fn field(&self) -> ExtraField {
        self.field
    }

    /// A pattern whose capture normalizes to an empty string is skipped
    pub fn capture(&self, text: &str) -> Option<String> {
        self.patterns.iter().find_map(|p| {
            let raw = p.captures(text)?.get(1)?.as_str();
            let value = match self.transform {
                Transform::Trim => raw.trim().to_string(),
                Transform::Uppercase => raw.trim().to_uppercase(),
            };
            (!value.is_empty()).then_some(value)
        })
    }
}

/// Ordered extraction tables for one domain
#[derive(Debug, Clone, Default)]
pub struct ContextExtractor {
    templates: Vec<ExtractionTemplate>,
    detectors: Vec<SubtypeDetector>,
    captures: Vec<FieldCapture>,
}

impl ContextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: ExtractionTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_detector(mut self, detector: SubtypeDetector) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn with_capture(mut self, capture: FieldCapture) -> Self {
        self.captures.push(capture);
        self
    }

    /// Append another extractor's tables after this one's
    pub fn extend(&mut self, other: ContextExtractor) {
        self.templates.extend(other.templates);
        self.detectors.extend(other.detectors);
        self.captures.extend(other.captures);
    }

    pub fn templates(&self) -> &[ExtractionTemplate] {
        &self.templates
    }

    /// Extract location and metadata; never fails
    pub fn extract(&self, text: &str) -> Context {
        let mut context = Context::default();

        for (index, template) in self.templates.iter().enumerate() {
            if let Some(location) = template.apply(text) {
                log::trace!("Location template #{} matched: {:?}", index, location);
                context.location = location;
                break;
            }
        }

        for detector in &self.detectors {
            if context.extra.get(detector.field()).is_some() {
                continue;
            }
            if let Some(tag) = detector.detect(text) {
                context.extra.set(detector.field(), tag.to_string());
            }
        }

        for capture in &self.captures {
            if context.extra.get(capture.field()).is_some() {
                continue;
            }
            if let Some(value) = capture.capture(text) {
                context.extra.set(capture.field(), value);
            }
        }

        context
    }
}

// svgward-core/src/engine.rs
//! Defines the core `SvgSanitizer` trait and related data structures.
//!
//! The `SvgSanitizer` trait is the contract between the decision engine and
//! whatever actually parses and strips SVG markup. The decision engine never
//! looks inside a document; it only configures the sanitizer, hands it raw
//! bytes and interprets the pass it gets back.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SvgwardError;

/// A diagnostic emitted by a sanitizer during one pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SanitizationIssue {
    pub message: String,
    pub line: u64,
}

impl SanitizationIssue {
    pub fn new(message: impl Into<String>, line: u64) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for SanitizationIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

/// Raw result of one `sanitize` call.
///
/// `output` is `None` when the sanitizer could not produce safe markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizePass {
    pub output: Option<Vec<u8>>,
    pub issues: Vec<SanitizationIssue>,
}

impl SanitizePass {
    pub fn failed(issues: Vec<SanitizationIssue>) -> Self {
        Self { output: None, issues }
    }

    pub fn cleaned(output: Vec<u8>, issues: Vec<SanitizationIssue>) -> Self {
        Self {
            output: Some(output),
            issues,
        }
    }
}

/// Terminal classification of a pass against its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizationOutcome {
    Failed,
    Unchanged,
    Rewritten(Vec<u8>),
}

impl SanitizationOutcome {
    pub fn classify(raw: &[u8], output: Option<Vec<u8>>) -> Self {
        match output {
            None => SanitizationOutcome::Failed,
            Some(cleaned) if cleaned.as_slice() == raw => SanitizationOutcome::Unchanged,
            Some(cleaned) => SanitizationOutcome::Rewritten(cleaned),
        }
    }
}

/// A trait that defines the functionality of an SVG sanitization engine.
///
/// Implementations keep their own allowed tag and attribute sets. Until one
/// of the `set_allowed_*` methods is called they use their built-in defaults.
pub trait SvgSanitizer: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Verifies that everything the engine needs at runtime is present.
    ///
    /// Called once when a validator is constructed.
    fn check_available(&self) -> Result<(), SvgwardError> {
        Ok(())
    }

    /// Sanitizes one document.
    fn sanitize(&self, raw: &[u8]) -> SanitizePass;

    fn set_remove_remote_references(&mut self, enabled: bool);

    fn set_minify(&mut self, enabled: bool);

    fn set_allowed_tags(&mut self, tags: Vec<String>);

    fn set_allowed_attributes(&mut self, attributes: Vec<String>);

    /// The engine's built-in tag whitelist, before any customization.
    fn default_tags(&self) -> &[String];

    /// The engine's built-in attribute whitelist, before any customization.
    fn default_attributes(&self) -> &[String];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display_format() {
        assert_eq!(SanitizationIssue::new("bad tag", 3).to_string(), "bad tag (line 3)");
    }

    #[test]
    fn test_classify_outcomes() {
        let raw = b"<svg/>";
        assert_eq!(SanitizationOutcome::classify(raw, None), SanitizationOutcome::Failed);
        assert_eq!(
            SanitizationOutcome::classify(raw, Some(raw.to_vec())),
            SanitizationOutcome::Unchanged
        );
        assert_eq!(
            SanitizationOutcome::classify(raw, Some(b"<svg></svg>".to_vec())),
            SanitizationOutcome::Rewritten(b"<svg></svg>".to_vec())
        );
    }
}

// svgward-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot use of the bundled engine (non-UI).
//!
//! Each call builds a fresh [`SvgValidator`] backed by [`XmlWhitelistEngine`]
//! and the local filesystem. Hosts validating many files should build one
//! validator and reuse it.

use anyhow::Result;
use std::path::Path;

use crate::config::SanitizerConfig;
use crate::engine::SanitizationOutcome;
use crate::validator::{format_issues, SvgValidator, ValidationReport};

/// Validates one file on disk, rewriting it in place when sanitization changed it.
///
/// # Arguments
///
/// * `config` - Sanitizer settings, including any custom whitelist directives.
/// * `path` - The uploaded SVG file.
pub fn validate_file(config: SanitizerConfig, path: &Path) -> Result<ValidationReport> {
    let validator = SvgValidator::with_defaults(config)?;
    Ok(validator.validate(path))
}

/// Sanitizes a buffer without touching the filesystem.
///
/// Returns the outcome together with the formatted, de-duplicated issues.
pub fn sanitize_bytes(config: SanitizerConfig, raw: &[u8]) -> Result<(SanitizationOutcome, Vec<String>)> {
    let validator = SvgValidator::with_defaults(config)?;
    let (outcome, issues) = validator.validate_bytes(raw);
    Ok((outcome, format_issues(&issues)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{Acceptance, Verdict};
    use crate::whitelist::DirectiveInput;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_rewrites_script() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("logo.svg");
        std::fs::write(&path, "<svg><script>alert(1)</script><rect/></svg>")?;

        let report = validate_file(SanitizerConfig::default(), &path)?;

        assert_eq!(report.verdict, Verdict::Accepted(Acceptance::Rewritten));
        assert_eq!(std::fs::read_to_string(&path)?, "<svg><rect/></svg>");
        Ok(())
    }

    #[test]
    fn test_sanitize_bytes_honours_custom_tags() -> Result<()> {
        let config = SanitizerConfig {
            custom_tags: Some(DirectiveInput::Text("-rect".to_string())),
            ..SanitizerConfig::default()
        };
        let (outcome, issues) = sanitize_bytes(config, b"<svg><rect/></svg>")?;

        assert_eq!(outcome, SanitizationOutcome::Rewritten(b"<svg></svg>".to_vec()));
        assert_eq!(issues, vec!["Suspicious tag 'rect' (line 1)"]);
        Ok(())
    }
}

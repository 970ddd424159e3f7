// svgward-core/src/validator.rs
//! The validate-or-sanitize decision engine.
//!
//! One [`SvgValidator::validate`] call reads a file, runs a single sanitizer
//! pass over it and turns the result into a [`Verdict`]:
//!
//! * the sanitizer failed: the file is rejected and left alone, and every
//!   issue it reported becomes an error for the caller;
//! * the output equals the input: the file is accepted as is;
//! * the output differs: the file is replaced with the output and accepted
//!   as rewritten. The caller must re-read it before using it further.
//!
//! Non-fatal issues found along the way are collected into one audit entry.
//! Nothing is retried.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{SanitizerConfig, Whitelist};
use crate::engine::{SanitizationIssue, SanitizationOutcome, SvgSanitizer};
use crate::engines::xml_engine::XmlWhitelistEngine;
use crate::errors::SvgwardError;
use crate::merger::WhitelistMerger;
use crate::storage::{FileStore, LocalFileStore};

/// Why a file was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    Unchanged,
    Rewritten,
}

impl Acceptance {
    pub fn code(&self) -> &'static str {
        match self {
            Acceptance::Unchanged => "unchanged",
            Acceptance::Rewritten => "rewritten",
        }
    }
}

/// Why a file was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The sanitizer could not produce safe output.
    Unsafe,
    /// Sanitized output could not be written back.
    Unwritable,
    /// The file could not be read.
    Unreadable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum Verdict {
    Rejected(Rejection),
    Accepted(Acceptance),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Everything the caller learns from one validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub verdict: Verdict,
    /// User-facing reasons; only populated for rejections.
    pub errors: Vec<String>,
    /// Informational audit entries for issues that did not block the file.
    pub log: Vec<String>,
}

impl ValidationReport {
    fn new(path: &Path, verdict: Verdict) -> Self {
        Self {
            path: path.to_path_buf(),
            verdict,
            errors: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verdict.is_accepted()
    }

    /// True when the file on disk changed during validation.
    pub fn requires_reload(&self) -> bool {
        self.verdict == Verdict::Accepted(Acceptance::Rewritten)
    }
}

pub struct SvgValidator<S = XmlWhitelistEngine, F = LocalFileStore>
where
    S: SvgSanitizer,
    F: FileStore,
{
    config: SanitizerConfig,
    merger: WhitelistMerger,
    sanitizer: S,
    store: F,
}

impl SvgValidator<XmlWhitelistEngine, LocalFileStore> {
    /// A validator backed by the bundled XML engine and the local filesystem.
    pub fn with_defaults(config: SanitizerConfig) -> Result<Self, SvgwardError> {
        Self::new(config, XmlWhitelistEngine::new()?, LocalFileStore::new())
    }
}

impl<S, F> SvgValidator<S, F>
where
    S: SvgSanitizer,
    F: FileStore,
{
    /// Configures `sanitizer` from `config`.
    ///
    /// Fails if the sanitizer reports that it cannot run. Custom whitelists are
    /// only pushed into the sanitizer for domains that have directives.
    pub fn new(config: SanitizerConfig, mut sanitizer: S, store: F) -> Result<Self, SvgwardError> {
        sanitizer.check_available()?;
        config
            .validate()
            .map_err(|e| SvgwardError::Config(format!("{:#}", e)))?;

        sanitizer.set_remove_remote_references(config.remove_remote_references);
        sanitizer.set_minify(config.minify);

        let merger = WhitelistMerger::from_config(&config);
        if merger.has_custom_tags() {
            let tags = merger.effective_tags(sanitizer.default_tags()).into_owned();
            debug!("Using {} custom tags for '{}'.", tags.len(), sanitizer.name());
            sanitizer.set_allowed_tags(tags);
        }
        if merger.has_custom_attributes() {
            let attributes = merger.effective_attributes(sanitizer.default_attributes()).into_owned();
            debug!("Using {} custom attributes for '{}'.", attributes.len(), sanitizer.name());
            sanitizer.set_allowed_attributes(attributes);
        }

        Ok(Self {
            config,
            merger,
            sanitizer,
            store,
        })
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    pub fn merger(&self) -> &WhitelistMerger {
        &self.merger
    }

    pub fn sanitizer(&self) -> &S {
        &self.sanitizer
    }

    pub fn store(&self) -> &F {
        &self.store
    }

    /// Runs the sanitizer over `raw` and classifies the result. No I/O.
    pub fn validate_bytes(&self, raw: &[u8]) -> (SanitizationOutcome, Vec<SanitizationIssue>) {
        let pass = self.sanitizer.sanitize(raw);
        (SanitizationOutcome::classify(raw, pass.output), pass.issues)
    }

    pub fn validate(&self, path: &Path) -> ValidationReport {
        let raw = match self.store.read_all(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{}: unreadable: {:#}", path.display(), e);
                let mut report = ValidationReport::new(path, Verdict::Rejected(Rejection::Unreadable));
                report.errors.push(format!("Unable to read {}: {:#}", path.display(), e));
                return report;
            }
        };

        let (outcome, issues) = self.validate_bytes(&raw);
        let issues = format_issues(&issues);

        if outcome == SanitizationOutcome::Failed {
            warn!("{}: rejected by '{}' with {} issue(s).", path.display(), self.sanitizer.name(), issues.len());
            let mut report = ValidationReport::new(path, Verdict::Rejected(Rejection::Unsafe));
            report.errors = if issues.is_empty() {
                vec![format!("{} could not be sanitized", display_name(path))]
            } else {
                issues
            };
            return report;
        }

        let mut log = Vec::new();
        if !issues.is_empty() {
            let entry = format!("SvgSanitizer: {}: {}", display_name(path), issues.join(", "));
            info!("{}", entry);
            log.push(entry);
        }

        let mut report = match outcome {
            SanitizationOutcome::Rewritten(cleaned) => match self.store.replace(path, &cleaned) {
                Ok(()) => {
                    debug!("{}: rewritten ({} -> {} bytes).", path.display(), raw.len(), cleaned.len());
                    ValidationReport::new(path, Verdict::Accepted(Acceptance::Rewritten))
                }
                Err(e) => {
                    warn!("{}: sanitized but could not be written: {:#}", path.display(), e);
                    let mut report = ValidationReport::new(path, Verdict::Rejected(Rejection::Unwritable));
                    report
                        .errors
                        .push(format!("Unable to write sanitized {}: {:#}", display_name(path), e));
                    report
                }
            },
            _ => {
                debug!("{}: unchanged by sanitization.", path.display());
                ValidationReport::new(path, Verdict::Accepted(Acceptance::Unchanged))
            }
        };
        report.log = log;
        report
    }

    pub fn default_whitelist(&self) -> Whitelist {
        Whitelist {
            tags: self.sanitizer.default_tags().to_vec(),
            attributes: self.sanitizer.default_attributes().to_vec(),
        }
    }

    pub fn effective_whitelist(&self) -> Whitelist {
        Whitelist {
            tags: self.merger.effective_tags(self.sanitizer.default_tags()).into_owned(),
            attributes: self
                .merger
                .effective_attributes(self.sanitizer.default_attributes())
                .into_owned(),
        }
    }
}

/// Formats issues as `"<message> (line <n>)"`, dropping exact repeats.
pub fn format_issues(issues: &[SanitizationIssue]) -> Vec<String> {
    let mut seen = HashSet::new();
    issues
        .iter()
        .map(ToString::to_string)
        .filter(|formatted| seen.insert(formatted.clone()))
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! `svgward validate` implementation.
//!
//! Runs the decision engine over each file in turn and reports the verdicts,
//! either as a human-readable summary or as one JSON document.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::PathBuf;

use svgward_core::{
    Acceptance, LocalFileStore, SanitizerConfig, SvgValidator, ValidationReport, Verdict, XmlWhitelistEngine,
};

use crate::cli::ValidateCommand;
use crate::ui::diff_viewer;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;
use crate::utils::config_locator::build_config;
use crate::utils::recording_store::RecordingStore;

/// Options for the `run_validate_opts` API.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub files: Vec<PathBuf>,
    pub config: SanitizerConfig,
    pub dry_run: bool,
    pub diff: bool,
    pub json: bool,
}

impl ValidateOptions {
    pub fn from_command(cmd: &ValidateCommand) -> Result<Self> {
        Ok(Self {
            files: cmd.files.clone(),
            config: build_config(&cmd.sanitizer)?,
            dry_run: cmd.dry_run,
            diff: cmd.diff,
            json: cmd.json,
        })
    }
}

/// One file's entry in the JSON report.
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    #[serde(flatten)]
    pub report: ValidationReport,
    pub dry_run: bool,
    pub sha256_before: Option<String>,
    pub sha256_after: Option<String>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Totals {
    pub unchanged: usize,
    pub rewritten: usize,
    pub rejected: usize,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub files: Vec<FileOutcome>,
    pub totals: Totals,
}

impl RunReport {
    pub fn all_accepted(&self) -> bool {
        self.totals.rejected == 0
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Validates every file and returns the collected outcomes. Writes nothing to stdout.
pub fn validate_files(opts: &ValidateOptions) -> Result<(RunReport, Vec<(PathBuf, Vec<u8>, Vec<u8>)>)> {
    let store = RecordingStore::new(LocalFileStore::new(), opts.dry_run);
    let engine = XmlWhitelistEngine::new().context("Failed to load the built-in whitelist")?;
    let validator = SvgValidator::new(opts.config.clone(), engine, store)?;

    let mut files = Vec::with_capacity(opts.files.len());
    let mut changes = Vec::new();
    let mut totals = Totals::default();

    for path in &opts.files {
        let report = validator.validate(path);
        let (before, after) = validator.store().take(path);
        debug!("{}: {:?}", path.display(), report.verdict);

        let sha256_before = before.as_deref().map(sha256_hex);
        let sha256_after = match (&report.verdict, &after) {
            (Verdict::Accepted(Acceptance::Rewritten), Some(after)) => Some(sha256_hex(after)),
            _ => sha256_before.clone(),
        };

        match report.verdict {
            Verdict::Accepted(Acceptance::Unchanged) => totals.unchanged += 1,
            Verdict::Accepted(Acceptance::Rewritten) => {
                totals.rewritten += 1;
                if let (Some(before), Some(after)) = (before, after) {
                    changes.push((path.clone(), before, after));
                }
            }
            Verdict::Rejected(_) => totals.rejected += 1,
        }

        files.push(FileOutcome {
            report,
            dry_run: opts.dry_run,
            sha256_before,
            sha256_after,
        });
    }

    info!(
        "Validated {} file(s): {} unchanged, {} rewritten, {} rejected.",
        files.len(),
        totals.unchanged,
        totals.rewritten,
        totals.rejected
    );
    Ok((RunReport { files, totals }, changes))
}

/// The main operation runner for `svgward validate`.
///
/// Returns `true` when every file was accepted.
pub fn run_validate_opts(opts: &ValidateOptions, theme_map: &ThemeMap) -> Result<bool> {
    let (run, changes) = validate_files(opts)?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();

    if opts.json {
        serde_json::to_writer_pretty(&mut writer, &run).context("Failed to write JSON report")?;
        writeln!(writer)?;
        return Ok(run.all_accepted());
    }

    let supports_color = stdout.is_terminal();
    for outcome in &run.files {
        output_format::print_report(&mut writer, &outcome.report, opts.dry_run, theme_map, supports_color)?;
    }

    if opts.diff {
        for (path, before, after) in &changes {
            let label = path.display().to_string();
            diff_viewer::print_diff(
                &label,
                &String::from_utf8_lossy(before),
                &String::from_utf8_lossy(after),
                &mut writer,
                theme_map,
                supports_color,
            )?;
        }
    }

    let verdicts = run.files.iter().map(|f| &f.report.verdict);
    output_format::print_totals(&mut writer, verdicts, theme_map, supports_color)?;
    Ok(run.all_accepted())
}

pub fn run_validate(cmd: &ValidateCommand, theme_map: &ThemeMap) -> Result<bool> {
    let opts = ValidateOptions::from_command(cmd)?;
    run_validate_opts(&opts, theme_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn opts(files: Vec<PathBuf>, dry_run: bool) -> ValidateOptions {
        ValidateOptions {
            files,
            config: SanitizerConfig::default(),
            dry_run,
            diff: false,
            json: false,
        }
    }

    #[test]
    fn dry_run_classifies_without_writing() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("dirty.svg");
        fs::write(&path, "<svg><script/><rect/></svg>")?;

        let (run, changes) = validate_files(&opts(vec![path.clone()], true))?;

        assert_eq!(run.totals, Totals { unchanged: 0, rewritten: 1, rejected: 0 });
        assert_eq!(fs::read_to_string(&path)?, "<svg><script/><rect/></svg>");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].2, b"<svg><rect/></svg>");
        assert_ne!(run.files[0].sha256_before, run.files[0].sha256_after);
        Ok(())
    }

    #[test]
    fn digests_match_for_unchanged_files() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("clean.svg");
        fs::write(&path, "<svg><rect/></svg>")?;

        let (run, changes) = validate_files(&opts(vec![path], false))?;

        assert!(run.all_accepted());
        assert!(changes.is_empty());
        assert_eq!(run.files[0].sha256_before, run.files[0].sha256_after);
        assert_eq!(run.files[0].sha256_before.as_deref(), Some(sha256_hex(b"<svg><rect/></svg>").as_str()));
        Ok(())
    }

    #[test]
    fn missing_file_counts_as_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let (run, _) = validate_files(&opts(vec![dir.path().join("none.svg")], false))?;
        assert!(!run.all_accepted());
        assert!(run.files[0].sha256_before.is_none());
        Ok(())
    }
}

//! Formatting helpers for messages and per-file verdict lines.
//!
//! Every function takes an explicit writer and a `supports_color` flag so the
//! same code serves terminals, pipes and tests.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use svgward_core::{Acceptance, ValidationReport, Verdict};

use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Applies the theme color for `entry` to `text` when color is enabled.
pub fn styled_text(text: &str, entry: ThemeEntry, theme_map: &ThemeMap, supports_color: bool) -> String {
    if !supports_color {
        return text.to_string();
    }
    match theme_map.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) => text.color(color.to_ansi_color()).to_string(),
        None => text.to_string(),
    }
}

fn print_prefixed<W: Write>(
    writer: &mut W,
    prefix: &str,
    entry: ThemeEntry,
    msg: &str,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer, "{} {}", styled_text(prefix, entry, theme_map, supports_color), msg)
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, theme_map: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "Info:", ThemeEntry::Info, msg, theme_map, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, theme_map: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "Warning:", ThemeEntry::Warn, msg, theme_map, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, theme_map: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "Error:", ThemeEntry::Error, msg, theme_map, supports_color)
}

/// Short label and theme entry for a verdict.
pub fn verdict_label(verdict: &Verdict, dry_run: bool) -> (&'static str, ThemeEntry) {
    match verdict {
        Verdict::Accepted(Acceptance::Unchanged) => ("OK", ThemeEntry::Success),
        Verdict::Accepted(Acceptance::Rewritten) if dry_run => ("WOULD REWRITE", ThemeEntry::Warn),
        Verdict::Accepted(Acceptance::Rewritten) => ("REWRITTEN", ThemeEntry::Warn),
        Verdict::Rejected(_) => ("REJECTED", ThemeEntry::Error),
    }
}

/// Prints one line per file, followed by its errors and audit entries, indented.
pub fn print_report<W: Write>(
    writer: &mut W,
    report: &ValidationReport,
    dry_run: bool,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let (label, entry) = verdict_label(&report.verdict, dry_run);
    writeln!(
        writer,
        "{} {}",
        styled_text(&format!("[{}]", label), entry, theme_map, supports_color),
        report.path.display()
    )?;
    for error in &report.errors {
        writeln!(writer, "    {}", styled_text(error, ThemeEntry::Error, theme_map, supports_color))?;
    }
    for entry in &report.log {
        writeln!(writer, "    {}", entry)?;
    }
    Ok(())
}

/// Prints the closing tally.
pub fn print_totals<'a, W: Write>(
    writer: &mut W,
    verdicts: impl IntoIterator<Item = &'a Verdict>,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let (mut unchanged, mut rewritten, mut rejected) = (0usize, 0usize, 0usize);
    for verdict in verdicts {
        match verdict {
            Verdict::Accepted(Acceptance::Unchanged) => unchanged += 1,
            Verdict::Accepted(Acceptance::Rewritten) => rewritten += 1,
            Verdict::Rejected(_) => rejected += 1,
        }
    }

    writeln!(
        writer,
        "{} {} unchanged, {} rewritten, {} rejected",
        styled_text("Summary:", ThemeEntry::Header, theme_map, supports_color),
        unchanged,
        rewritten,
        rejected
    )
}

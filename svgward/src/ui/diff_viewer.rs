// svgward/src/ui/diff_viewer.rs
//! Unified diff of a file before and after sanitization.
//!
//! Removed lines are drawn with the `diff_removed` theme color, added lines
//! with `diff_added`.

use anyhow::Result;
use diffy::{Line as DiffLine, create_patch};
use std::io::Write;

use crate::ui::output_format::styled_text;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes a unified diff between `original` and `sanitized` for `label`.
pub fn print_diff<W: Write>(
    label: &str,
    original: &str,
    sanitized: &str,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    let patch = create_patch(original, sanitized);
    let header = format!("--- {} (original)\n+++ {} (sanitized)", label, label);
    writeln!(writer, "{}", styled_text(&header, ThemeEntry::DiffHeader, theme_map, supports_color))?;

    if patch.hunks().is_empty() {
        writeln!(writer, "No changes detected.")?;
        return Ok(());
    }

    for hunk in patch.hunks() {
        let range = format!(
            "@@ -{},{} +{},{} @@",
            hunk.old_range().start(),
            hunk.old_range().len(),
            hunk.new_range().start(),
            hunk.new_range().len()
        );
        writeln!(writer, "{}", styled_text(&range, ThemeEntry::DiffHeader, theme_map, supports_color))?;

        for line_change in hunk.lines() {
            let (prefix, text, entry) = match line_change {
                DiffLine::Delete(s) => ("-", *s, Some(ThemeEntry::DiffRemoved)),
                DiffLine::Insert(s) => ("+", *s, Some(ThemeEntry::DiffAdded)),
                DiffLine::Context(s) => (" ", *s, None),
            };
            let line = format!("{}{}", prefix, text.trim_end_matches('\n'));
            match entry {
                Some(entry) => writeln!(writer, "{}", styled_text(&line, entry, theme_map, supports_color))?,
                None => writeln!(writer, "{}", line)?,
            }
        }
    }
    Ok(())
}

//! `svgward whitelist` implementation.
//!
//! Prints the engine's built-in whitelist, or with `--effective` the whitelist
//! after the configured directives are applied.

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use is_terminal::IsTerminal;
use std::collections::HashSet;
use std::io::{self, Write};

use svgward_core::{SvgValidator, Whitelist, WhitelistDomain};

use crate::cli::WhitelistCommand;
use crate::ui::output_format::styled_text;
use crate::ui::theme::{ThemeEntry, ThemeMap};
use crate::utils::config_locator::build_config;

/// Builds a table of every name in `shown`, noting which ones are not built in.
pub fn render_table(shown: &Whitelist, defaults: &Whitelist) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Domain", "Name", "Origin"]);

    let domains = [
        (WhitelistDomain::Tags, &shown.tags, &defaults.tags),
        (WhitelistDomain::Attributes, &shown.attributes, &defaults.attributes),
    ];
    for (domain, names, base) in domains {
        let base: HashSet<&str> = base.iter().map(String::as_str).collect();
        for name in names {
            let origin = if base.contains(name.as_str()) { "built-in" } else { "custom" };
            table.add_row(vec![domain.to_string(), name.clone(), origin.to_string()]);
        }
    }
    table
}

/// Names present in `defaults` but missing from `shown`, per domain.
pub fn removed_names(shown: &Whitelist, defaults: &Whitelist) -> Vec<(WhitelistDomain, Vec<String>)> {
    let missing = |names: &[String], base: &[String]| -> Vec<String> {
        let kept: HashSet<&str> = names.iter().map(String::as_str).collect();
        base.iter().filter(|b| !kept.contains(b.as_str())).cloned().collect()
    };
    [
        (WhitelistDomain::Tags, missing(&shown.tags, &defaults.tags)),
        (WhitelistDomain::Attributes, missing(&shown.attributes, &defaults.attributes)),
    ]
    .into_iter()
    .filter(|(_, names)| !names.is_empty())
    .collect()
}

pub fn run_whitelist(cmd: &WhitelistCommand, theme_map: &ThemeMap) -> Result<()> {
    let config = build_config(&cmd.sanitizer)?;
    let validator = SvgValidator::with_defaults(config)?;

    let defaults = validator.default_whitelist();
    let shown = if cmd.effective {
        validator.effective_whitelist()
    } else {
        defaults.clone()
    };

    let stdout = io::stdout();
    let mut writer = stdout.lock();

    if cmd.json {
        serde_json::to_writer_pretty(&mut writer, &shown).context("Failed to write whitelist JSON")?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "{}", render_table(&shown, &defaults))?;

    let supports_color = stdout.is_terminal();
    for (domain, names) in removed_names(&shown, &defaults) {
        writeln!(
            writer,
            "{} {}",
            styled_text(&format!("Removed {}:", domain), ThemeEntry::Warn, theme_map, supports_color),
            names.join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist(tags: &[&str], attributes: &[&str]) -> Whitelist {
        Whitelist {
            tags: tags.iter().map(|s| s.to_string()).collect(),
            attributes: attributes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn table_marks_custom_names() {
        let defaults = whitelist(&["svg", "rect"], &["width"]);
        let shown = whitelist(&["svg", "foreignobject"], &["width"]);
        let rendered = render_table(&shown, &defaults).to_string();

        assert!(rendered.contains("foreignobject"));
        assert!(rendered.contains("custom"));
        assert!(!rendered.contains("rect"));
    }

    #[test]
    fn removed_names_lists_only_missing_defaults() {
        let defaults = whitelist(&["svg", "rect", "style"], &["width"]);
        let shown = whitelist(&["svg", "foreignobject"], &["width"]);

        assert_eq!(
            removed_names(&shown, &defaults),
            vec![(WhitelistDomain::Tags, vec!["rect".to_string(), "style".to_string()])]
        );
    }
}

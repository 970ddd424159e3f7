// svgward/src/utils/config_locator.rs
//! Finds and loads the sanitizer configuration for a CLI run.
//!
//! An explicit `--config` (or `SVGWARD_CONFIG`) wins. Otherwise the first
//! existing candidate path is used, and with none of them present the
//! built-in defaults apply. Command-line flags are layered on top.

use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};

use svgward_core::{SanitizerConfig, WhitelistDomain};

use crate::cli::SanitizerArgs;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Locations searched, in order, when no configuration file is named.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let base_dirs = vec![
        dirs::config_dir().map(|p| p.join("svgward")),
        dirs::home_dir().map(|p| p.join(".svgward")),
        Some(PathBuf::from("/etc/svgward")),
    ];

    base_dirs
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .collect()
}

/// Returns the configuration file to load, if any.
///
/// A named file that does not exist is an error rather than a silent fallback.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("Configuration file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let found = config_candidate_paths().into_iter().find(|p| p.is_file());
    match &found {
        Some(path) => debug!("Using configuration from {}", path.display()),
        None => debug!("No configuration file found; using built-in defaults."),
    }
    Ok(found)
}

/// Builds the effective `SanitizerConfig` for one run.
pub fn build_config(args: &SanitizerArgs) -> Result<SanitizerConfig> {
    let mut config = match resolve_config_path(args.config.as_deref())? {
        Some(path) => SanitizerConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => SanitizerConfig::default(),
    };

    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut SanitizerConfig, args: &SanitizerArgs) {
    if args.keep_remote_references {
        config.remove_remote_references = false;
    }
    if args.minify {
        config.minify = true;
    }
    for tags in &args.tags {
        config.append_directives(WhitelistDomain::Tags, tags.as_str());
    }
    for attrs in &args.attrs {
        config.append_directives(WhitelistDomain::Attributes, attrs.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use svgward_core::DirectiveInput;
    use tempfile::NamedTempFile;

    #[test]
    fn flags_override_file_values() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"remove_remote_references: true\ncustom_tags: \"foreignobject\"\n")?;

        let args = SanitizerArgs {
            config: Some(file.path().to_path_buf()),
            tags: vec!["-style".to_string()],
            attrs: vec![],
            keep_remote_references: true,
            minify: true,
        };
        let config = build_config(&args)?;

        assert!(!config.remove_remote_references);
        assert!(config.minify);
        assert_eq!(config.custom_tags, Some(DirectiveInput::from(vec!["foreignobject", "-style"])));
        assert!(config.custom_attrs.is_none());
        Ok(())
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let args = SanitizerArgs {
            config: Some(PathBuf::from("/no/such/svgward.yaml")),
            ..SanitizerArgs::default()
        };
        let err = build_config(&args).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn invalid_cli_directive_is_rejected() {
        let args = SanitizerArgs {
            config: None,
            attrs: vec!["<b>".to_string()],
            ..SanitizerArgs::default()
        };
        assert!(apply_and_validate(args).is_err());
    }

    fn apply_and_validate(args: SanitizerArgs) -> Result<()> {
        let mut config = SanitizerConfig::default();
        apply_overrides(&mut config, &args);
        config.validate()
    }

    #[test]
    fn candidates_all_end_in_config_yaml() {
        for path in config_candidate_paths() {
            assert!(path.ends_with(CONFIG_FILE_NAME));
        }
    }
}

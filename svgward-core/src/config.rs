//! Configuration management for `svgward-core`.
//!
//! This module defines the sanitizer settings and the whitelist data
//! structures. It handles deserialization of YAML configuration files and
//! loads the embedded default whitelist.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::whitelist::{Directive, DirectiveInput, WhitelistStore, WhitelistDomain};

// Parsed once per process; the embedded YAML never changes.
static DEFAULT_WHITELIST: Lazy<Result<Whitelist, String>> =
    Lazy::new(|| Whitelist::parse_embedded().map_err(|e| format!("{:#}", e)));

/// Characters that can never appear in an XML tag or attribute name.
const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', '"', '\'', '=', '/', '&'];

/// Settings for one sanitizer instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Strip references to remote resources (stops HTTP leaks).
    pub remove_remote_references: bool,
    /// Drop whitespace-only text from sanitized output.
    pub minify: bool,
    /// Tag directives, e.g. `"foreignobject -style"` or a YAML list.
    pub custom_tags: Option<DirectiveInput>,
    /// Attribute directives.
    pub custom_attrs: Option<DirectiveInput>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            remove_remote_references: true,
            minify: false,
            custom_tags: None,
            custom_attrs: None,
        }
    }
}

impl SanitizerConfig {
    /// Loads sanitizer settings from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading sanitizer configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SanitizerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Appends directives after any already configured for `domain`.
    pub fn append_directives<I: Into<DirectiveInput>>(&mut self, domain: WhitelistDomain, input: I) {
        let extra = input.into().into_lines();
        if extra.is_empty() {
            return;
        }
        let block = match domain {
            WhitelistDomain::Tags => &mut self.custom_tags,
            WhitelistDomain::Attributes => &mut self.custom_attrs,
        };
        let mut lines = block.take().map(DirectiveInput::into_lines).unwrap_or_default();
        lines.extend(extra);
        *block = Some(DirectiveInput::Lines(lines));
    }

    /// Checks that every directive names something usable as an XML name.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let blocks = [
            (WhitelistDomain::Tags, &self.custom_tags),
            (WhitelistDomain::Attributes, &self.custom_attrs),
        ];

        for (domain, block) in blocks {
            let Some(input) = block else { continue };
            let mut store = WhitelistStore::new(domain);
            store.add(input.clone());
            for directive in store.directives() {
                if let Some(bad) = directive.name().chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
                    let marker = match directive {
                        Directive::Add(_) => "",
                        Directive::Remove(_) => "-",
                    };
                    errors.push(format!(
                        "Custom {} directive '{}{}' contains forbidden character '{}'.",
                        domain,
                        marker,
                        directive.name(),
                        bad
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed:\n{}", errors.join("\n")))
        }
    }
}

/// A pair of tag and attribute name lists, as reported to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Whitelist {
    pub tags: Vec<String>,
    pub attributes: Vec<String>,
}

impl Whitelist {
    /// Returns the built-in whitelist.
    pub fn load_default() -> Result<Self> {
        DEFAULT_WHITELIST.clone().map_err(|e| anyhow!(e))
    }

    fn parse_embedded() -> Result<Self> {
        debug!("Loading default whitelist from embedded string...");
        let default_yaml = include_str!("../config/default_whitelist.yaml");
        let whitelist: Whitelist = serde_yml::from_str(default_yaml)
            .context("Failed to parse default whitelist")?;

        debug!(
            "Loaded {} default tags and {} default attributes.",
            whitelist.tags.len(),
            whitelist.attributes.len()
        );
        Ok(whitelist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = SanitizerConfig::default();
        assert!(config.remove_remote_references);
        assert!(!config.minify);
        assert!(config.custom_tags.is_none());
        assert!(config.custom_attrs.is_none());
    }

    #[test]
    fn test_directive_blocks_accept_text_or_list() {
        let yaml = r#"
minify: true
custom_tags: "foreignobject -style"
custom_attrs:
  - data-id
  - -style
"#;
        let config: SanitizerConfig = serde_yml::from_str(yaml).unwrap();
        assert!(config.minify);
        assert!(config.remove_remote_references);
        assert_eq!(
            config.custom_tags,
            Some(DirectiveInput::Text("foreignobject -style".to_string()))
        );
        assert_eq!(
            config.custom_attrs,
            Some(DirectiveInput::Lines(vec!["data-id".to_string(), "-style".to_string()]))
        );
    }

    #[test]
    fn test_validate_rejects_markup_in_names() {
        let config = SanitizerConfig {
            custom_tags: Some(DirectiveInput::Text("<script>".to_string())),
            ..SanitizerConfig::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("<script>"), "unexpected error: {}", err);
    }

    #[test]
    fn test_append_directives_keeps_file_order() {
        let mut config = SanitizerConfig {
            custom_tags: Some(DirectiveInput::Text("foreignobject -style".to_string())),
            ..SanitizerConfig::default()
        };
        config.append_directives(WhitelistDomain::Tags, "-a +b");
        config.append_directives(WhitelistDomain::Attributes, "   ");

        assert_eq!(
            config.custom_tags,
            Some(DirectiveInput::from(vec!["foreignobject", "-style", "-a", "+b"]))
        );
        assert!(config.custom_attrs.is_none());
    }

    #[test]
    fn test_default_whitelist_is_populated() {
        let whitelist = Whitelist::load_default().unwrap();
        assert!(whitelist.tags.iter().any(|t| t == "svg"));
        assert!(whitelist.tags.iter().any(|t| t == "path"));
        assert!(!whitelist.tags.iter().any(|t| t == "script"));
        assert!(whitelist.attributes.iter().any(|a| a == "xlink:href"));
        assert!(!whitelist.attributes.iter().any(|a| a == "onload"));
    }

    #[test]
    fn test_default_whitelist_is_stable_across_calls() {
        assert_eq!(Whitelist::load_default().unwrap(), Whitelist::load_default().unwrap());
    }
}

//! Combines the engine's base whitelists with user directives.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use std::borrow::Cow;

use crate::config::SanitizerConfig;
use crate::whitelist::{DirectiveInput, WhitelistDomain, WhitelistStore};

/// One directive store per domain.
///
/// The merger is owned by whoever builds the sanitizer and is rebuilt from
/// configuration each time, so directives never leak between validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistMerger {
    tags: WhitelistStore,
    attributes: WhitelistStore,
}

impl Default for WhitelistMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl WhitelistMerger {
    pub fn new() -> Self {
        Self {
            tags: WhitelistStore::new(WhitelistDomain::Tags),
            attributes: WhitelistStore::new(WhitelistDomain::Attributes),
        }
    }

    /// Builds both stores from the `custom_tags` / `custom_attrs` blocks.
    pub fn from_config(config: &SanitizerConfig) -> Self {
        let mut merger = Self::new();
        if let Some(tags) = &config.custom_tags {
            merger.add_tags(tags.clone());
        }
        if let Some(attrs) = &config.custom_attrs {
            merger.add_attributes(attrs.clone());
        }
        debug!(
            "Whitelist merger built: {} tag directive(s), {} attribute directive(s).",
            merger.tags.lines().len(),
            merger.attributes.lines().len()
        );
        merger
    }

    pub fn add_tags<I: Into<DirectiveInput>>(&mut self, input: I) {
        self.tags.add(input);
    }

    pub fn add_attributes<I: Into<DirectiveInput>>(&mut self, input: I) {
        self.attributes.add(input);
    }

    pub fn store(&self, domain: WhitelistDomain) -> &WhitelistStore {
        match domain {
            WhitelistDomain::Tags => &self.tags,
            WhitelistDomain::Attributes => &self.attributes,
        }
    }

    pub fn has_custom_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn has_custom_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    pub fn is_customized(&self) -> bool {
        self.has_custom_tags() || self.has_custom_attributes()
    }

    pub fn effective_tags<'a>(&self, base: &'a [String]) -> Cow<'a, [String]> {
        Self::effective(&self.tags, base)
    }

    pub fn effective_attributes<'a>(&self, base: &'a [String]) -> Cow<'a, [String]> {
        Self::effective(&self.attributes, base)
    }

    // An untouched domain hands the base set back without copying it.
    fn effective<'a>(store: &WhitelistStore, base: &'a [String]) -> Cow<'a, [String]> {
        if store.is_empty() {
            Cow::Borrowed(base)
        } else {
            Cow::Owned(store.resolve(base))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitelist::DirectiveInput;

    fn base() -> Vec<String> {
        vec!["svg".to_string(), "rect".to_string(), "style".to_string()]
    }

    #[test]
    fn test_uncustomized_domain_borrows_base() {
        let merger = WhitelistMerger::new();
        let base = base();
        let effective = merger.effective_tags(&base);
        assert!(matches!(effective, Cow::Borrowed(_)));
        assert_eq!(effective.as_ref(), base.as_slice());
        assert!(!merger.is_customized());
    }

    #[test]
    fn test_domains_are_independent() {
        let mut merger = WhitelistMerger::new();
        merger.add_tags("-style foreignobject");

        let base = base();
        assert_eq!(merger.effective_tags(&base).as_ref(), ["svg", "rect", "foreignobject"]);
        assert!(matches!(merger.effective_attributes(&base), Cow::Borrowed(_)));
        assert!(merger.has_custom_tags());
        assert!(!merger.has_custom_attributes());
    }

    #[test]
    fn test_from_config_reads_both_blocks() {
        let config = SanitizerConfig {
            custom_tags: Some(DirectiveInput::Text("-rect".to_string())),
            custom_attrs: Some(DirectiveInput::Lines(vec!["data-id".to_string()])),
            ..SanitizerConfig::default()
        };
        let merger = WhitelistMerger::from_config(&config);
        let base = base();

        assert_eq!(merger.effective_tags(&base).as_ref(), ["svg", "style"]);
        assert_eq!(
            merger.effective_attributes(&base).as_ref(),
            ["svg", "rect", "style", "data-id"]
        );
        assert_eq!(merger.store(WhitelistDomain::Attributes).lines(), ["data-id"]);
    }
}

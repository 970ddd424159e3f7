//! Directive parsing and the per-domain whitelist store.
//!
//! Users customize the sanitizer's allowed tags and attributes with short
//! directive lines: `foo` or `+foo` allows `foo`, `-foo` disallows it. A
//! [`WhitelistStore`] accumulates those lines for one [`WhitelistDomain`] and
//! resolves them against the engine's base set.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of name a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistDomain {
    Tags,
    Attributes,
}

impl fmt::Display for WhitelistDomain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WhitelistDomain::Tags => write!(f, "tags"),
            WhitelistDomain::Attributes => write!(f, "attributes"),
        }
    }
}

/// A single parsed add/remove instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    Add(String),
    Remove(String),
}

impl Directive {
    /// Parses one trimmed, non-empty line.
    ///
    /// Returns `None` when nothing is left of the name once the `+`/`-`
    /// markers are stripped.
    pub fn parse(line: &str) -> Option<Self> {
        let directive = if line.starts_with('-') {
            Directive::Remove(line.trim_matches(|c: char| c == '-' || c.is_whitespace()).to_string())
        } else {
            Directive::Add(line.trim_start_matches(|c: char| c == '+' || c.is_whitespace()).to_string())
        };

        if directive.name().is_empty() {
            None
        } else {
            Some(directive)
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Directive::Add(name) | Directive::Remove(name) => name,
        }
    }
}

/// Raw directive input: one delimited string or lines that are already split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveInput {
    Text(String),
    Lines(Vec<String>),
}

impl DirectiveInput {
    /// Normalizes the input into trimmed, non-empty lines.
    ///
    /// Text is split on any whitespace, so `"a -b"` and `"a\n-b"` are the same.
    /// Lines are only trimmed; an element is never split further.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            DirectiveInput::Text(text) => text
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            DirectiveInput::Lines(lines) => lines
                .into_iter()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
        }
    }
}

impl From<&str> for DirectiveInput {
    fn from(text: &str) -> Self {
        DirectiveInput::Text(text.to_string())
    }
}

impl From<String> for DirectiveInput {
    fn from(text: String) -> Self {
        DirectiveInput::Text(text)
    }
}

impl From<Vec<String>> for DirectiveInput {
    fn from(lines: Vec<String>) -> Self {
        DirectiveInput::Lines(lines)
    }
}

impl From<Vec<&str>> for DirectiveInput {
    fn from(lines: Vec<&str>) -> Self {
        DirectiveInput::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for DirectiveInput {
    fn from(lines: &[&str]) -> Self {
        DirectiveInput::Lines(lines.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for DirectiveInput {
    fn from(lines: [&str; N]) -> Self {
        DirectiveInput::Lines(lines.iter().map(|s| s.to_string()).collect())
    }
}

/// Accumulated directive lines for a single domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistStore {
    domain: WhitelistDomain,
    lines: Vec<String>,
}

impl WhitelistStore {
    pub fn new(domain: WhitelistDomain) -> Self {
        Self {
            domain,
            lines: Vec::new(),
        }
    }

    pub fn domain(&self) -> WhitelistDomain {
        self.domain
    }

    /// Appends directive lines. Repeated calls accumulate.
    pub fn add<I: Into<DirectiveInput>>(&mut self, input: I) {
        let lines = input.into().into_lines();
        debug!("Adding {} directive line(s) to the {} store.", lines.len(), self.domain);
        self.lines.extend(lines);
    }

    /// The raw lines in the order they were added.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn directives(&self) -> Vec<Directive> {
        self.lines.iter().filter_map(|line| Directive::parse(line)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Applies every directive, in order, to a copy of `base`.
    ///
    /// A removal targets the first position of the name in `base` itself, not
    /// in the working copy, so it can only ever drop a base entry. Names added
    /// by earlier directives survive a later removal of the same name.
    pub fn resolve(&self, base: &[String]) -> Vec<String> {
        let mut working: Vec<Option<String>> = base.iter().cloned().map(Some).collect();

        for line in &self.lines {
            match Directive::parse(line) {
                Some(Directive::Remove(name)) => {
                    match base.iter().position(|candidate| *candidate == name) {
                        Some(index) => working[index] = None,
                        None => debug!("{} directive '-{}' matches no base entry.", self.domain, name),
                    }
                }
                Some(Directive::Add(name)) => working.push(Some(name)),
                None => debug!("Ignoring empty {} directive '{}'.", self.domain, line),
            }
        }

        let resolved: Vec<String> = working.into_iter().flatten().collect();
        debug!(
            "Resolved {} whitelist: {} base entries -> {} effective entries.",
            self.domain,
            base.len(),
            resolved.len()
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    fn store_with(lines: &[&str]) -> WhitelistStore {
        let mut store = WhitelistStore::new(WhitelistDomain::Tags);
        store.add(lines);
        store
    }

    #[test]
    fn test_resolve_without_directives_is_identity() {
        let store = WhitelistStore::new(WhitelistDomain::Tags);
        assert_eq!(store.resolve(&base()), base());
    }

    #[test]
    fn test_add_appends_to_base() {
        assert_eq!(store_with(&["foo"]).resolve(&base()), vec!["a", "b", "foo"]);
    }

    #[test]
    fn test_remove_strips_base_entry() {
        assert_eq!(store_with(&["-a"]).resolve(&base()), vec!["b"]);
    }

    #[test]
    fn test_remove_does_not_cancel_an_added_name() {
        assert_eq!(store_with(&["foo", "-foo"]).resolve(&base()), vec!["a", "b", "foo"]);
    }

    #[test]
    fn test_remove_of_absent_name_is_noop() {
        assert_eq!(store_with(&["-zzz"]).resolve(&base()), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_twice_only_drops_first_base_occurrence() {
        let base = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(store_with(&["-a", "-a"]).resolve(&base), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_then_readd_restores_name_at_end() {
        assert_eq!(store_with(&["-a", "a"]).resolve(&base()), vec!["b", "a"]);
    }

    #[test]
    fn test_add_keeps_duplicates() {
        assert_eq!(store_with(&["a", "+a"]).resolve(&base()), vec!["a", "b", "a", "a"]);
    }

    #[test]
    fn test_text_and_lines_normalize_identically() {
        let mut from_text = WhitelistStore::new(WhitelistDomain::Attributes);
        from_text.add("  foo \n -bar  ");
        let mut from_lines = WhitelistStore::new(WhitelistDomain::Attributes);
        from_lines.add(vec!["foo", "-bar"]);

        assert_eq!(from_text.lines(), from_lines.lines());
        assert_eq!(
            from_text.directives(),
            vec![Directive::Add("foo".to_string()), Directive::Remove("bar".to_string())]
        );
    }

    #[test]
    fn test_text_splits_on_spaces_and_tabs() {
        let mut store = WhitelistStore::new(WhitelistDomain::Tags);
        store.add("foo  bar\t-baz\n\n");
        assert_eq!(store.lines(), ["foo", "bar", "-baz"]);
    }

    #[test]
    fn test_add_accumulates_across_calls() {
        let mut store = WhitelistStore::new(WhitelistDomain::Tags);
        store.add("foo");
        store.add(vec!["bar".to_string(), "  ".to_string()]);
        assert_eq!(store.lines(), ["foo", "bar"]);
    }

    #[test]
    fn test_directive_parse_strips_markers() {
        assert_eq!(Directive::parse("+foo"), Some(Directive::Add("foo".to_string())));
        assert_eq!(Directive::parse("- foo-"), Some(Directive::Remove("foo".to_string())));
        assert_eq!(Directive::parse("--foo"), Some(Directive::Remove("foo".to_string())));
        assert_eq!(Directive::parse("+"), None);
        assert_eq!(Directive::parse("-"), None);
    }

    #[test]
    fn test_directive_parse_strips_any_whitespace_after_marker() {
        assert_eq!(Directive::parse("-\ta"), Some(Directive::Remove("a".to_string())));
        assert_eq!(Directive::parse("+\tc"), Some(Directive::Add("c".to_string())));
        assert_eq!(Directive::parse("-\t"), None);

        let store = store_with(&["-\ta"]);
        assert_eq!(store.resolve(&base()), vec!["b".to_string()]);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let store = store_with(&["x", "-b", "y", "-nope"]);
        let first = store.resolve(&base());
        let second = store.resolve(&base());
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "x", "y"]);
    }
}

// svgward-core/src/engines/xml_engine.rs
//! A `SvgSanitizer` implementation that streams the document through
//! `quick-xml` and drops everything outside the allowed tag and attribute
//! sets.
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::collections::HashSet;

use anyhow::Result;
use log::debug;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::config::Whitelist;
use crate::engine::{SanitizationIssue, SanitizePass, SvgSanitizer};
use crate::errors::SvgwardError;

/// URI schemes that are never allowed in an `href`.
const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Inline images that remain allowed despite the `data:` scheme.
const SAFE_DATA_PREFIXES: &[&str] = &[
    "data:image/png",
    "data:image/gif",
    "data:image/jpg",
    "data:image/jpeg",
];

pub const ENGINE_NAME: &str = "xml-whitelist";

#[derive(Debug, Clone)]
pub struct XmlWhitelistEngine {
    defaults: Whitelist,
    allowed_tags: HashSet<String>,
    allowed_attributes: HashSet<String>,
    remove_remote_references: bool,
    minify: bool,
}

impl XmlWhitelistEngine {
    pub fn new() -> Result<Self> {
        Ok(Self::with_defaults(Whitelist::load_default()?))
    }

    /// Builds an engine whose built-in whitelist is `defaults`.
    pub fn with_defaults(defaults: Whitelist) -> Self {
        let allowed_tags = lowercase_set(&defaults.tags);
        let allowed_attributes = lowercase_set(&defaults.attributes);
        Self {
            defaults,
            allowed_tags,
            allowed_attributes,
            remove_remote_references: false,
            minify: false,
        }
    }

    fn rewrite(&self, raw: &[u8], issues: &mut Vec<SanitizationIssue>) -> Result<Vec<u8>, SanitizationIssue> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(SanitizationIssue::new("Document is empty", 1));
        }

        let mut reader = Reader::from_reader(raw);
        reader.config_mut().trim_text(false);
        let mut writer = Writer::new(Vec::with_capacity(raw.len()));

        let mut skip_depth = 0usize;
        let mut open_elements = 0usize;
        let mut seen_element = false;
        let mut lines = LineCursor::default();

        loop {
            let offset = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| {
                SanitizationIssue::new(e.to_string(), lines.line_at(raw, reader.error_position() as usize))
            })?;
            let line = lines.line_at(raw, offset);

            let written = match event {
                Event::Eof => break,
                Event::Start(start) => {
                    if open_elements == 0 && seen_element {
                        return Err(extra_content(line));
                    }
                    open_elements += 1;
                    seen_element = true;
                    if skip_depth > 0 {
                        skip_depth += 1;
                        continue;
                    }
                    if !self.is_allowed_tag(&start) {
                        issues.push(suspicious_tag(&start, line));
                        skip_depth = 1;
                        continue;
                    }
                    let cleaned = self.clean_attributes(start, line, issues)?;
                    writer.write_event(Event::Start(cleaned))
                }
                Event::End(end) => {
                    open_elements = open_elements.saturating_sub(1);
                    if skip_depth > 0 {
                        skip_depth -= 1;
                        continue;
                    }
                    writer.write_event(Event::End(end))
                }
                Event::Empty(start) => {
                    if open_elements == 0 && seen_element {
                        return Err(extra_content(line));
                    }
                    seen_element = true;
                    if skip_depth > 0 {
                        continue;
                    }
                    if !self.is_allowed_tag(&start) {
                        issues.push(suspicious_tag(&start, line));
                        continue;
                    }
                    let cleaned = self.clean_attributes(start, line, issues)?;
                    writer.write_event(Event::Empty(cleaned))
                }
                Event::Text(text) => {
                    let blank = text.iter().all(u8::is_ascii_whitespace);
                    if open_elements == 0 && !blank {
                        return Err(if seen_element {
                            extra_content(line)
                        } else {
                            SanitizationIssue::new("Start tag expected, '<' not found", line)
                        });
                    }
                    if skip_depth > 0 || (self.minify && blank) {
                        continue;
                    }
                    writer.write_event(Event::Text(text))
                }
                Event::CData(data) => {
                    if skip_depth > 0 {
                        continue;
                    }
                    writer.write_event(Event::CData(data))
                }
                Event::Decl(decl) => writer.write_event(Event::Decl(decl)),
                // Comments can hide conditional markup; a DOCTYPE can declare entities.
                Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
            };

            written.map_err(|e| {
                SanitizationIssue::new(format!("Failed to write sanitized output: {}", e), line)
            })?;
        }

        if open_elements > 0 {
            return Err(SanitizationIssue::new(
                "Premature end of data, unclosed element",
                lines.line_at(raw, raw.len()),
            ));
        }
        if !seen_element {
            return Err(SanitizationIssue::new("Document has no root element", lines.line_at(raw, raw.len())));
        }

        Ok(writer.into_inner())
    }

    fn is_allowed_tag(&self, start: &BytesStart) -> bool {
        let local = String::from_utf8_lossy(start.local_name().as_ref()).to_ascii_lowercase();
        self.allowed_tags.contains(&local)
    }

    /// Returns the start tag unchanged unless an attribute has to go, in which
    /// case the tag is rebuilt from the surviving attributes.
    fn clean_attributes<'a>(
        &self,
        start: BytesStart<'a>,
        line: u64,
        issues: &mut Vec<SanitizationIssue>,
    ) -> Result<BytesStart<'a>, SanitizationIssue> {
        let rebuilt = {
            let mut kept = Vec::new();
            let mut dropped = false;

            for attr in start.attributes() {
                let attr = attr.map_err(|e| SanitizationIssue::new(e.to_string(), line))?;
                let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                if self.is_suspicious_attribute(&name, &attr) {
                    issues.push(SanitizationIssue::new(format!("Suspicious attribute '{}'", name), line));
                    dropped = true;
                } else {
                    kept.push(attr);
                }
            }

            if dropped {
                let mut rebuilt = BytesStart::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                for attr in kept {
                    rebuilt.push_attribute(double_quoted(attr));
                }
                Some(rebuilt)
            } else {
                None
            }
        };

        Ok(rebuilt.unwrap_or(start))
    }

    fn is_suspicious_attribute(&self, name: &str, attr: &Attribute) -> bool {
        let lower = name.to_ascii_lowercase();
        if lower == "xmlns" || lower.starts_with("xmlns:") {
            return false;
        }
        if !self.allowed_attributes.contains(&lower) {
            return true;
        }

        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        let compact: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect::<String>()
            .to_ascii_lowercase();

        if lower == "href" || lower.ends_with(":href") {
            if has_dangerous_scheme(&compact) {
                return true;
            }
            if self.remove_remote_references && !is_local_reference(&compact) {
                debug!("Dropping remote reference in '{}'.", name);
                return true;
            }
        }

        if lower == "style" && (compact.contains("javascript:") || compact.contains("expression(")) {
            return true;
        }

        self.remove_remote_references && has_remote_url(&compact)
    }
}

impl SvgSanitizer for XmlWhitelistEngine {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn check_available(&self) -> Result<(), SvgwardError> {
        if self.defaults.tags.is_empty() || self.defaults.attributes.is_empty() {
            return Err(SvgwardError::EngineUnavailable {
                engine: ENGINE_NAME.to_string(),
                reason: "built-in whitelist is empty".to_string(),
            });
        }
        Ok(())
    }

    fn sanitize(&self, raw: &[u8]) -> SanitizePass {
        let mut issues = Vec::new();
        match self.rewrite(raw, &mut issues) {
            Ok(output) => SanitizePass::cleaned(output, issues),
            Err(failure) => {
                debug!("Sanitization failed: {}", failure);
                issues.push(failure);
                SanitizePass::failed(issues)
            }
        }
    }

    fn set_remove_remote_references(&mut self, enabled: bool) {
        self.remove_remote_references = enabled;
    }

    fn set_minify(&mut self, enabled: bool) {
        self.minify = enabled;
    }

    fn set_allowed_tags(&mut self, tags: Vec<String>) {
        self.allowed_tags = lowercase_set(&tags);
    }

    fn set_allowed_attributes(&mut self, attributes: Vec<String>) {
        self.allowed_attributes = lowercase_set(&attributes);
    }

    fn default_tags(&self) -> &[String] {
        &self.defaults.tags
    }

    fn default_attributes(&self) -> &[String] {
        &self.defaults.attributes
    }
}

fn lowercase_set(names: &[String]) -> HashSet<String> {
    names.iter().map(|name| name.to_ascii_lowercase()).collect()
}

/// Maps byte offsets to 1-based line numbers, counting only the newlines
/// between the previous offset and the requested one.
#[derive(Debug, Default)]
struct LineCursor {
    offset: usize,
    newlines: u64,
}

impl LineCursor {
    fn line_at(&mut self, raw: &[u8], offset: usize) -> u64 {
        let end = offset.min(raw.len());
        if end < self.offset {
            self.offset = 0;
            self.newlines = 0;
        }
        self.newlines += raw[self.offset..end].iter().filter(|&&b| b == b'\n').count() as u64;
        self.offset = end;
        self.newlines + 1
    }
}

fn extra_content(line: u64) -> SanitizationIssue {
    SanitizationIssue::new("Extra content at the end of the document", line)
}

fn suspicious_tag(start: &BytesStart, line: u64) -> SanitizationIssue {
    SanitizationIssue::new(
        format!("Suspicious tag '{}'", String::from_utf8_lossy(start.name().as_ref())),
        line,
    )
}

fn has_dangerous_scheme(value: &str) -> bool {
    DANGEROUS_SCHEMES.iter().any(|scheme| value.starts_with(scheme))
        && !SAFE_DATA_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

fn is_local_reference(value: &str) -> bool {
    value.is_empty() || value.starts_with('#') || SAFE_DATA_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

fn has_remote_url(value: &str) -> bool {
    value.match_indices("url(").any(|(index, _)| {
        let target = value[index + 4..].trim_start_matches(|c| c == '"' || c == '\'');
        !target.starts_with('#')
    })
}

// Attribute values are written back between double quotes.
fn double_quoted(attr: Attribute<'_>) -> Attribute<'_> {
    if !attr.value.contains(&b'"') {
        return attr;
    }
    let mut value = Vec::with_capacity(attr.value.len() + 8);
    for &b in attr.value.iter() {
        if b == b'"' {
            value.extend_from_slice(b"&quot;");
        } else {
            value.push(b);
        }
    }
    Attribute {
        key: attr.key,
        value: Cow::Owned(value),
    }
}

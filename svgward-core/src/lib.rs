// svgward-core/src/lib.rs
//! # svgward Core Library
//!
//! `svgward-core` decides whether an uploaded SVG document is safe to keep.
//! It merges a sanitizer's built-in tag and attribute whitelists with
//! user-supplied add/remove directives, runs one sanitization pass over the
//! document and then accepts it, rewrites it in place, or rejects it.
//!
//! ## Modules
//!
//! * `whitelist`: Directive parsing and the per-domain `WhitelistStore`.
//! * `merger`: `WhitelistMerger`, which turns a base set plus directives into an effective set.
//! * `engine`: The `SvgSanitizer` trait and the data a sanitization pass produces.
//! * `engines`: Concrete implementations of `SvgSanitizer`.
//! * `validator`: The validate-or-sanitize decision engine, `SvgValidator`.
//! * `storage`: The `FileStore` trait and the local filesystem store.
//! * `config`: `SanitizerConfig` and the embedded default whitelist.
//! * `headless`: One-shot helpers for non-interactive use.
//! * `errors`: The crate error type.
//!
//! ## Public API
//!
//! **Configuration & Whitelists**
//!
//! * [`SanitizerConfig`]: Flags and custom directive blocks, loadable from YAML.
//! * [`WhitelistStore`]: Ordered directive lines for one domain, with [`WhitelistStore::resolve`].
//! * [`WhitelistMerger`]: One store per domain; borrows the base set untouched when there is nothing to merge.
//! * [`Whitelist`]: A tag list and an attribute list, as reported to callers.
//!
//! **Sanitization Engine**
//!
//! * [`SvgSanitizer`]: A trait for pluggable sanitizers.
//! * [`XmlWhitelistEngine`]: The bundled `quick-xml` backed implementation.
//!
//! **Decision Engine**
//!
//! * [`SvgValidator`]: Validates a file and returns a [`ValidationReport`] carrying a [`Verdict`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use svgward_core::{SanitizerConfig, SvgValidator, DirectiveInput};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = SanitizerConfig {
//!         custom_tags: Some(DirectiveInput::from("-style")),
//!         ..SanitizerConfig::default()
//!     };
//!     let validator = SvgValidator::with_defaults(config)?;
//!
//!     let report = validator.validate(Path::new("upload.svg"));
//!     if !report.is_valid() {
//!         for error in &report.errors {
//!             eprintln!("{}", error);
//!         }
//!     } else if report.requires_reload() {
//!         println!("upload.svg was rewritten");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Loaders return `anyhow::Result`. Validator construction returns
//! [`SvgwardError`]; per-file problems never surface as errors and are
//! reported through the verdict instead.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod merger;
pub mod storage;
pub mod validator;
pub mod whitelist;

/// Re-exports the configuration types.
pub use config::{SanitizerConfig, Whitelist};

/// Re-exports the custom error type for clear error reporting.
pub use errors::SvgwardError;

/// Re-exports types related to the sanitizer trait.
pub use engine::{SanitizationIssue, SanitizationOutcome, SanitizePass, SvgSanitizer};

pub use engines::xml_engine::XmlWhitelistEngine;

pub use merger::WhitelistMerger;

pub use whitelist::{Directive, DirectiveInput, WhitelistDomain, WhitelistStore};

pub use storage::{FileStore, LocalFileStore};

/// Re-exports the decision engine and its report types.
pub use validator::{format_issues, Acceptance, Rejection, SvgValidator, ValidationReport, Verdict};

/// Re-exports functions for one-shot, non-interactive use.
pub use headless::{sanitize_bytes, validate_file};

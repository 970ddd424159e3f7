// svgward/src/cli.rs
//! This file defines the command-line interface (CLI) for the svgward application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "svgward",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate uploaded SVG files against a customizable whitelist",
    long_about = "svgward checks uploaded SVG documents against a whitelist of allowed tags and attributes. Clean files are left untouched, files that can be made safe are rewritten in place, and files that cannot be sanitized are rejected.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `svgward` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validates SVG files, rewriting or rejecting unsafe ones.
    #[command(about = "Validates SVG files, rewriting or rejecting unsafe ones.")]
    Validate(ValidateCommand),

    /// Prints the default or effective whitelist.
    #[command(about = "Prints the default or effective tag and attribute whitelist.")]
    Whitelist(WhitelistCommand),
}

/// Settings shared by every command that builds a validator.
#[derive(Args, Debug, Clone, Default)]
pub struct SanitizerArgs {
    /// Path to a sanitizer configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "SVGWARD_CONFIG", help = "Path to a sanitizer configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Extra tag directives, applied after those in the configuration file.
    #[arg(
        long = "tags",
        value_name = "DIRECTIVES",
        allow_hyphen_values = true,
        help = "Tag directives such as \"foreignobject -style\". May be repeated."
    )]
    pub tags: Vec<String>,

    /// Extra attribute directives, applied after those in the configuration file.
    #[arg(
        long = "attrs",
        value_name = "DIRECTIVES",
        allow_hyphen_values = true,
        help = "Attribute directives such as \"data-id -style\". May be repeated."
    )]
    pub attrs: Vec<String>,

    /// Keep references to remote resources.
    #[arg(long = "keep-remote-references", help = "Keep href and url() references to remote resources.")]
    pub keep_remote_references: bool,

    /// Drop whitespace-only text from rewritten files.
    #[arg(long = "minify", help = "Drop whitespace-only text from sanitized output.")]
    pub minify: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// The SVG files to validate.
    #[arg(value_name = "FILE", required = true, help = "One or more SVG files to validate.")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub sanitizer: SanitizerArgs,

    /// Classify files without writing anything.
    #[arg(long = "dry-run", help = "Report what would happen without rewriting any file.")]
    pub dry_run: bool,

    /// Show a unified diff for every rewritten file.
    #[arg(long, short = 'D', help = "Show a unified diff for every rewritten file.")]
    pub diff: bool,

    /// Print a JSON report to stdout instead of the per-file summary.
    #[arg(long = "json", help = "Print the validation report as JSON.")]
    pub json: bool,
}

/// Arguments for the `whitelist` command.
#[derive(Args, Debug)]
pub struct WhitelistCommand {
    #[command(flatten)]
    pub sanitizer: SanitizerArgs,

    /// Print the whitelist after custom directives are applied.
    #[arg(long = "effective", help = "Show the whitelist after custom directives are applied.")]
    pub effective: bool,

    /// Print the whitelist as JSON.
    #[arg(long = "json", help = "Print the whitelist as JSON.")]
    pub json: bool,
}

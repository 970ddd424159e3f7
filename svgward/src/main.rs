// svgward/src/main.rs
//! svgward entry point.
//!
//! Exit status: 0 when every file is accepted, 1 when any file is rejected,
//! 2 when the run could not start (bad configuration, unreadable theme).

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use std::process::ExitCode;

use svgward::cli::{Cli, Commands};
use svgward::commands::{validate, whitelist};
use svgward::logger;
use svgward::ui::output_format;
use svgward::ui::theme::{ThemeStyle, build_theme_map};

fn run(cli: &Cli) -> Result<bool> {
    let theme_map = build_theme_map(cli.theme.as_deref()).context("Theme error")?;

    match &cli.command {
        Commands::Validate(cmd) => validate::run_validate(cmd, &theme_map),
        Commands::Whitelist(cmd) => whitelist::run_whitelist(cmd, &theme_map).map(|()| true),
    }
}

fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            let stderr = std::io::stderr();
            let _ = output_format::print_error_message(
                &mut stderr.lock(),
                &format!("{:#}", e),
                &ThemeStyle::default_theme_map(),
                stderr.is_terminal(),
            );
            ExitCode::from(2)
        }
    }
}

// svgward/src/lib.rs
//! # svgward CLI Application
//!
//! This crate provides the command line front end for `svgward-core`: the
//! `validate` command runs the decision engine over uploaded files and the
//! `whitelist` command shows what the engine allows.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

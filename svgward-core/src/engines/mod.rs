//! This module contains the sanitizer backends.
//!
//! Each backend is a separate file within this directory and implements the
//! `SvgSanitizer` trait. The decision engine only talks to the trait, so a
//! backend built on a different XML stack can be dropped in next to the
//! bundled one.
//!
//! # License
//! MIT OR Apache-2.0

pub mod xml_engine;

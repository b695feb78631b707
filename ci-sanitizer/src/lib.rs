// ci-sanitizer/src/lib.rs
//! # ci-sanitizer CLI
//!
//! Command-line front end for `ci-sanitizer-core`: sanitize files or stdin,
//! list the rule catalog and apply audit-log retention.

pub mod cli;
pub mod commands;
pub mod logger;

//! Subcommand implementations and the helpers they share.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use owo_colors::OwoColorize;
use std::io::{self, Write};

use ci_sanitizer_core::SanitizerConfig;

use crate::cli::ConfigArgs;

pub mod cleanup;
pub mod rules;
pub mod sanitize;

/// Builds the sanitizer configuration: defaults, then `--config`, then flags.
pub fn load_config(args: &ConfigArgs) -> Result<SanitizerConfig> {
    let mut config = match &args.config {
        Some(path) => SanitizerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => SanitizerConfig::default(),
    };

    if let Some(dir) = &args.audit_dir {
        config.audit_log_dir = dir.clone();
    }
    if let Some(days) = args.retention_days {
        config.audit_retention_days = days;
    }

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Prints an informational message to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let mut stderr = io::stderr();
    let _ = if stderr.is_terminal() {
        writeln!(stderr, "{}", msg.as_ref().cyan())
    } else {
        writeln!(stderr, "{}", msg.as_ref())
    };
}

/// Prints a warning to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let mut stderr = io::stderr();
    let _ = if stderr.is_terminal() {
        writeln!(stderr, "{} {}", "warning:".yellow().bold(), msg.as_ref())
    } else {
        writeln!(stderr, "warning: {}", msg.as_ref())
    };
}

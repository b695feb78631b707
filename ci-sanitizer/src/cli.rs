//! Command-line interface definition for `ci-sanitizer`.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "ci-sanitizer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scrub secrets from CI/CD artifacts",
    long_about = "ci-sanitizer removes credentials, tokens and private keys from CI job logs and test output before they are stored publicly or handed to automated analysis. Every run can be recorded in an append-only audit log.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress informational messages and the redaction summary.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes an input file or stdin.
    Sanitize(SanitizeCommand),

    /// Deletes the audit log once it is older than the retention window.
    Cleanup(CleanupCommand),

    /// Lists the redaction rules in application order.
    Rules(RulesCommand),
}

/// Settings shared by every command that builds a sanitizer.
/// Flags override values from `--config`.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a sanitizer configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "CI_SANITIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the audit log.
    #[arg(long = "audit-dir", value_name = "DIR", env = "CI_SANITIZER_AUDIT_DIR")]
    pub audit_dir: Option<PathBuf>,

    /// Audit retention in days (0 disables cleanup).
    #[arg(long = "retention-days", value_name = "DAYS", env = "CI_SANITIZER_RETENTION_DAYS")]
    pub retention_days: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    /// Read input from this file instead of stdin.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Source label recorded in results and the audit log.
    #[arg(long, value_name = "LABEL")]
    pub source: Option<String>,

    #[command(flatten)]
    pub config_args: ConfigArgs,

    /// Do not write audit entries.
    #[arg(long = "no-audit")]
    pub no_audit: bool,

    /// Maximum input size in bytes (0 or less disables the check).
    #[arg(long = "max-content-size", value_name = "BYTES", allow_negative_numbers = true)]
    pub max_content_size: Option<i64>,

    /// Fail on any rule error instead of skipping the rule.
    #[arg(long)]
    pub strict: bool,

    /// Strip ANSI escape sequences before matching.
    #[arg(long = "strip-ansi")]
    pub strip_ansi: bool,

    /// Sanitize each line as a separate batch item labelled `<source>:<line>`.
    #[arg(long = "line-buffered")]
    pub line_buffered: bool,

    /// Emit the full result as JSON instead of the bare content.
    #[arg(long)]
    pub json: bool,

    /// Suppress the redaction summary on stderr.
    #[arg(long = "no-redaction-summary")]
    pub no_summary: bool,
}

#[derive(Parser, Debug)]
pub struct CleanupCommand {
    #[command(flatten)]
    pub config_args: ConfigArgs,
}

#[derive(Parser, Debug)]
pub struct RulesCommand {
    /// Include disabled rules.
    #[arg(long)]
    pub all: bool,

    /// Path to a sanitizer configuration file whose custom rules are listed too.
    #[arg(long = "config", value_name = "FILE", env = "CI_SANITIZER_CONFIG")]
    pub config: Option<PathBuf>,
}

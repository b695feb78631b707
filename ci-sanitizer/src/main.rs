// ci-sanitizer/src/main.rs
//! `ci-sanitizer` entry point.
//!
//! Parses the command line, builds a [`Sanitizer`] from defaults, an optional
//! YAML config and flag overrides, then dispatches to the chosen command.

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug};

use ci_sanitizer::cli::{Cli, Commands, SanitizeCommand};
use ci_sanitizer::commands::{self, cleanup, rules, sanitize};
use ci_sanitizer::logger;
use ci_sanitizer_core::{
    SanitizationEngine, Sanitizer, SanitizerConfig, compile_rules, validate_rules,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    debug!("Parsed CLI arguments: {:?}", cli);

    match cli.command {
        Commands::Sanitize(cmd) => run_sanitize_command(cmd, cli.quiet),
        Commands::Cleanup(cmd) => {
            let config = commands::load_config(&cmd.config_args)?;
            let sanitizer = Sanitizer::new(config).context("Failed to initialize sanitizer")?;
            let outcome = cleanup::run_cleanup(&sanitizer, cli.quiet);
            sanitizer.shutdown();
            outcome
        }
        Commands::Rules(cmd) => {
            let config = match &cmd.config {
                Some(path) => SanitizerConfig::load_from_file(path)?,
                None => SanitizerConfig::default(),
            };
            let all = config.all_rules();
            validate_rules(&all)?;
            rules::run_rules(&compile_rules(all), cmd.all);
            Ok(())
        }
    }
}

fn run_sanitize_command(cmd: SanitizeCommand, quiet: bool) -> Result<()> {
    let mut config = commands::load_config(&cmd.config_args)?;
    if cmd.no_audit {
        config.enable_audit = false;
    }
    if let Some(limit) = cmd.max_content_size {
        config.max_content_size = limit;
    }
    config.strict_mode |= cmd.strict;
    config.strip_ansi |= cmd.strip_ansi;

    let sanitizer = Sanitizer::new(config).context("Failed to initialize sanitizer")?;
    if sanitizer.config().enable_audit && sanitizer.audit_log_path().is_none() && !quiet {
        commands::warn_msg("audit logging unavailable; continuing without an audit trail");
    }

    let input = sanitize::read_input(cmd.input_file.as_ref())?;
    let source = cmd.source.clone().unwrap_or_else(|| match &cmd.input_file {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    });

    let opts = sanitize::SanitizeOptions {
        input,
        source,
        output_path: cmd.output,
        line_buffered: cmd.line_buffered,
        json: cmd.json,
        no_redaction_summary: cmd.no_summary,
        quiet,
    };
    let outcome = sanitize::run_sanitize(&sanitizer, &opts);
    sanitizer.shutdown();
    outcome.map(|_| ())
}

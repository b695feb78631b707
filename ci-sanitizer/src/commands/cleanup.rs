//! The `cleanup` command: applies audit-log retention.

use anyhow::{Context, Result};
use log::info;

use ci_sanitizer_core::SanitizationEngine;

use super::info_msg;

/// Runs retention cleanup for `engine`'s audit log.
pub fn run_cleanup(engine: &dyn SanitizationEngine, quiet: bool) -> Result<()> {
    let config = engine.config();
    if !config.enable_audit {
        info!("Audit logging disabled; nothing to clean up.");
        return Ok(());
    }

    engine
        .cleanup_audit_logs()
        .context("Audit log cleanup failed")?;

    if !quiet {
        match config.audit_retention_days {
            0 => info_msg("Audit retention disabled (0 days); audit log kept."),
            days => info_msg(format!(
                "Applied {}-day audit retention in {}.",
                days,
                config.audit_log_dir.display()
            )),
        }
    }
    Ok(())
}

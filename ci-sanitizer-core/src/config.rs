//! Configuration management for `ci-sanitizer-core`.
//!
//! [`SanitizerConfig`] is the immutable run-time policy of a sanitizer: audit
//! settings, the input size ceiling, strictness and any caller-supplied rules.
//! It can be built in code or loaded from a YAML file where every key is
//! optional and falls back to the defaults.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rules::{default_rules, validate_rules, SanitizationRule};

/// Default ceiling on input size: 10 MiB.
pub const DEFAULT_MAX_CONTENT_SIZE: i64 = 10 * 1024 * 1024;

/// Default audit retention in days.
pub const DEFAULT_AUDIT_RETENTION_DAYS: u32 = 30;

/// Default directory holding `sanitizer-audit.log`.
pub const DEFAULT_AUDIT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Persist an audit entry per sanitization call.
    pub enable_audit: bool,
    /// Directory for the audit log; created when missing.
    pub audit_log_dir: PathBuf,
    /// Age in days after which the audit log is deleted. `0` disables cleanup.
    pub audit_retention_days: u32,
    /// Hard ceiling on input size in bytes. `<= 0` disables the check.
    pub max_content_size: i64,
    /// Abort on any failing rule, and on audit setup failure.
    pub strict_mode: bool,
    /// Do not write audit entries for calls that matched nothing.
    pub skip_audit_on_no_match: bool,
    /// Strip ANSI escape sequences before matching.
    pub strip_ansi: bool,
    /// Extra rules applied after the built-in catalog.
    pub custom_rules: Vec<SanitizationRule>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            enable_audit: true,
            audit_log_dir: PathBuf::from(DEFAULT_AUDIT_LOG_DIR),
            audit_retention_days: DEFAULT_AUDIT_RETENTION_DAYS,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            strict_mode: false,
            skip_audit_on_no_match: true,
            strip_ansi: false,
            custom_rules: Vec::new(),
        }
    }
}

impl SanitizerConfig {
    /// Loads a configuration from a YAML file. Missing keys take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading sanitizer configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SanitizerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.all_rules())
            .with_context(|| format!("Invalid custom rules in {}", path.display()))?;
        info!(
            "Loaded configuration with {} custom rules from {}.",
            config.custom_rules.len(),
            path.display()
        );

        Ok(config)
    }

    /// The built-in catalog followed by the custom rules.
    pub fn all_rules(&self) -> Vec<SanitizationRule> {
        let mut rules = default_rules();
        rules.extend(self.custom_rules.iter().cloned());
        debug!("Assembled {} rules ({} custom).", rules.len(), self.custom_rules.len());
        rules
    }

    /// Whether `size` bytes of content exceed the configured ceiling.
    pub fn exceeds_max_content_size(&self, size: usize) -> bool {
        self.max_content_size > 0 && size as u64 > self.max_content_size as u64
    }
}

// ci-sanitizer-core/src/sanitizer.rs
//! The regex-driven [`Sanitizer`], the crate's `SanitizationEngine`.
//!
//! Rules run strictly in catalog order and each one operates on the output of
//! the previous ones. A sanitizer is built once and then shared; it keeps no
//! per-call state apart from the background audit writer.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, Utc};
use log::{debug, info, log_enabled, warn, Level};
use std::path::Path;
use std::sync::Arc;
use strip_ansi_escapes::strip;

use crate::audit_log::{AuditLog, AuditWriter};
use crate::config::SanitizerConfig;
use crate::engine::SanitizationEngine;
use crate::errors::SanitizerError;
use crate::result::{log_rule_match_debug, SanitizeResult};
use crate::rules::validate_rules;
use crate::sanitizers::compiler::{compile_rules, CompiledRules};

#[derive(Debug)]
pub struct Sanitizer {
    compiled_rules: Arc<CompiledRules>,
    config: SanitizerConfig,
    audit: Option<AuditWriter>,
}

impl Sanitizer {
    /// Builds a sanitizer for `config`.
    ///
    /// Fails if the rule set is invalid, or if the audit log cannot be set up
    /// while both `enable_audit` and `strict_mode` are on. In graceful mode an
    /// audit setup failure only disables auditing.
    pub fn new(config: SanitizerConfig) -> Result<Self, SanitizerError> {
        let rules = config.all_rules();
        validate_rules(&rules)?;
        let compiled_rules = Arc::new(compile_rules(rules));

        let audit = if config.enable_audit {
            match open_audit_writer(&config.audit_log_dir) {
                Ok(writer) => Some(writer),
                Err(e) if config.strict_mode => return Err(e),
                Err(e) => {
                    warn!("Audit logging disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        info!(
            "Sanitizer ready: {} rules ({} enabled), audit {}, strict mode {}.",
            compiled_rules.len(),
            compiled_rules.enabled().count(),
            if audit.is_some() { "on" } else { "off" },
            config.strict_mode
        );

        Ok(Self { compiled_rules, config, audit })
    }

    /// A sanitizer with [`SanitizerConfig::default`].
    pub fn with_defaults() -> Result<Self, SanitizerError> {
        Self::new(SanitizerConfig::default())
    }

    /// Path of the audit log, if auditing is active.
    pub fn audit_log_path(&self) -> Option<&Path> {
        self.audit.as_ref().map(|w| w.log().path())
    }

    /// Stops the audit writer after flushing every queued entry.
    pub fn shutdown(self) {
        if let Some(writer) = self.audit {
            writer.shutdown();
        }
    }

    fn sanitize_content(
        &self,
        content: &str,
        source: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<SanitizeResult, SanitizerError> {
        if self.config.exceeds_max_content_size(content.len()) {
            return Err(SanitizerError::ContentTooLarge {
                size: content.len(),
                limit: self.config.max_content_size,
            });
        }

        let mut current = if self.config.strip_ansi {
            String::from_utf8_lossy(&strip(content.as_bytes())).into_owned()
        } else {
            content.to_string()
        };
        let mut rules_applied = Vec::new();
        let mut match_count = 0usize;

        for compiled_rule in self.compiled_rules.enabled() {
            let regex = match compiled_rule.regex() {
                Ok(regex) => regex,
                Err(e) if self.config.strict_mode => return Err(e),
                Err(e) => {
                    debug!("Skipping rule '{}': {}", compiled_rule.id(), e);
                    continue;
                }
            };

            let mut rule_matches = 0usize;
            for m in regex.find_iter(&current) {
                rule_matches += 1;
                if log_enabled!(Level::Debug) {
                    log_rule_match_debug(compiled_rule.id(), m.as_str());
                }
            }
            if rule_matches == 0 {
                continue;
            }

            let replaced = regex
                .replace_all(&current, compiled_rule.rule.replacement.as_str())
                .into_owned();
            current = replaced;
            match_count += rule_matches;
            rules_applied.push(compiled_rule.id().to_string());
        }

        let result = SanitizeResult {
            content: current,
            matches_found: match_count,
            rules_applied,
            source: source.to_string(),
            timestamp,
        };
        debug!(
            "Sanitized '{}': {} matches from {:?}.",
            source, result.matches_found, result.rules_applied
        );

        if let Some(writer) = &self.audit {
            if result.has_matches() || !self.config.skip_audit_on_no_match {
                writer.dispatch(result.audit_entry());
            }
        }

        Ok(result)
    }
}

fn open_audit_writer(dir: &Path) -> Result<AuditWriter, SanitizerError> {
    let log = AuditLog::open(dir)?;
    AuditWriter::spawn(log).map_err(|source| SanitizerError::AuditSetup {
        dir: dir.to_path_buf(),
        source,
    })
}

impl SanitizationEngine for Sanitizer {
    fn sanitize_text(&self, content: &str, source: &str) -> Result<SanitizeResult, SanitizerError> {
        self.sanitize_content(content, source, Utc::now())
    }

    fn sanitize_batch(
        &self,
        contents: &[&str],
        sources: &[&str],
    ) -> Result<Vec<SanitizeResult>, SanitizerError> {
        if contents.len() != sources.len() {
            return Err(SanitizerError::BatchLengthMismatch {
                contents: contents.len(),
                sources: sources.len(),
            });
        }

        let timestamp = Utc::now();
        contents
            .iter()
            .zip(sources)
            .enumerate()
            .map(|(index, (content, source))| {
                self.sanitize_content(content, source, timestamp)
                    .map_err(|e| SanitizerError::BatchItem { index, source: Box::new(e) })
            })
            .collect()
    }

    fn cleanup_audit_logs(&self) -> Result<(), SanitizerError> {
        match &self.audit {
            Some(writer) => writer.log().cleanup(self.config.audit_retention_days),
            None => Ok(()),
        }
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }

    fn config(&self) -> &SanitizerConfig {
        &self.config
    }
}

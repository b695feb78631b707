// ci-sanitizer-core/src/result.rs
//! Sanitization outcome and the logging helpers used while producing it.
//!
//! Matched secrets only reach debug logs in length-masked form unless
//! `CI_SANITIZER_ALLOW_DEBUG_PII=true` is set in the environment.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::audit_log::AuditEntry;

lazy_static! {
    /// Whether raw matched content may appear in debug logs. Read once.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("CI_SANITIZER_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// The outcome of one sanitization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeResult {
    /// Content after every applied rule.
    pub content: String,
    /// Total matches across all applied rules; overlapping spans are not deduplicated.
    pub matches_found: usize,
    /// IDs of rules that matched at least once, in catalog order.
    pub rules_applied: Vec<String>,
    pub source: String,
    /// When sanitization began.
    pub timestamp: DateTime<Utc>,
}

impl SanitizeResult {
    pub fn has_matches(&self) -> bool {
        self.matches_found > 0
    }

    /// The audit record describing this result.
    pub fn audit_entry(&self) -> AuditEntry {
        AuditEntry {
            timestamp: self.timestamp,
            source: self.source.clone(),
            rules_applied: self.rules_applied.clone(),
            match_count: self.matches_found,
        }
    }
}

/// Masks a sensitive string for logging, keeping only its length.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_rule_match_debug(rule_id: &str, original_sensitive_content: &str) {
    debug!(
        "Rule '{}' matched: '{}'",
        rule_id,
        get_loggable_content(original_sensitive_content)
    );
}

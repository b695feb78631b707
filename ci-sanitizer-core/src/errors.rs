//! errors.rs - Error types for the ci-sanitizer-core library.
//!
//! Every fatal condition of the sanitizer is reported through [`SanitizerError`],
//! and every variant names its cause (the limit that was exceeded, the rule that
//! failed, the path that could not be touched).
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// All error conditions raised by `ci-sanitizer-core`.
///
/// Marked `#[non_exhaustive]` so that new variants can be added without
/// breaking downstream `match` statements.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SanitizerError {
    #[error("content size exceeds limit: {size} > {limit}")]
    ContentTooLarge { size: usize, limit: i64 },

    #[error("failed to compile redaction rule '{rule_id}': {source}")]
    RuleCompilation {
        rule_id: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule_id}': pattern length ({length}) exceeds maximum allowed ({max})")]
    PatternLengthExceeded {
        rule_id: String,
        length: usize,
        max: usize,
    },

    #[error("rule validation failed:\n{0}")]
    InvalidRules(String),

    #[error("failed to initialize audit log in {}: {source}", dir.display())]
    AuditSetup {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write audit entry: {0}")]
    AuditWrite(#[from] std::io::Error),

    #[error("failed to serialize audit entry: {0}")]
    AuditSerialize(#[from] serde_json::Error),

    #[error("failed to clean up audit log {}: {source}", path.display())]
    AuditCleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("contents and sources length mismatch: {contents} vs {sources}")]
    BatchLengthMismatch { contents: usize, sources: usize },

    #[error("failed to sanitize content {index}: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<SanitizerError>,
    },
}

impl SanitizerError {
    /// The ID of the rule responsible for this error, if a rule is to blame.
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Self::RuleCompilation { rule_id, .. } | Self::PatternLengthExceeded { rule_id, .. } => {
                Some(rule_id)
            }
            Self::BatchItem { source, .. } => source.rule_id(),
            _ => None,
        }
    }
}

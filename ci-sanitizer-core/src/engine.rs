// ci-sanitizer-core/src/engine.rs
//! Defines the `SanitizationEngine` trait.
//!
//! Collaborators that forward CI artifacts downstream (log aggregators, report
//! uploaders, analysis tools) depend on this trait rather than on a concrete
//! sanitizer, so tests can substitute their own engine.
//!
//! License: MIT OR APACHE 2.0

use crate::config::SanitizerConfig;
use crate::errors::SanitizerError;
use crate::result::SanitizeResult;
use crate::sanitizers::compiler::CompiledRules;

pub trait SanitizationEngine: Send + Sync {
    /// Redacts secrets from `content`.
    ///
    /// Any error means the content must not be forwarded: no partially
    /// sanitized output is ever returned.
    ///
    /// # Arguments
    /// * `content` - The text to sanitize.
    /// * `source` - A label for where the content came from (file path, job name).
    fn sanitize_text(&self, content: &str, source: &str) -> Result<SanitizeResult, SanitizerError>;

    /// Sanitizes several inputs sharing one timestamp.
    ///
    /// `contents` and `sources` must have the same length. The first failing
    /// item aborts the whole batch.
    fn sanitize_batch(
        &self,
        contents: &[&str],
        sources: &[&str],
    ) -> Result<Vec<SanitizeResult>, SanitizerError>;

    /// Applies the audit retention policy. Blocking file-system I/O.
    fn cleanup_audit_logs(&self) -> Result<(), SanitizerError>;

    /// The rule set applied by this engine, in application order.
    fn compiled_rules(&self) -> &CompiledRules;

    fn config(&self) -> &SanitizerConfig;
}

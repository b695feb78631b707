//! compiler.rs - Lazy compilation of redaction rules.
//!
//! A [`CompiledRules`] set is built once per sanitizer and shared read-only
//! between threads. Each rule's pattern is compiled the first time the rule is
//! applied; the outcome is memoized, so a malformed pattern fails the same way
//! on every call and a valid one is never compiled twice.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};

use crate::errors::SanitizerError;
use crate::rules::SanitizationRule;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Upper bound for the size of a single compiled automaton.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Memoized compile failure. `regex::Error` is `Clone`, so it can be handed
/// out again on every later use of the rule.
#[derive(Debug, Clone)]
enum CompileFailure {
    Regex(regex::Error),
    TooLong(usize),
}

/// A rule paired with its lazily compiled matcher.
#[derive(Debug)]
pub struct CompiledRule {
    pub rule: SanitizationRule,
    regex: OnceCell<Result<Regex, CompileFailure>>,
}

impl CompiledRule {
    pub fn new(rule: SanitizationRule) -> Self {
        Self { rule, regex: OnceCell::new() }
    }

    pub fn id(&self) -> &str {
        &self.rule.id
    }

    pub fn is_enabled(&self) -> bool {
        self.rule.enabled
    }

    /// Returns the compiled pattern, compiling it on first use.
    pub fn regex(&self) -> Result<&Regex, SanitizerError> {
        let compiled = self.regex.get_or_init(|| {
            let pattern = &self.rule.pattern;
            if pattern.len() > MAX_PATTERN_LENGTH {
                return Err(CompileFailure::TooLong(pattern.len()));
            }

            RegexBuilder::new(pattern)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .map(|regex| {
                    debug!(
                        target: "ci_sanitizer_core::sanitizer",
                        "Rule '{}' compiled successfully.",
                        self.rule.id
                    );
                    regex
                })
                .map_err(|e| {
                    warn!("Rule '{}' failed to compile: {}", self.rule.id, e);
                    CompileFailure::Regex(e)
                })
        });

        match compiled {
            Ok(regex) => Ok(regex),
            Err(CompileFailure::Regex(e)) => Err(SanitizerError::RuleCompilation {
                rule_id: self.rule.id.clone(),
                source: e.clone(),
            }),
            Err(CompileFailure::TooLong(length)) => Err(SanitizerError::PatternLengthExceeded {
                rule_id: self.rule.id.clone(),
                length: *length,
                max: MAX_PATTERN_LENGTH,
            }),
        }
    }
}

/// The ordered, immutable set of rules a sanitizer applies.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

impl CompiledRules {
    /// Enabled rules in application order.
    pub fn enabled(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter().filter(|r| r.is_enabled())
    }

    pub fn get(&self, id: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Wraps rules for lazy compilation, preserving their order.
pub fn compile_rules(rules: Vec<SanitizationRule>) -> CompiledRules {
    debug!("Preparing {} rules for lazy compilation.", rules.len());
    CompiledRules {
        rules: rules.into_iter().map(CompiledRule::new).collect(),
    }
}

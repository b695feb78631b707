//! The built-in redaction rule catalog.
//!
//! Rules are listed in application order: the engine runs them top to bottom
//! and each rule sees the output of the ones above it. Specific token shapes
//! (GitHub, OpenShift, JWT) therefore come before the generic key/value rules,
//! which in turn never match a value starting with `[` so that placeholders
//! left by earlier rules survive untouched.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::errors::SanitizerError;

/// Classification tag carried by each rule. Used for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Token,
    Password,
    Key,
    Pii,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Password => "password",
            Self::Key => "key",
            Self::Pii => "pii",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single redaction directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationRule {
    /// Stable identifier, reported in `rules_applied` and in errors.
    pub id: String,
    /// Regular expression to search for.
    pub pattern: String,
    /// Replacement template; `${1}` refers to the first capture group.
    pub replacement: String,
    pub category: RuleCategory,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SanitizationRule {
    fn builtin(id: &str, pattern: &str, replacement: &str, category: RuleCategory) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            category,
            enabled: true,
        }
    }

    fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Returns the built-in catalog in application order.
pub fn default_rules() -> Vec<SanitizationRule> {
    use RuleCategory::*;

    vec![
        // Authentication tokens
        SanitizationRule::builtin(
            "aws-access-key",
            r"AKIA[0-9A-Z]{16}",
            "[AWS-ACCESS-KEY-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "aws-secret-key",
            r#"(?i)(aws_secret_access_key|secret_key)["\s]*[:=]["\s]*[A-Za-z0-9/+=]{40}"#,
            "${1}=[AWS-SECRET-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "github-token",
            r"ghp_[A-Za-z0-9]{34,40}",
            "[GITHUB-TOKEN-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "jwt-token",
            r"eyJ[A-Za-z0-9_-]*\.eyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]*",
            "[JWT-TOKEN-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "bearer-token",
            r"(?i)(authorization:\s*bearer\s+)[A-Za-z0-9_\-\.]{10,}",
            "${1}[TOKEN-REDACTED]",
            Token,
        ),
        // Database and API credentials
        SanitizationRule::builtin(
            "api-key",
            r#"(?i)(api[_-]?key|apikey)["\s]*[:=]["\s]*[A-Za-z0-9_\-]{20,}"#,
            "${1}=[API-KEY-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "db-password",
            r#"(?i)(password|pwd)["\s]*[:=]["\s]*[^\s"';\[][^\s"';]{7,}"#,
            "${1}=[PASSWORD-REDACTED]",
            Password,
        ),
        SanitizationRule::builtin(
            "connection-string",
            r"(?i)(mongodb|mysql|postgresql|postgres)://[^:\s\[][^:\s]*:[^@\s]+@",
            "${1}://[USER]:[PASSWORD-REDACTED]@",
            Password,
        ),
        // OpenShift / Kubernetes
        SanitizationRule::builtin(
            "openshift-token",
            r"sha256~[A-Za-z0-9_\-]{43}",
            "[OPENSHIFT-TOKEN-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "k8s-secret",
            r"(?i)(secret|token):\s*[A-Za-z0-9+/=]{20,}",
            "${1}: [SECRET-REDACTED]",
            Token,
        ),
        // Cryptographic material
        SanitizationRule::builtin(
            "private-key",
            r"-----BEGIN[A-Z\s]*PRIVATE KEY-----[\s\S]*?-----END[A-Z\s]*PRIVATE KEY-----",
            "[PRIVATE-KEY-REDACTED]",
            Key,
        ),
        SanitizationRule::builtin(
            "docker-auth",
            r#"(?i)(docker[_-]?auth|dockercfg)["\s]*[:=]["\s]*[A-Za-z0-9+/=]{20,}"#,
            "${1}=[DOCKER-AUTH-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "generic-token",
            r#"(?i)(token|access[_-]?token)["\s]*[:=]["\s]*[A-Za-z0-9_\-\.]{32,}"#,
            "${1}=[TOKEN-REDACTED]",
            Token,
        ),
        // Chat-ops and cloud vendors
        SanitizationRule::builtin(
            "slack-token",
            r"xox[baprs]-[0-9]+-[0-9]+-[A-Za-z0-9]+",
            "[SLACK-TOKEN-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "azure-key",
            r#"(?i)(azure[_-]?key|subscription[_-]?key)["\s]*[:=]["\s]*[A-Za-z0-9+/=]{40,}"#,
            "${1}=[AZURE-KEY-REDACTED]",
            Token,
        ),
        SanitizationRule::builtin(
            "gcp-key",
            r#"(?i)(gcp[_-]?key|google[_-]?key)["\s]*[:=]["\s]*[A-Za-z0-9+/=]{40,}"#,
            "${1}=[GCP-KEY-REDACTED]",
            Token,
        ),
        // PII. Off by default: CI logs are full of commit author addresses.
        SanitizationRule::builtin(
            "email-address",
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            "[EMAIL-REDACTED]",
            Pii,
        )
        .disabled(),
    ]
}

// `$$` is a literal dollar; `$name` takes the longest run of word characters.
static GROUP_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\$|\{([^}]*)\}|([0-9A-Za-z_]+))").expect("static group reference pattern")
});

fn declares_named_group(pattern: &str, name: &str) -> bool {
    pattern.contains(&format!("(?P<{}>", name)) || pattern.contains(&format!("(?<{}>", name))
}

/// Counts the capture groups a pattern declares, ignoring escaped parens,
/// parens inside character classes and non-capturing `(?...)` groups.
fn count_capture_groups(pattern: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    let mut in_class = false;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                if chars.peek() == Some(&'?') {
                    let rest: String = chars.clone().skip(1).take(2).collect();
                    if rest.starts_with("P<") || (rest.starts_with('<') && !rest.starts_with("<=") && !rest.starts_with("<!")) {
                        count += 1;
                    }
                } else {
                    count += 1;
                }
            }
            _ => {}
        }
    }
    count
}

/// Validates rule integrity: non-empty unique IDs, non-empty patterns and
/// replacement templates that only reference existing capture groups.
///
/// Whether a pattern compiles is not checked here; that happens the first
/// time the rule is applied.
pub fn validate_rules(rules: &[SanitizationRule]) -> Result<(), SanitizerError> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.id.is_empty() {
            errors.push("A rule has an empty `id` field.".to_string());
        } else if !seen.insert(rule.id.as_str()) {
            errors.push(format!("Duplicate rule id found: '{}'.", rule.id));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.id));
            continue;
        }

        let group_count = count_capture_groups(&rule.pattern);
        for cap in GROUP_REFERENCE.captures_iter(&rule.replacement) {
            let Some(name) = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str()) else {
                continue;
            };
            let exists = match name.parse::<usize>() {
                Ok(group) => group <= group_count,
                Err(_) => declares_named_group(&rule.pattern, name),
            };
            if !exists {
                errors.push(format!(
                    "Rule '{}': replacement references non-existent capture group '{}'.",
                    rule.id,
                    &cap[0]
                ));
            }
        }
    }

    if errors.is_empty() {
        debug!("Validated {} rules.", rules.len());
        Ok(())
    } else {
        Err(SanitizerError::InvalidRules(errors.join("\n")))
    }
}

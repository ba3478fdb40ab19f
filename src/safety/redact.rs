//! Secrets redaction for captured process output before it is logged,
//! persisted or shown to an approver.

use regex::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Placeholder for redacted content. Must not match any pattern below.
pub const REDACTED: &str = "[REDACTED]";

/// Maximum compiled regex size to mitigate ReDoS (catastrophic backtracking).
const REGEX_SIZE_LIMIT: usize = 1 << 20; // 1 MB

/// Text a credential value must not swallow: a private key header, which the
/// PEM pass removes as a whole block, and an earlier placeholder.
const VALUE_STOP_MARKERS: &[&str] = &["-----BEGIN", REDACTED];

struct SecretPattern {
    name: &'static str,
    regex: Regex,
}

/// Compile with a size limit. A pattern that fails to compile is skipped.
fn compile_pattern(name: &'static str, pattern: &str) -> Option<SecretPattern> {
    match RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => Some(SecretPattern { name, regex }),
        Err(e) => {
            tracing::warn!(pattern = name, error = %e, "Secret pattern failed to compile, skipping");
            None
        }
    }
}

// Applied in this order; each pass sees the output of the previous one.
static SECRET_PATTERNS: LazyLock<Vec<SecretPattern>> = LazyLock::new(|| {
    [
        // key=value / key: value where the key names a credential, on one line.
        // Key words are joined by single dashes so a PEM `-----END` marker
        // is never taken as part of a key.
        compile_pattern(
            "credential_assignment",
            r#"(?i)(?:[a-z0-9_]+-)*[a-z0-9_]*(?:api[_\-]?key|secret|token|password|passwd|auth)[a-z0-9_\-]*["']?[ \t]*[=:][ \t]*["']?(?P<value>[^\s"',;]+)["']?"#,
        ),
        // Cloud access key identifiers
        compile_pattern("access_key_id", r"\b(?:AKIA|ASIA)[A-Z0-9]{16}\b"),
        // PEM private key blocks, spanning lines
        compile_pattern(
            "private_key",
            r"-----BEGIN [A-Z ]*PRIVATE KEY-----[\s\S]*?-----END [A-Z ]*PRIVATE KEY-----",
        ),
        // Database and cache connection strings
        compile_pattern(
            "connection_uri",
            r#"(?i)\b(?:postgres(?:ql)?|mysql|mariadb|mongodb(?:\+srv)?|redis|rediss|amqps?)://[^\s"'<>]+"#,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// Replace every secret-shaped substring of `text` with [`REDACTED`].
///
/// Returns the input borrowed when nothing matched. Idempotent.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(text);

    for pattern in SECRET_PATTERNS.iter() {
        if !pattern.regex.is_match(&result) {
            continue;
        }
        let replaced = pattern.regex.replace_all(&result, redact_match).into_owned();
        if replaced != *result {
            tracing::trace!(pattern = pattern.name, "Redacting output");
            result = Cow::Owned(replaced);
        }
    }

    result
}

/// Replacement for one match.
///
/// A match with a `value` group is cut short at the first stop marker in the
/// value: the part before the marker is redacted and the marker onward is
/// kept for later passes. A value that starts with a marker is left as is.
fn redact_match(caps: &Captures<'_>) -> String {
    let (Some(whole), Some(value)) = (caps.get(0), caps.name("value")) else {
        return REDACTED.to_string();
    };

    let stop = VALUE_STOP_MARKERS
        .iter()
        .filter_map(|marker| value.as_str().find(*marker))
        .min();

    match stop {
        None => REDACTED.to_string(),
        Some(0) => whole.as_str().to_string(),
        Some(offset) => {
            let keep_from = value.start() + offset - whole.start();
            format!("{}{}", REDACTED, &whole.as_str()[keep_from..])
        }
    }
}

/// Redact secrets from a JSON value (recursively).
///
/// String values under sensitive keys are replaced outright; every other
/// string is passed through [`sanitize`].
pub fn sanitize_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::String(s) => {
            if let Cow::Owned(redacted) = sanitize(s) {
                *s = redacted;
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr {
                sanitize_json(item);
            }
        }
        serde_json::Value::Object(obj) => {
            for (key, val) in obj.iter_mut() {
                if is_sensitive_key(key) && val.is_string() {
                    *val = serde_json::Value::String(REDACTED.to_string());
                } else {
                    sanitize_json(val);
                }
            }
        }
        _ => {}
    }
}

/// Check if a key name suggests sensitive data
fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    let sensitive_patterns = [
        "password",
        "passwd",
        "secret",
        "token",
        "api_key",
        "apikey",
        "auth",
        "credential",
        "private_key",
    ];

    sensitive_patterns.iter().any(|p| key_lower.contains(p))
}

// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for log output and error messages.
//!
//! Two complementary mechanisms:
//! 1. **Pattern-based**: credential-bearing query parameters and JSON fields.
//! 2. **Exact-match**: secrets loaded from configuration at runtime.

use std::io::Write;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;

/// Parameter and field names whose values are always secret.
const SECRET_KEYS: &str = "access_token|suite_access_token|corpsecret|corp_secret|suite_secret|suite_ticket|permanent_code";

/// `key=value` in a query string.
static QUERY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?P<key>\b(?:{SECRET_KEYS}))=(?P<value>[^&\s#]+)"))
        .expect("query redaction pattern is valid")
});

/// `"key": "value"` in a JSON body.
static JSON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#""(?P<key>{SECRET_KEYS})"\s*:\s*"(?P<value>[^"]*)""#))
        .expect("json redaction pattern is valid")
});

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

/// Redact secrets from a string using the known patterns and exact values.
pub fn redact(input: &str, known_secrets: &[String]) -> String {
    let mut result = QUERY_PATTERN
        .replace_all(input, format!("$key={REDACTED}"))
        .into_owned();
    result = JSON_PATTERN
        .replace_all(&result, format!(r#""$key":"{REDACTED}""#))
        .into_owned();

    // Longest first so a secret that contains another is replaced whole.
    let mut sorted: Vec<&String> = known_secrets.iter().collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        if !value.is_empty() {
            result = result.replace(value.as_str(), REDACTED);
        }
    }

    result
}

/// Redact credential-bearing query parameters from a URL.
pub fn redact_url(url: &str) -> String {
    QUERY_PATTERN
        .replace_all(url, format!("$key={REDACTED}"))
        .into_owned()
}

/// A writer wrapper that redacts secrets from everything written through it.
///
/// Used as the tracing subscriber's writer so that no log line carries a
/// configured secret, even one a caller formatted by accident.
pub struct RedactingWriter<W> {
    inner: W,
    known_secrets: Arc<RwLock<Vec<String>>>,
}

impl<W: Write> RedactingWriter<W> {
    /// Create a new redacting writer.
    pub fn new(inner: W, known_secrets: Arc<RwLock<Vec<String>>>) -> Self {
        Self {
            inner,
            known_secrets,
        }
    }

    /// Add a secret to the shared redaction list.
    pub fn add_secret(known_secrets: &Arc<RwLock<Vec<String>>>, value: String) {
        if let Ok(mut values) = known_secrets.write()
            && !value.is_empty()
            && !values.contains(&value)
        {
            values.push(value);
        }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let secrets = self
            .known_secrets
            .read()
            .map(|v| v.clone())
            .unwrap_or_default();
        self.inner.write_all(redact(&input, &secrets).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

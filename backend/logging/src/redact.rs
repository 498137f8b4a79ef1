//! Log Redaction Layer
//!
//! Scrubs Google API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static GOOGLE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AIza[0-9A-Za-z\-_]{20,}").unwrap());
static KEY_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(x-goog-api-key[\x22']?\s*[:=]\s*[\x22']?)[^\s\x22',}]+").unwrap());
static KEY_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts API keys and tokens in a string.
pub fn redact_secrets(input: &str) -> String {
    let redacted = KEY_HEADER_RE.replace_all(input, "${1}[REDACTED_KEY]");
    let redacted = KEY_PARAM_RE.replace_all(&redacted, "${1}[REDACTED_KEY]");
    let redacted = GOOGLE_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]").into_owned()
}

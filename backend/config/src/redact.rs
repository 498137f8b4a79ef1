//! Config redaction: produce safe-to-print config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::RelayConfig;

/// Keys whose string values are always secrets.
static SENSITIVE_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "accessToken",
    "access_token",
    "token",
    "secret",
    "password",
    "privateKey",
    "private_key",
];

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn mask(s: &str) -> String {
    // Keep a short prefix as a hint of which key is in use.
    let prefix: String = s.chars().take(4).collect();
    if s.chars().count() > 8 {
        format!("{prefix}***")
    } else {
        "***".to_string()
    }
}

/// Redact a JSON value tree, masking every string under a sensitive key.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if !s.is_empty() && is_sensitive_key(key) => Value::String(mask(s)),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Serialize and redact a loaded config.
pub fn redact_config(config: &RelayConfig) -> Value {
    match serde_json::to_value(config) {
        Ok(value) => redact(&value),
        Err(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_nested_api_key() {
        let v = json!({ "settings": { "GoogleAI": { "ApiKey": "AIzaSyA-very-secret-value" } } });
        let redacted = redact(&v);
        let key = redacted["settings"]["GoogleAI"]["ApiKey"].as_str().unwrap();
        assert_eq!(key, "AIza***");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let redacted = redact(&json!({ "password": "hunter2" }));
        assert_eq!(redacted["password"], "***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "gemini": { "model": "gemini-1.5-flash", "apiKeyEnv": "GEMINI_API_KEY" } });
        assert_eq!(redact(&v), v);
    }

    #[test]
    fn redacts_whole_config() {
        let mut cfg = RelayConfig::default();
        cfg.settings = json!({ "GoogleAI": { "apiKey": "AIzaSyB-1234567890" } })
            .as_object()
            .cloned()
            .unwrap();
        let redacted = redact_config(&cfg);
        assert_eq!(redacted["settings"]["GoogleAI"]["apiKey"], "AIza***");
        assert_eq!(redacted["server"]["port"], 7158);
    }
}

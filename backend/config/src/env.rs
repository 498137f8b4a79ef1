//! Environment variable substitution and overrides for config values.
//!
//! Supports `${VAR_NAME}` syntax in string values, resolved at load time.
//! Only uppercase `[A-Z_][A-Z0-9_]*` variable names are matched.
//! `$${VAR}` escapes to a literal `${VAR}`.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::schema::RelayConfig;
use crate::sources::ConfigProvider;

/// Matches `${VAR}` and, with a leading `$`, its escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references throughout a config value tree.
///
/// Only string leaves are processed. Fails if a referenced variable is unset
/// or empty.
pub fn resolve_env_vars(value: &Value, env: &dyn ConfigProvider) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &dyn ConfigProvider, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &dyn ConfigProvider, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val,
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply `OCRELAY_*` environment overrides on top of the file config.
pub fn apply_env_overrides(mut config: RelayConfig, env: &dyn ConfigProvider) -> RelayConfig {
    if let Some(bind) = env.get("OCRELAY_BIND").filter(|v| !v.trim().is_empty()) {
        debug!(bind = %bind, "Overriding server.bind from environment");
        config.server.bind = bind;
    }
    if let Some(port) = env.get("OCRELAY_PORT") {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "Ignoring non-numeric OCRELAY_PORT"),
        }
    }
    if let Some(model) = env.get("OCRELAY_MODEL").filter(|v| !v.trim().is_empty()) {
        config.gemini.model = model;
    }
    if let Some(level) = env.get("RUST_LOG").filter(|v| !v.trim().is_empty()) {
        config.logging.level = level;
    }
    config
}

//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::sources::ConfigProvider;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "ocrelay.yaml";

/// Resolve the ocrelay config directory.
/// Priority: `OCRELAY_CONFIG_DIR` > `~/.ocrelay/` > `./.ocrelay`
pub fn config_dir(env: &dyn ConfigProvider) -> PathBuf {
    if let Some(dir) = env.get("OCRELAY_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".ocrelay"),
        None => PathBuf::from(".ocrelay"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Pick the config file: explicit path, then `OCRELAY_CONFIG`, then the config dir.
pub fn locate_config(explicit: Option<&Path>, env: &dyn ConfigProvider) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = env.get("OCRELAY_CONFIG").filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }
    config_file_path(&config_dir(env))
}

/// Read the YAML config into a JSON value tree.
///
/// Returns an empty object if the file doesn't exist, so every field takes its default.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let yaml: serde_yaml::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    // An empty file parses as YAML null.
    let value = match serde_json::to_value(yaml)
        .with_context(|| format!("Config at {} is not JSON-compatible", path.display()))?
    {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

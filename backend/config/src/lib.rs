//! `ocrelay-config`: runtime configuration for the ocrelay gateway.
//!
//! Provides:
//! - Typed config schema with defaults for every field
//! - YAML loading from an explicit path, `OCRELAY_CONFIG`, or the config dir
//! - `${ENV_VAR}` substitution and `OCRELAY_*` overrides
//! - Ordered key-source chains (env first, config settings second)
//! - Validation and redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod sources;
pub mod validation;

pub use env::{apply_env_overrides, resolve_env_vars, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw_config, locate_config};
pub use redact::{redact, redact_config};
pub use schema::{ExtractionConfig, GeminiConfig, LoggingConfig, RelayConfig, ServerConfig};
pub use sources::{
    api_key_chain, ConfigProvider, EnvSource, KeyLookup, MapSource, SettingsSource, SourceChain,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, substitute env vars, apply overrides and validate a config file.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path, env: &dyn ConfigProvider) -> Result<RelayConfig> {
    let raw = load_raw_config(path).await?;

    let value = resolve_env_vars(&raw, env).context("Failed to resolve env vars in config")?;

    let config: RelayConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config at {}", path.display()))?;

    let config = apply_env_overrides(config, env);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!(
            "config at {} has {} error(s); first: {}",
            path.display(),
            report.errors.len(),
            report.errors[0]
        );
    }

    Ok(config)
}

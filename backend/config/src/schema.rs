//! ocrelay runtime configuration schema, typed for serde YAML/JSON.

use ocrelay_core::{LineItemField, UnknownField};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::defaults;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Free-form keyed settings, looked up with colon-separated paths
    /// such as `GoogleAI:ApiKey`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
}

/// Inbound HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "defaults::bind")]
    pub bind: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    #[serde(default = "defaults::max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Allowed browser origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            port: defaults::port(),
            max_upload_bytes: defaults::max_upload_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

/// Upstream generative-AI service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiConfig {
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    #[serde(default = "defaults::model")]
    pub model: String,

    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variable consulted first for the API key.
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,

    /// `settings` path consulted second for the API key.
    #[serde(default = "defaults::api_key_config_key")]
    pub api_key_config_key: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            model: defaults::model(),
            timeout_secs: defaults::timeout_secs(),
            api_key_env: defaults::api_key_env(),
            api_key_config_key: defaults::api_key_config_key(),
        }
    }
}

/// Post-processing of the model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionConfig {
    #[serde(default = "defaults::enabled")]
    pub forward_fill: bool,

    #[serde(default = "defaults::fill_fields")]
    pub fill_fields: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            forward_fill: defaults::enabled(),
            fill_fields: defaults::fill_fields(),
        }
    }
}

impl ExtractionConfig {
    /// Columns to forward-fill; empty when filling is disabled.
    pub fn resolved_fill_fields(&self) -> Result<Vec<LineItemField>, UnknownField> {
        if !self.forward_fill {
            return Ok(Vec::new());
        }
        self.fill_fields.iter().map(|name| name.parse()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Directory for rolling NDJSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Emit console logs as JSON.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            dir: None,
            json: false,
        }
    }
}

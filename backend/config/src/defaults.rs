//! Default values for every optional config field.

use ocrelay_core::DEFAULT_FILL_FIELDS;

pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Port the original browser client talks to.
pub const DEFAULT_PORT: u16 = 7158;

/// Upload limit (about 50 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50_000_000;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_API_KEY_CONFIG_KEY: &str = "GoogleAI:ApiKey";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub(crate) fn bind() -> String {
    DEFAULT_BIND.to_string()
}

pub(crate) fn port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

pub(crate) fn base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

pub(crate) fn model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

pub(crate) fn timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

pub(crate) fn api_key_config_key() -> String {
    DEFAULT_API_KEY_CONFIG_KEY.to_string()
}

pub(crate) fn fill_fields() -> Vec<String> {
    DEFAULT_FILL_FIELDS.iter().map(|f| f.name().to_string()).collect()
}

pub(crate) fn enabled() -> bool {
    true
}

pub(crate) fn log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

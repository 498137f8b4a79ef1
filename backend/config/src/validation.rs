//! Config validation with user-friendly error messages.

use crate::schema::RelayConfig;
use ocrelay_core::LineItemField;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RelayConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_gemini(config, &mut report);
    validate_extraction(config, &mut report);
    report
}

fn validate_server(config: &RelayConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.port == 0 {
        report.error("server.port", "port must be > 0");
    } else if server.port < 1024 && server.port != 80 && server.port != 443 {
        report.warn(
            "server.port",
            format!("Port {} requires elevated privileges; consider using a port >= 1024", server.port),
        );
    }
    if server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "maxUploadBytes must be > 0");
    }
    if server.bind.trim().is_empty() {
        report.error("server.bind", "bind address cannot be empty");
    }
}

fn validate_gemini(config: &RelayConfig, report: &mut ValidationReport) {
    let gemini = &config.gemini;
    if gemini.model.trim().is_empty() {
        report.error("gemini.model", "model cannot be empty");
    }
    if gemini.model.contains('/') || gemini.model.contains(':') {
        report.error("gemini.model", "model must be a bare model id such as 'gemini-1.5-flash'");
    }
    if !(gemini.base_url.starts_with("https://") || gemini.base_url.starts_with("http://")) {
        report.error("gemini.baseUrl", "baseUrl must start with http:// or https://");
    } else if gemini.base_url.starts_with("http://") {
        report.warn("gemini.baseUrl", "API key will be sent over plain HTTP");
    }
    if gemini.timeout_secs == 0 {
        report.error("gemini.timeoutSecs", "timeoutSecs must be > 0");
    }
    if gemini.api_key_env.trim().is_empty() && gemini.api_key_config_key.trim().is_empty() {
        report.warn("gemini", "No API key source configured; every request will fail");
    }
}

fn validate_extraction(config: &RelayConfig, report: &mut ValidationReport) {
    let extraction = &config.extraction;
    for (i, name) in extraction.fill_fields.iter().enumerate() {
        if name.parse::<LineItemField>().is_err() {
            report.error(
                format!("extraction.fillFields[{i}]"),
                format!("Unknown line item field '{name}'"),
            );
        }
    }
    if extraction.forward_fill && extraction.fill_fields.is_empty() {
        report.warn("extraction.fillFields", "forwardFill is enabled but no fields are listed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let report = validate(&RelayConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_port_and_timeout_are_errors() {
        let mut cfg = RelayConfig::default();
        cfg.server.port = 0;
        cfg.gemini.timeout_secs = 0;
        let report = validate(&cfg);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"server.port"));
        assert!(paths.contains(&"gemini.timeoutSecs"));
    }

    #[test]
    fn unknown_fill_field_is_error() {
        let mut cfg = RelayConfig::default();
        cfg.extraction.fill_fields.push("shade".into());
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert!(report.errors[0].message.contains("shade"));
    }

    #[test]
    fn plain_http_base_url_is_warning() {
        let mut cfg = RelayConfig::default();
        cfg.gemini.base_url = "http://localhost:9999".into();
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].path, "gemini.baseUrl");
    }
}

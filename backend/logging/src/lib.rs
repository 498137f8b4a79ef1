//! Structured logging for ocrelay.
//!
//! Console output, optional daily-rolling NDJSON files, and scrubbing of
//! API keys from any upstream text before it reaches a log line.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogGuard};
pub use redact::redact_secrets;

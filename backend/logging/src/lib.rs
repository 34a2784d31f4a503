//! Structured logging for Cyborg.
//!
//! Console output, optional rolling NDJSON file output, and scrubbing of
//! token-shaped strings before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LOG_FILE_NAME};
pub use redact::redact_sensitive_data;

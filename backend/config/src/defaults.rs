//! Default value application.
//!
//! Fills every unset or empty field so the rest of the program can read the
//! config without re-deciding fallbacks.

use crate::schema::{CyborgConfig, LoggingConfig, TransportKind};

pub const DEFAULT_COMMAND_PREFIX: &str = "//";
pub const DEFAULT_LOG_PREFIX: &str = "Medjed.Cyborg";
pub const DEFAULT_MODULE_DIRECTORY: &str = "./modules";
pub const DEFAULT_HANDLER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a loaded config.
pub fn apply_all_defaults(mut config: CyborgConfig) -> CyborgConfig {
    if config.command_prefix.as_deref().is_none_or(str::is_empty) {
        config.command_prefix = Some(DEFAULT_COMMAND_PREFIX.to_string());
    }
    if config.log_prefix.as_deref().is_none_or(str::is_empty) {
        config.log_prefix = Some(DEFAULT_LOG_PREFIX.to_string());
    }
    config.logging_enabled.get_or_insert(false);
    config
        .module_directory
        .get_or_insert_with(|| DEFAULT_MODULE_DIRECTORY.to_string());
    config
        .handler_timeout_secs
        .get_or_insert(DEFAULT_HANDLER_TIMEOUT_SECS);
    config.transport.get_or_insert(TransportKind::Discord);

    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.as_deref().is_none_or(str::is_empty) {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }

    config
}

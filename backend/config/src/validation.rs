//! Config validation: field checks with user-friendly error messages.

use crate::schema::{CyborgConfig, TransportKind};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
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
pub fn validate(config: &CyborgConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_auth(config, &mut report);
    validate_routing(config, &mut report);
    validate_modules(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_auth(config: &CyborgConfig, report: &mut ValidationReport) {
    let token_missing = config
        .auth_token
        .as_deref()
        .map(str::trim)
        .is_none_or(str::is_empty);
    if config.transport() == TransportKind::Discord && token_missing {
        report.error("authToken", "A bot token is required for the discord transport");
    }
    if config.authorized_sender_id == 0 {
        report.warn(
            "authorizedSenderId",
            "No authorized sender configured; every command will be ignored",
        );
    }
}

fn validate_routing(config: &CyborgConfig, report: &mut ValidationReport) {
    if config.command_prefix().chars().any(char::is_whitespace) {
        report.warn(
            "commandPrefix",
            "Prefix contains whitespace; commands must repeat it exactly",
        );
    }
    if config.handler_timeout_secs == Some(0) {
        report.error("handlerTimeoutSecs", "handlerTimeoutSecs must be >= 1");
    }
}

fn validate_modules(config: &CyborgConfig, report: &mut ValidationReport) {
    if config
        .module_directory
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        report.error("moduleDirectory", "moduleDirectory cannot be empty");
    }
}

fn validate_logging(config: &CyborgConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        let bare = !level.contains('=') && !level.contains(',');
        if bare && !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error" | "off") {
            report.warn(
                "logging.level",
                format!("Unknown log level '{level}'. Use trace, debug, info, warn, error or off"),
            );
        }
    }
    if logging.dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        report.error("logging.dir", "logging.dir cannot be empty; omit it to disable file logs");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LoggingConfig;

    fn console() -> CyborgConfig {
        CyborgConfig {
            authorized_sender_id: 7,
            transport: Some(TransportKind::Console),
            ..Default::default()
        }
    }

    #[test]
    fn console_config_is_valid() {
        let report = validate(&console());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn discord_requires_token() {
        let mut cfg = console();
        cfg.transport = None;
        let report = validate(&cfg);
        assert_eq!(report.errors[0].path, "authToken");

        cfg.auth_token = Some("   ".into());
        assert!(!validate(&cfg).is_valid());
        cfg.auth_token = Some("abc".into());
        assert!(validate(&cfg).is_valid());
    }

    #[test]
    fn zero_timeout_and_empty_module_dir_are_errors() {
        let mut cfg = console();
        cfg.handler_timeout_secs = Some(0);
        cfg.module_directory = Some(" ".into());
        let paths: Vec<String> = validate(&cfg).errors.into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["handlerTimeoutSecs", "moduleDirectory"]);
    }

    #[test]
    fn warnings_do_not_invalidate() {
        let mut cfg = console();
        cfg.authorized_sender_id = 0;
        cfg.command_prefix = Some("! ".into());
        cfg.logging = Some(LoggingConfig {
            level: Some("loud".into()),
            dir: None,
        });
        let report = validate(&cfg);
        assert!(report.is_valid());
        let paths: Vec<&str> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["authorizedSenderId", "commandPrefix", "logging.level"]);
    }

    #[test]
    fn filter_directives_are_not_flagged() {
        let mut cfg = console();
        cfg.logging = Some(LoggingConfig {
            level: Some("info,cyborg_commands=debug".into()),
            dir: None,
        });
        assert!(validate(&cfg).warnings.is_empty());
    }
}

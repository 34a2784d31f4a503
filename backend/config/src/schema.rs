//! Cyborg runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every optional field is filled
//! in by [`crate::defaults::apply_all_defaults`]; the accessors below read the
//! effective value.

use serde::{Deserialize, Deserializer, Serialize};

use crate::defaults::{
    DEFAULT_COMMAND_PREFIX, DEFAULT_HANDLER_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_LOG_PREFIX,
    DEFAULT_MODULE_DIRECTORY,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CyborgConfig {
    /// Bot token for the chat transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// The only sender whose messages are treated as commands.
    #[serde(default, deserialize_with = "u64_or_string")]
    pub authorized_sender_id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_prefix: Option<String>,

    /// Directory scanned for handler bundle manifests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_directory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Discord,
    Console,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discord => f.write_str("discord"),
            Self::Console => f.write_str("console"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `cyborg_commands=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling JSON log file. No file log when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Effective values
// ---------------------------------------------------------------------------

impl CyborgConfig {
    pub fn command_prefix(&self) -> &str {
        self.command_prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_COMMAND_PREFIX)
    }

    pub fn log_prefix(&self) -> &str {
        self.log_prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_LOG_PREFIX)
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled.unwrap_or(false)
    }

    pub fn module_directory(&self) -> &str {
        self.module_directory
            .as_deref()
            .unwrap_or(DEFAULT_MODULE_DIRECTORY)
    }

    pub fn handler_timeout_secs(&self) -> u64 {
        self.handler_timeout_secs
            .unwrap_or(DEFAULT_HANDLER_TIMEOUT_SECS)
    }

    pub fn transport(&self) -> TransportKind {
        self.transport.unwrap_or_default()
    }

    /// The log filter in effect. With `loggingEnabled: false` only warnings
    /// and errors are emitted.
    pub fn log_level(&self) -> &str {
        if !self.logging_enabled() {
            return "warn";
        }
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }
}

/// Accept the sender id as a YAML integer or as a string, which is what a
/// `${VAR}` reference becomes after substitution.
fn u64_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let raw = r#"
authToken: abc
authorizedSenderId: 123456789012345678
commandPrefix: "!"
loggingEnabled: true
moduleDirectory: ./mods
handlerTimeoutSecs: 5
transport: console
logging:
  level: debug
  dir: ./logs
"#;
        let cfg: CyborgConfig = serde_yaml::from_str(raw).unwrap();
        assert_eq!(cfg.authorized_sender_id, 123456789012345678);
        assert_eq!(cfg.command_prefix(), "!");
        assert_eq!(cfg.transport(), TransportKind::Console);
        assert_eq!(cfg.handler_timeout_secs(), 5);
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_dir(), Some("./logs"));
    }

    #[test]
    fn sender_id_may_be_a_string() {
        let cfg: CyborgConfig = serde_json::from_value(serde_json::json!({
            "authorizedSenderId": "42"
        }))
        .unwrap();
        assert_eq!(cfg.authorized_sender_id, 42);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_yaml::from_str::<CyborgConfig>("comandPrefix: x").unwrap_err();
        assert!(err.to_string().contains("comandPrefix"));
    }

    #[test]
    fn empty_prefixes_fall_back() {
        let cfg = CyborgConfig {
            command_prefix: Some(String::new()),
            log_prefix: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(cfg.command_prefix(), "//");
        assert_eq!(cfg.log_prefix(), "Medjed.Cyborg");
    }

    #[test]
    fn disabled_logging_means_warn() {
        let cfg = CyborgConfig {
            logging_enabled: Some(false),
            logging: Some(LoggingConfig {
                level: Some("trace".into()),
                dir: None,
            }),
            ..Default::default()
        };
        assert_eq!(cfg.log_level(), "warn");
    }
}

//! `cyborg-config`: runtime configuration for the Cyborg command router.
//!
//! Provides:
//! - Typed config schema
//! - YAML read/write
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings
//! - Redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{
    anchor_paths, config_base_dir, load_config, load_raw, resolve_config_path, write_config,
    CONFIG_ENV_VAR, CONFIG_FILE_NAME,
};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{CyborgConfig, LoggingConfig, TransportKind};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, substitute env vars, apply defaults and validate.
///
/// Warnings are logged. Validation errors abort with every error listed.
pub async fn load_and_prepare(path: &Path) -> Result<CyborgConfig> {
    let config = load_resolved(path).await?;
    check(&config)?;
    Ok(config)
}

/// Load a config file, substitute env vars and apply defaults, without
/// validating. Relative directories are resolved against the file's
/// directory.
pub async fn load_resolved(path: &Path) -> Result<CyborgConfig> {
    let raw = load_raw(path).await?;
    let resolved = resolve_env_vars(&raw).context("Failed to resolve env vars in config")?;
    Ok(anchor_paths(finish(resolved)?, config_base_dir(path)))
}

/// [`load_resolved`] with an explicit variable map instead of the process
/// environment.
pub async fn load_resolved_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<CyborgConfig> {
    let raw = load_raw(path).await?;
    let resolved = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;
    Ok(anchor_paths(finish(resolved)?, config_base_dir(path)))
}

/// [`load_and_prepare`] over an in-memory value and variable map.
pub fn prepare_with(raw: &Value, env: &HashMap<String, String>) -> Result<CyborgConfig> {
    let resolved = resolve_env_vars_with(raw, env).context("Failed to resolve env vars in config")?;
    let config = finish(resolved)?;
    check(&config)?;
    Ok(config)
}

fn finish(resolved: Value) -> Result<CyborgConfig> {
    let config: CyborgConfig =
        serde_json::from_value(resolved).context("Failed to deserialize config")?;
    Ok(apply_all_defaults(config))
}

/// Validate, log warnings, and fail if there are errors.
pub fn check(config: &CyborgConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

/// The config as a redacted JSON value, safe to print or log.
pub fn redacted(config: &CyborgConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn full_pipeline() {
        let raw = json!({
            "authToken": "${DISCORD_TOKEN}",
            "authorizedSenderId": "${OPERATOR_ID}",
            "commandPrefix": ""
        });
        let cfg = prepare_with(
            &raw,
            &env(&[("DISCORD_TOKEN", "tok-1234567890abc"), ("OPERATOR_ID", "1000")]),
        )
        .unwrap();
        assert_eq!(cfg.auth_token.as_deref(), Some("tok-1234567890abc"));
        assert_eq!(cfg.authorized_sender_id, 1000);
        assert_eq!(cfg.command_prefix(), "//");
        assert_eq!(cfg.handler_timeout_secs(), 30);

        let shown = redacted(&cfg).unwrap();
        assert_eq!(shown["authToken"], "tok-***");
        assert_eq!(shown["authorizedSenderId"], 1000);
    }

    #[test]
    fn validation_errors_abort() {
        let raw = json!({ "transport": "discord", "handlerTimeoutSecs": 0 });
        let err = prepare_with(&raw, &env(&[])).unwrap_err().to_string();
        assert!(err.contains("authToken"));
        assert!(err.contains("handlerTimeoutSecs"));
    }

    #[test]
    fn missing_env_var_aborts() {
        let raw = json!({ "authToken": "${UNSET_TOKEN}" });
        let err = prepare_with(&raw, &env(&[])).unwrap_err();
        assert!(format!("{err:#}").contains("UNSET_TOKEN"));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cyborg.yaml");
        tokio::fs::write(&path, "transport: console\nauthorizedSenderId: 5\n")
            .await
            .unwrap();
        let cfg = load_and_prepare(&path).await.unwrap();
        assert_eq!(cfg.transport(), TransportKind::Console);
        assert_eq!(cfg.authorized_sender_id, 5);
    }

    #[tokio::test]
    async fn load_resolved_skips_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cyborg.yaml");
        tokio::fs::write(&path, "handlerTimeoutSecs: 0\n").await.unwrap();
        let cfg = load_resolved(&path).await.unwrap();
        assert_eq!(cfg.handler_timeout_secs, Some(0));
        assert!(check(&cfg).is_err());
        assert!(load_and_prepare(&path).await.is_err());
    }

    #[tokio::test]
    async fn module_directory_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cyborg.yaml");
        tokio::fs::write(&path, "moduleDirectory: ./mods\nauthToken: ${TOKEN}\n")
            .await
            .unwrap();
        let cfg = load_resolved_with(&path, &env(&[("TOKEN", "t")])).await.unwrap();
        assert_eq!(
            cfg.module_directory(),
            dir.path().join("mods").display().to_string()
        );
    }
}

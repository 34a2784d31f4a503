//! Config file location, reading and writing.

use crate::schema::CyborgConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "cyborg.yaml";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "CYBORG_CONFIG";

/// Resolve the config file path.
/// Priority: explicit path > `CYBORG_CONFIG` > `./cyborg.yaml` if present >
/// `<user config dir>/cyborg/cyborg.yaml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    match dirs::config_dir() {
        Some(dir) => dir.join("cyborg").join(CONFIG_FILE_NAME),
        None => local,
    }
}

/// Read the config as an untyped value tree, before env substitution.
///
/// A missing or empty file yields an empty object, so every field takes its
/// default.
pub async fn load_raw(path: &Path) -> Result<Value> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;
    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// Directory that relative paths inside the config file are resolved against.
pub fn config_base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

/// Rebase a relative `moduleDirectory` and `logging.dir` onto `base`.
/// Absolute and empty values are left alone.
pub fn anchor_paths(mut config: CyborgConfig, base: &Path) -> CyborgConfig {
    let anchor = |dir: String| -> String {
        let rel = Path::new(&dir);
        if dir.is_empty() || rel.is_absolute() {
            return dir;
        }
        base.join(rel.strip_prefix(".").unwrap_or(rel))
            .display()
            .to_string()
    };
    config.module_directory = config.module_directory.take().map(&anchor);
    if let Some(logging) = config.logging.as_mut() {
        logging.dir = logging.dir.take().map(&anchor);
    }
    config
}

/// Load and deserialize the config without env substitution or defaults.
pub async fn load_config(path: &Path) -> Result<CyborgConfig> {
    let value = load_raw(path).await?;
    serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))
}

/// Write config to disk atomically (temp file, then rename).
pub async fn write_config(config: &CyborgConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp config to: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

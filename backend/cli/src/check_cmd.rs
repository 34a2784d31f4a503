//! `cyborg check-config`: validate the config and show it redacted.

use std::path::Path;

use anyhow::{bail, Context, Result};
use cyborg_config::{collect_redacted_paths, collect_referenced_vars, load_raw, validate};

use crate::terminal_output::{note_error, note_info, note_success, note_warn};

pub async fn run(config_path: &Path) -> Result<()> {
    note_info(&format!("Checking {}", config_path.display()));
    if !tokio::fs::try_exists(config_path).await.unwrap_or(false) {
        note_warn("Config file does not exist; showing defaults");
    }

    let raw = load_raw(config_path).await?;
    let mut unset = 0;
    for var in collect_referenced_vars(&raw) {
        if std::env::var(&var).map(|v| v.is_empty()).unwrap_or(true) {
            note_error(&format!("${{{var}}} is referenced but not set"));
            unset += 1;
        }
    }
    if unset > 0 {
        bail!("{unset} environment variable(s) missing");
    }

    let config = cyborg_config::load_resolved(config_path).await?;
    let report = validate(&config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }

    let shown = cyborg_config::redacted(&config)?;
    let masked = collect_redacted_paths(&serde_json::to_value(&config)?);
    if !masked.is_empty() {
        note_info(&format!("Masked: {}", masked.join(", ")));
    }
    println!(
        "{}",
        serde_yaml::to_string(&shown).context("Failed to render config")?
    );

    if !report.is_valid() {
        bail!("config has {} error(s)", report.errors.len());
    }
    note_success("Config is valid");
    Ok(())
}

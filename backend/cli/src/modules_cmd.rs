//! `cyborg modules`: load every module once and list what it exports.

use std::path::Path;

use anyhow::{bail, Result};
use cyborg_commands::ModuleRegistry;

use crate::terminal_output::{note_error, note_info, render_table, Column};
use crate::wiring;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = cyborg_config::load_resolved(config_path).await?;
    note_info(&format!("Module directory: {}", config.module_directory()));

    let registry = ModuleRegistry::new(wiring::build_loader(&config));
    let report = registry.load_all().await;

    let rows = module_rows(&registry.summaries().await);
    let columns = [
        Column::left("Module"),
        Column::left("Source"),
        Column::left("Commands").max_width(60),
    ];
    print!("{}", render_table(&columns, &rows));

    for (module, reason) in &report.failed {
        note_error(&format!("{module}: {reason}"));
    }
    if !report.failed.is_empty() {
        bail!("{} module(s) failed to load", report.failed.len());
    }
    Ok(())
}

fn module_rows(summaries: &[cyborg_core::ModuleSummary]) -> Vec<Vec<String>> {
    summaries
        .iter()
        .map(|m| {
            let commands = if m.commands.is_empty() {
                "(none)".to_string()
            } else {
                m.commands.join(", ")
            };
            vec![m.name.clone(), m.source.clone(), commands]
        })
        .collect()
}

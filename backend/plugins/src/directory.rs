/// Manifest loader: handler bundles as YAML files in the module directory.
///
/// `<dir>/<name>.yaml` (or `.yml`) is the module `name`.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use cyborg_core::{CommandHandler, COLOUR_NEUTRAL};
use tokio::fs;
use tracing::{debug, info};

use crate::actions::{ExecAction, ReplyAction};
use crate::loader::{LoadedSource, ModuleLoader};
use crate::manifest::{ExportEntry, ModuleManifest};
use crate::sdk::ModuleExports;

/// Accepted module file extensions, in lookup order.
pub const MODULE_EXTENSIONS: &[&str] = &["yaml", "yml"];

pub struct ManifestLoader {
    dir: PathBuf,
}

impl ManifestLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Existing source file for `name`, if any.
    async fn source_path(&self, name: &str) -> Option<PathBuf> {
        if !is_valid_module_name(name) {
            return None;
        }
        for ext in MODULE_EXTENSIONS {
            let path = self.dir.join(format!("{name}.{ext}"));
            if fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }
}

/// Module names are plain file stems: no separators, no parent references.
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '.'])
        && !name.chars().any(char::is_whitespace)
}

/// Module name for a directory entry, if it follows the file convention.
fn module_name_of(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !MODULE_EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_valid_module_name(stem).then(|| stem.to_string())
}

fn build_handler(entry: &ExportEntry) -> Result<Arc<dyn CommandHandler>> {
    match (&entry.reply, &entry.exec) {
        (Some(template), None) => Ok(Arc::new(ReplyAction {
            template: template.clone(),
            accepts_args: entry.accepts_args,
            colour: entry.colour.unwrap_or(COLOUR_NEUTRAL),
        })),
        (None, Some(program)) => Ok(Arc::new(ExecAction {
            program: program.clone(),
            base_args: entry.args.clone(),
            accepts_args: entry.accepts_args,
        })),
        _ => bail!("export must define exactly one of `reply` or `exec`"),
    }
}

#[async_trait]
impl ModuleLoader for ManifestLoader {
    fn name(&self) -> &str {
        "manifest"
    }

    async fn source_exists(&self, name: &str) -> bool {
        self.source_path(name).await.is_some()
    }

    async fn discover(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("cannot list {}", self.dir.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(name) = module_name_of(&path) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names.sort();
        debug!(dir = %self.dir.display(), count = names.len(), "Discovered module files");
        Ok(names)
    }

    async fn load(&self, name: &str) -> Result<LoadedSource> {
        if !is_valid_module_name(name) {
            bail!("invalid module name `{}`", name);
        }
        let path = match self.source_path(name).await {
            Some(path) => path,
            None => self.dir.join(format!("{name}.{}", MODULE_EXTENSIONS[0])),
        };

        let raw = fs::read_to_string(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let manifest = ModuleManifest::parse(&raw)
            .with_context(|| format!("invalid manifest {}", path.display()))?;

        let mut exports = ModuleExports::new();
        if let Some(description) = &manifest.description {
            exports = exports.with_description(description.clone());
        }
        for (export_name, entry) in &manifest.exports {
            let handler = build_handler(entry)
                .with_context(|| format!("export `{export_name}`"))?;
            exports = exports.export(export_name.clone(), handler);
        }

        info!(module = %name, path = %path.display(), "Read module manifest");
        Ok(LoadedSource {
            locator: path.display().to_string(),
            exports,
        })
    }
}

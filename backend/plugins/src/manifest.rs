/// Module manifest: the on-disk form of a handler bundle.
///
/// A file `<moduleDirectory>/<name>.yaml` exports named entries; each entry
/// is either a templated `reply` or an `exec` of a host program.
use std::collections::BTreeMap;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// One exported callable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExportEntry {
    /// Whether the operator's arguments are passed through.
    #[serde(default)]
    pub accepts_args: bool,
    /// Reply template; supports `{args}`, `{argN}` and `{sender}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Program to run; its stdout becomes the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<String>,
    /// Fixed arguments for `exec`, placed before the operator's.
    #[serde(default)]
    pub args: Vec<String>,
    /// Embed colour for `reply`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<u32>,
}

/// Full module manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub exports: BTreeMap<String, ExportEntry>,
}

impl ModuleManifest {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        // An empty file is a module with no exports.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let manifest: Self = serde_yaml::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Every entry must pick exactly one action.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, entry) in &self.exports {
            if name.trim().is_empty() {
                bail!("export with an empty name");
            }
            match (&entry.reply, &entry.exec) {
                (Some(_), None) => {
                    if !entry.args.is_empty() {
                        bail!("export `{}`: `args` only applies to `exec`", name);
                    }
                }
                (None, Some(program)) => {
                    if program.trim().is_empty() {
                        bail!("export `{}`: `exec` is empty", name);
                    }
                }
                _ => bail!("export `{}` must define exactly one of `reply` or `exec`", name),
            }
        }
        Ok(())
    }
}

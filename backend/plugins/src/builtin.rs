//! Compiled-in handler bundles.
//!
//! Each bundle is a registration function returning its export table; it is
//! re-run on every load, so a reload yields fresh handler instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::loader::{LoadedSource, ModuleLoader};
use crate::sdk::ModuleExports;

type BundleFn = Arc<dyn Fn() -> ModuleExports + Send + Sync>;

#[derive(Default)]
pub struct StaticLoader {
    bundles: BTreeMap<String, BundleFn>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle<F>(mut self, name: impl Into<String>, register: F) -> Self
    where
        F: Fn() -> ModuleExports + Send + Sync + 'static,
    {
        self.bundles.insert(name.into(), Arc::new(register));
        self
    }
}

#[async_trait]
impl ModuleLoader for StaticLoader {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn source_exists(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }

    async fn discover(&self) -> Result<Vec<String>> {
        Ok(self.bundles.keys().cloned().collect())
    }

    async fn load(&self, name: &str) -> Result<LoadedSource> {
        let Some(register) = self.bundles.get(name) else {
            bail!("no built-in bundle named `{}`", name);
        };
        debug!(module = %name, "Running built-in bundle registration");
        Ok(LoadedSource {
            locator: format!("builtin:{name}"),
            exports: register(),
        })
    }
}

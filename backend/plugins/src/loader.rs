//! Module Loader
//!
//! The seam between the registry and wherever handler bundles come from.

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::sdk::ModuleExports;

/// An executed source unit.
pub struct LoadedSource {
    /// Where the unit came from (a file path, or `builtin:<name>`).
    pub locator: String,
    pub exports: ModuleExports,
}

/// Resolves module names to source units and executes them.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Human-readable loader name for logging.
    fn name(&self) -> &str;

    /// Whether a source unit for `name` currently exists.
    async fn source_exists(&self, name: &str) -> bool;

    /// Names of every module this loader can currently provide.
    async fn discover(&self) -> Result<Vec<String>>;

    /// Execute the source unit for `name` and return its exports.
    async fn load(&self, name: &str) -> Result<LoadedSource>;
}

/// Chains several loaders; the first one that has a source for a name wins.
pub struct CompositeLoader {
    loaders: Vec<Arc<dyn ModuleLoader>>,
}

impl CompositeLoader {
    pub fn new(loaders: Vec<Arc<dyn ModuleLoader>>) -> Self {
        Self { loaders }
    }

    async fn owner(&self, name: &str) -> Option<&Arc<dyn ModuleLoader>> {
        for loader in &self.loaders {
            if loader.source_exists(name).await {
                return Some(loader);
            }
        }
        None
    }
}

#[async_trait]
impl ModuleLoader for CompositeLoader {
    fn name(&self) -> &str {
        "composite"
    }

    async fn source_exists(&self, name: &str) -> bool {
        self.owner(name).await.is_some()
    }

    async fn discover(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        let mut failures = Vec::new();
        for loader in &self.loaders {
            match loader.discover().await {
                Ok(found) => {
                    for name in found {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
                Err(e) => {
                    warn!(loader = %loader.name(), "Skipping loader that cannot list modules: {:#}", e);
                    failures.push(e);
                }
            }
        }
        if failures.len() == self.loaders.len() {
            if let Some(e) = failures.pop() {
                return Err(e);
            }
        }
        Ok(names)
    }

    async fn load(&self, name: &str) -> Result<LoadedSource> {
        let Some(loader) = self.owner(name).await else {
            bail!("no source found for module `{}`", name);
        };
        debug!(module = %name, loader = %loader.name(), "Delegating module load");
        loader.load(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::StaticLoader;
    use crate::sdk::handler;

    fn bundle(tag: &'static str) -> ModuleExports {
        ModuleExports::new()
            .with_description(tag)
            .command("ping", handler(|_, _, _| async { Ok(()) }))
    }

    fn composite() -> CompositeLoader {
        let first = StaticLoader::new()
            .with_bundle("core", || bundle("first"))
            .with_bundle("extra", || bundle("first"));
        let second = StaticLoader::new()
            .with_bundle("core", || bundle("second"))
            .with_bundle("other", || bundle("second"));
        CompositeLoader::new(vec![Arc::new(first), Arc::new(second)])
    }

    #[tokio::test]
    async fn first_loader_shadows_later_ones() {
        let loaded = composite().load("core").await.unwrap();
        assert_eq!(loaded.exports.description.as_deref(), Some("first"));

        let loaded = composite().load("other").await.unwrap();
        assert_eq!(loaded.exports.description.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn discover_is_deduplicated_union() {
        let names = composite().discover().await.unwrap();
        assert_eq!(names, vec!["core", "extra", "other"]);
    }

    #[tokio::test]
    async fn unknown_module_fails() {
        let loader = composite();
        assert!(!loader.source_exists("ghost").await);
        let err = loader.load("ghost").await.err().unwrap();
        assert!(err.to_string().contains("no source found"));
    }

    #[tokio::test]
    async fn discover_skips_failing_member() {
        let dir = tempfile::tempdir().unwrap();
        let missing = crate::directory::ManifestLoader::new(dir.path().join("absent"));
        let builtin = StaticLoader::new().with_bundle("core", || bundle("first"));

        let loader = CompositeLoader::new(vec![Arc::new(builtin), Arc::new(missing)]);
        assert_eq!(loader.discover().await.unwrap(), vec!["core"]);

        let only_missing =
            CompositeLoader::new(vec![Arc::new(crate::directory::ManifestLoader::new(
                dir.path().join("absent"),
            ))]);
        assert!(only_missing.discover().await.is_err());
    }
}

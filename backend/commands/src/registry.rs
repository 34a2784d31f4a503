/// Module registry: the live set of loaded modules.
///
/// All reads and mutations go through one async `RwLock`. Batch operations
/// take the write lock once for the whole batch, so a concurrent lookup sees
/// either the state before the batch or the state after it.
use std::sync::Arc;

use async_trait::async_trait;
use cyborg_core::{BatchReport, CyborgError, ModuleControl, ModuleSummary};
use cyborg_plugins::ModuleLoader;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{error, info, warn};

use crate::types::Module;

#[derive(Clone)]
pub struct ModuleRegistry {
    modules: Arc<RwLock<Vec<Module>>>,
    loader: Arc<dyn ModuleLoader>,
}

impl ModuleRegistry {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            modules: Arc::new(RwLock::new(Vec::new())),
            loader,
        }
    }

    /// Shared read access for lookups.
    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<Module>> {
        self.modules.read().await
    }

    pub async fn len(&self) -> usize {
        self.modules.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.modules.read().await.is_empty()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.modules.read().await.iter().any(|m| m.name == name)
    }

    /// Loaded module names, in load order.
    pub async fn names(&self) -> Vec<String> {
        self.modules.read().await.iter().map(|m| m.name.clone()).collect()
    }

    /// Load one module. Rejects a name that is already loaded.
    pub async fn load(&self, name: &str) -> Result<(), CyborgError> {
        let mut modules = self.modules.write().await;
        self.load_locked(&mut modules, name).await
    }

    /// Load every module the loader can discover. Failures are logged and
    /// collected; the batch always runs to the end.
    pub async fn load_all(&self) -> BatchReport {
        let mut report = BatchReport::default();
        let names = match self.loader.discover().await {
            Ok(names) => names,
            Err(e) => {
                error!(op = "load_all_modules", loader = %self.loader.name(), "failed listing modules: {:#}", e);
                return report;
            }
        };
        if names.is_empty() {
            warn!(op = "load_all_modules", "no modules to load");
            return report;
        }

        let mut modules = self.modules.write().await;
        for name in names {
            match self.load_locked(&mut modules, &name).await {
                Ok(()) => report.loaded.push(name),
                Err(e) => {
                    error!(op = "load_all_modules", module = %name, "{}", e);
                    report.failed.push((name, e.to_string()));
                }
            }
        }
        report
    }

    /// Remove one module, leaving the others untouched.
    pub async fn unload(&self, name: &str) -> Result<(), CyborgError> {
        let mut modules = self.modules.write().await;
        Self::unload_locked(&mut modules, name)
    }

    pub async fn unload_all(&self) {
        let mut modules = self.modules.write().await;
        info!(op = "unload_all_modules", count = modules.len(), "unloading all modules");
        modules.clear();
    }

    /// Unload then load. If the load fails the module stays unloaded; the
    /// previous version is not restored.
    pub async fn reload(&self, name: &str) -> Result<(), CyborgError> {
        let mut modules = self.modules.write().await;
        Self::unload_locked(&mut modules, name)?;
        if !self.loader.source_exists(name).await {
            warn!(op = "reload_module", module = %name, "module source no longer exists");
            return Err(CyborgError::module_load(name, "module stopped existing"));
        }
        self.load_locked(&mut modules, name).await
    }

    /// Reload everything that is loaded now. Modules whose source vanished
    /// are skipped and stay unloaded.
    pub async fn reload_all(&self) -> BatchReport {
        let mut report = BatchReport::default();
        let mut modules = self.modules.write().await;
        let names: Vec<String> = modules.iter().map(|m| m.name.clone()).collect();
        info!(op = "reload_all_modules", count = names.len(), "reloading all modules");
        modules.clear();

        for name in names {
            if !self.loader.source_exists(&name).await {
                warn!(op = "reload_all_modules", module = %name, "ignoring nonexistent module");
                report.skipped.push(name);
                continue;
            }
            match self.load_locked(&mut modules, &name).await {
                Ok(()) => report.loaded.push(name),
                Err(e) => {
                    error!(op = "reload_all_modules", module = %name, "{}", e);
                    report.failed.push((name, e.to_string()));
                }
            }
        }
        report
    }

    pub async fn summaries(&self) -> Vec<ModuleSummary> {
        self.modules.read().await.iter().map(Module::summary).collect()
    }

    async fn load_locked(&self, modules: &mut Vec<Module>, name: &str) -> Result<(), CyborgError> {
        if modules.iter().any(|m| m.name == name) {
            return Err(CyborgError::module_load(name, "module is already loaded"));
        }
        info!(op = "load_module", module = %name, loader = %self.loader.name(), "loading module");

        let loaded = self
            .loader
            .load(name)
            .await
            .map_err(|e| CyborgError::module_load(name, format!("{e:#}")))?;
        let module = Module::from_source(name, loaded);
        info!(
            op = "load_module",
            module = %name,
            source = %module.source,
            commands = ?module.command_names(),
            "loaded module"
        );
        modules.push(module);
        Ok(())
    }

    fn unload_locked(modules: &mut Vec<Module>, name: &str) -> Result<(), CyborgError> {
        let Some(index) = modules.iter().position(|m| m.name == name) else {
            return Err(CyborgError::ModuleNotFound(name.to_string()));
        };
        info!(op = "unload_module", module = %name, "unloading module");
        modules.remove(index);
        Ok(())
    }
}

#[async_trait]
impl ModuleControl for ModuleRegistry {
    async fn modules(&self) -> Vec<ModuleSummary> {
        self.summaries().await
    }

    async fn load(&self, name: &str) -> Result<(), CyborgError> {
        ModuleRegistry::load(self, name).await
    }

    async fn load_all(&self) -> BatchReport {
        ModuleRegistry::load_all(self).await
    }

    async fn unload(&self, name: &str) -> Result<(), CyborgError> {
        ModuleRegistry::unload(self, name).await
    }

    async fn unload_all(&self) {
        ModuleRegistry::unload_all(self).await
    }

    async fn reload(&self, name: &str) -> Result<(), CyborgError> {
        ModuleRegistry::reload(self, name).await
    }

    async fn reload_all(&self) -> BatchReport {
        ModuleRegistry::reload_all(self).await
    }
}

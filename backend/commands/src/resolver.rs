/// Command resolution: find the handler a parsed command names.
use std::sync::Arc;

use cyborg_core::{Command, CommandHandler, CyborgError};

use crate::registry::ModuleRegistry;
use crate::types::Module;

/// Look `cmd` up in `modules`. The first module with a matching name wins.
pub fn resolve(cmd: &Command, modules: &[Module]) -> Result<Arc<dyn CommandHandler>, CyborgError> {
    let module = modules
        .iter()
        .find(|m| m.name == cmd.module)
        .ok_or_else(|| CyborgError::ModuleNotFound(cmd.module.clone()))?;

    module
        .lookup_command(&cmd.command)
        .cloned()
        .ok_or_else(|| CyborgError::CommandNotFound {
            module: cmd.module.clone(),
            command: cmd.command.clone(),
        })
}

/// Resolve against the live registry. The read lock is released before the
/// handler is returned, so the handler may itself change the registry.
pub async fn resolve_in(
    cmd: &Command,
    registry: &ModuleRegistry,
) -> Result<Arc<dyn CommandHandler>, CyborgError> {
    let modules = registry.read().await;
    resolve(cmd, &modules)
}

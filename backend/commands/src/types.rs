/// Loaded-module types.
use std::collections::BTreeMap;
use std::sync::Arc;

use cyborg_core::{CommandHandler, ModuleSummary};
use cyborg_plugins::LoadedSource;

/// A loaded module: a named table of command handlers.
#[derive(Clone)]
pub struct Module {
    pub name: String,
    /// Where the module's source unit came from.
    pub source: String,
    pub description: Option<String>,
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl Module {
    /// Build a module from an executed source unit, keeping only its
    /// `cmd_`-prefixed exports.
    pub fn from_source(name: impl Into<String>, loaded: LoadedSource) -> Self {
        let description = loaded.exports.description.clone();
        let handlers = loaded.exports.into_commands().into_iter().collect();
        Self {
            name: name.into(),
            source: loaded.locator,
            description,
            handlers,
        }
    }

    pub fn lookup_command(&self, command: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(command)
    }

    pub fn command_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            name: self.name.clone(),
            source: self.source.clone(),
            commands: self.command_names(),
        }
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("commands", &self.command_names())
            .finish()
    }
}

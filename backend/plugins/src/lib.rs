pub mod actions;
pub mod builtin;
pub mod directory;
pub mod loader;
pub mod manifest;
pub mod sdk;

pub use actions::{ExecAction, ReplyAction};
pub use builtin::StaticLoader;
pub use directory::{is_valid_module_name, ManifestLoader, MODULE_EXTENSIONS};
pub use loader::{CompositeLoader, LoadedSource, ModuleLoader};
pub use manifest::{ExportEntry, ModuleManifest};
pub use sdk::{handler, variadic, FnHandler, ModuleExports, COMMAND_PREFIX};

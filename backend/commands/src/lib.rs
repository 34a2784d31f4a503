pub mod dispatch;
pub mod handlers;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod types;

#[cfg(test)]
mod testing;

pub use dispatch::Dispatcher;
pub use handlers::{core_bundle, ALL_MODULES};
pub use parser::{parse, split, LexError};
pub use registry::ModuleRegistry;
pub use resolver::{resolve, resolve_in};
pub use router::{Router, RouterConfig, DEFAULT_COMMAND_PREFIX, DEFAULT_LOG_PREFIX};
pub use types::Module;

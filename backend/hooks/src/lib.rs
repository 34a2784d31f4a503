pub mod builtin;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use builtin::LoggingHook;
pub use pipeline::HookPipeline;
pub use registry::{CommandHooks, HookRegistry};
pub use types::RunOutcome;

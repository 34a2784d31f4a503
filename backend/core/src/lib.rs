pub mod channel;
pub mod context;
pub mod error;
pub mod message;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod traits;
pub mod types;

pub use channel::EventBus;
pub use context::Context;
pub use error::CyborgError;
pub use message::{Command, InboundMessage, TransportEvent};
pub use traits::{CommandHandler, ModuleControl, Transport};
pub use types::{
    AgentInfo, BatchReport, ModuleSummary, ReplyPayload, COLOUR_ERROR, COLOUR_NEUTRAL, COLOUR_OK,
};

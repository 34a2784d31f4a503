use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::context::Context;
use crate::error::CyborgError;
use crate::message::{InboundMessage, TransportEvent};
use crate::types::{BatchReport, ModuleSummary, ReplyPayload};

/// A single command implementation exported by a module.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Whether the handler takes the positional argument list.
    ///
    /// Handlers that return `false` are always called with an empty slice,
    /// whatever the operator typed after the command name.
    fn accepts_args(&self) -> bool;

    /// Run the command. Errors are reported back to the operator.
    async fn call(&self, ctx: &Context, msg: &InboundMessage, args: &[String]) -> Result<()>;
}

/// A chat transport the router listens on and replies through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable transport name for logging.
    fn name(&self) -> &str;

    /// Connect and forward events until the connection ends.
    async fn start(&self, events: mpsc::Sender<TransportEvent>) -> Result<()>;

    /// Deliver a reply to a channel.
    async fn send_reply(&self, channel_id: &str, reply: ReplyPayload) -> Result<()>;
}

/// Lifecycle and introspection surface of the module registry, as exposed to
/// handlers through [`Context`].
#[async_trait]
pub trait ModuleControl: Send + Sync {
    async fn modules(&self) -> Vec<ModuleSummary>;
    async fn load(&self, name: &str) -> Result<(), CyborgError>;
    async fn load_all(&self) -> BatchReport;
    async fn unload(&self, name: &str) -> Result<(), CyborgError>;
    async fn unload_all(&self);
    async fn reload(&self, name: &str) -> Result<(), CyborgError>;
    async fn reload_all(&self) -> BatchReport;
}

/// Router: the composition root.
///
/// Owns the registry, the dispatcher, and the hook pipeline. Consumes
/// transport events one at a time: filter → parse → pre_run → resolve →
/// invoke → post_run.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context as _, Result};
use cyborg_core::{
    AgentInfo, BatchReport, Command, Context, CyborgError, EventBus, InboundMessage, ReplyPayload,
    Transport, TransportEvent, COLOUR_ERROR,
};
use cyborg_hooks::{HookPipeline, RunOutcome};
use cyborg_plugins::ModuleLoader;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::dispatch::Dispatcher;
use crate::parser::parse;
use crate::registry::ModuleRegistry;
use crate::resolver::resolve_in;

pub const DEFAULT_COMMAND_PREFIX: &str = "//";
pub const DEFAULT_LOG_PREFIX: &str = "Medjed.Cyborg";

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub command_prefix: String,
    /// The only sender whose messages are treated as commands.
    pub authorized_sender_id: u64,
    pub handler_timeout: Option<Duration>,
    pub log_prefix: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            authorized_sender_id: 0,
            handler_timeout: Some(Duration::from_secs(30)),
            log_prefix: DEFAULT_LOG_PREFIX.to_string(),
        }
    }
}

pub struct Router {
    config: RouterConfig,
    registry: ModuleRegistry,
    transport: Arc<dyn Transport>,
    hooks: HookPipeline,
    dispatcher: Dispatcher,
    ctx: Context,
}

impl Router {
    pub fn new(
        mut config: RouterConfig,
        loader: Arc<dyn ModuleLoader>,
        transport: Arc<dyn Transport>,
        hooks: HookPipeline,
        agent: AgentInfo,
    ) -> Self {
        if config.command_prefix.is_empty() {
            config.command_prefix = DEFAULT_COMMAND_PREFIX.to_string();
        }
        if config.log_prefix.is_empty() {
            config.log_prefix = DEFAULT_LOG_PREFIX.to_string();
        }
        let registry = ModuleRegistry::new(loader);
        let dispatcher = match config.handler_timeout {
            Some(limit) => Dispatcher::with_timeout(limit),
            None => Dispatcher::new(),
        };
        let ctx = Context::new(transport.clone(), Arc::new(registry.clone()), agent);
        Self {
            config,
            registry,
            transport,
            hooks,
            dispatcher,
            ctx,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookPipeline {
        &self.hooks
    }

    // -----------------------------------------------------------------------
    // Host operations
    // -----------------------------------------------------------------------

    pub async fn load_module(&self, name: &str) -> Result<(), CyborgError> {
        self.registry.load(name).await
    }

    pub async fn load_all_modules(&self) -> BatchReport {
        self.registry.load_all().await
    }

    pub async fn unload_module(&self, name: &str) -> Result<(), CyborgError> {
        self.registry.unload(name).await
    }

    pub async fn unload_all_modules(&self) {
        self.registry.unload_all().await
    }

    pub async fn reload_module(&self, name: &str) -> Result<(), CyborgError> {
        self.registry.reload(name).await
    }

    pub async fn reload_all_modules(&self) -> BatchReport {
        self.registry.reload_all().await
    }

    /// A styled reply stamped with the agent footer.
    pub fn build_reply(&self, text: impl Into<String>, colour: u32) -> ReplyPayload {
        self.ctx.build_reply(text, colour)
    }

    /// Start the transport and process its events until the stream closes.
    /// A transport failure is returned to the caller.
    pub async fn connect(&self) -> Result<()> {
        let mut bus = EventBus::new();
        let mut events = bus
            .take_events_rx()
            .ok_or_else(|| anyhow!("event receiver already taken"))?;
        let events_tx = bus.events_tx.clone();
        drop(bus);

        let transport = self.transport.clone();
        info!(prefix = %self.config.log_prefix, transport = %transport.name(), "connecting");
        let transport_task = tokio::spawn(async move { transport.start(events_tx).await });

        let span = info_span!("router", prefix = %self.config.log_prefix);
        async {
            while let Some(event) = events.recv().await {
                self.handle_event(event).await;
            }
        }
        .instrument(span)
        .await;

        transport_task
            .await
            .context("transport task panicked")?
            .with_context(|| format!("transport `{}` failed", self.transport.name()))
    }

    pub async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Ready { user } => {
                info!(user = %user, "logged in");
                self.hooks.ready(&user).await;
            }
            TransportEvent::Message(msg) => {
                self.handle_message(&msg).await;
            }
        }
    }

    /// Process one inbound message. Returns the dispatch outcome, or `None`
    /// when the message was ignored or failed to parse.
    pub async fn handle_message(&self, msg: &InboundMessage) -> Option<RunOutcome> {
        if msg.sender_id != self.config.authorized_sender_id {
            return None;
        }
        let text = msg.content.strip_prefix(self.config.command_prefix.as_str())?;

        let cmd = match parse(text) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!(raw = %text, kind = e.kind(), "invalid command: {}", e);
                self.reply_error(msg, format!("invalid command ({e})")).await;
                return None;
            }
        };

        self.hooks.pre_run(&cmd).await;
        let outcome = self.run(&cmd, msg).await;
        self.hooks.post_run(&cmd, &outcome).await;
        Some(outcome)
    }

    async fn run(&self, cmd: &Command, msg: &InboundMessage) -> RunOutcome {
        let handler = match resolve_in(cmd, &self.registry).await {
            Ok(handler) => handler,
            Err(e) => {
                warn!(command = %cmd.path(), kind = e.kind(), "{}", e);
                self.reply_error(msg, e.to_string()).await;
                return match e {
                    CyborgError::CommandNotFound { .. } => RunOutcome::CommandNotFound,
                    _ => RunOutcome::ModuleNotFound,
                };
            }
        };
        debug!(command = %cmd.path(), accepts_args = handler.accepts_args(), "dispatching");
        self.dispatcher.invoke(handler, &self.ctx, msg, cmd).await
    }

    async fn reply_error(&self, msg: &InboundMessage, text: String) {
        if let Err(e) = self.ctx.reply(msg, text, COLOUR_ERROR).await {
            error!(channel = %msg.channel_id, "failed sending reply: {:#}", e);
        }
    }
}

//! Plugin SDK
//!
//! The boundary a handler bundle implements: a table of exported callables.
//! Only exports named with [`COMMAND_PREFIX`] become commands; the rest are
//! carried along but never routed to.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use cyborg_core::{CommandHandler, Context, InboundMessage};

/// Reserved prefix marking an export as a routable command.
pub const COMMAND_PREFIX: &str = "cmd_";

/// Everything a loaded source unit exports.
#[derive(Clone, Default)]
pub struct ModuleExports {
    pub description: Option<String>,
    callables: Vec<(String, Arc<dyn CommandHandler>)>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Export a callable under its raw name.
    pub fn export(mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.callables.push((name.into(), handler));
        self
    }

    /// Export `handler` as the command `name` (stored as `cmd_<name>`).
    pub fn command(self, name: &str, handler: Arc<dyn CommandHandler>) -> Self {
        self.export(format!("{COMMAND_PREFIX}{name}"), handler)
    }

    pub fn callables(&self) -> impl Iterator<Item = (&str, &Arc<dyn CommandHandler>)> {
        self.callables.iter().map(|(name, h)| (name.as_str(), h))
    }

    /// The routable commands: `cmd_`-prefixed exports with the prefix removed.
    /// A later export with the same name replaces an earlier one.
    pub fn into_commands(self) -> Vec<(String, Arc<dyn CommandHandler>)> {
        let mut out: Vec<(String, Arc<dyn CommandHandler>)> = Vec::new();
        for (name, handler) in self.callables {
            let Some(command) = name.strip_prefix(COMMAND_PREFIX) else {
                continue;
            };
            if command.is_empty() {
                continue;
            }
            out.retain(|(existing, _)| existing != command);
            out.push((command.to_string(), handler));
        }
        out
    }
}

/// Adapts an async closure into a [`CommandHandler`].
pub struct FnHandler<F> {
    accepts_args: bool,
    func: F,
}

/// A handler that ignores arguments: `(context, message)`.
pub fn handler<F, Fut>(func: F) -> Arc<dyn CommandHandler>
where
    F: Fn(Context, InboundMessage, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnHandler {
        accepts_args: false,
        func,
    })
}

/// A handler that receives the argument list: `(context, message, args...)`.
pub fn variadic<F, Fut>(func: F) -> Arc<dyn CommandHandler>
where
    F: Fn(Context, InboundMessage, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnHandler {
        accepts_args: true,
        func,
    })
}

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(Context, InboundMessage, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn accepts_args(&self) -> bool {
        self.accepts_args
    }

    async fn call(&self, ctx: &Context, msg: &InboundMessage, args: &[String]) -> Result<()> {
        (self.func)(ctx.clone(), msg.clone(), args.to_vec()).await
    }
}

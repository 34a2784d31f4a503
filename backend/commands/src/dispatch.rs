/// Command dispatch: invoke a resolved handler under the calling convention.
///
/// Handlers that accept arguments get the parsed args; all others get an
/// empty slice. Each call runs on its own task so a panicking or hanging
/// handler is reported as a failure instead of taking the router down.
use std::sync::Arc;
use std::time::Duration;

use cyborg_core::{Command, CommandHandler, Context, InboundMessage, COLOUR_ERROR};
use cyborg_hooks::RunOutcome;
use tracing::{error, warn};

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Args exactly as the handler will see them.
    pub fn call_args<'a>(handler: &dyn CommandHandler, cmd: &'a Command) -> &'a [String] {
        if handler.accepts_args() {
            &cmd.args
        } else {
            &[]
        }
    }

    /// Run `handler` for `cmd`. A failure is replied to the sender in the
    /// error colour and returned as [`RunOutcome::Failed`].
    pub async fn invoke(
        &self,
        handler: Arc<dyn CommandHandler>,
        ctx: &Context,
        msg: &InboundMessage,
        cmd: &Command,
    ) -> RunOutcome {
        let args = Self::call_args(handler.as_ref(), cmd).to_vec();
        let task = {
            let ctx = ctx.clone();
            let msg = msg.clone();
            tokio::spawn(async move { handler.call(&ctx, &msg, &args).await })
        };
        let abort = task.abort_handle();

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    abort.abort();
                    warn!(op = "dispatch", command = %cmd.path(), timeout = ?limit, "handler timed out");
                    return self
                        .report_failure(ctx, msg, cmd, format!("timed out after {limit:?}"))
                        .await;
                }
            },
            None => task.await,
        };

        let message = match joined {
            Ok(Ok(())) => return RunOutcome::Completed,
            Ok(Err(e)) => format!("{e:#}"),
            Err(e) if e.is_panic() => "handler panicked".to_string(),
            Err(e) => e.to_string(),
        };
        self.report_failure(ctx, msg, cmd, message).await
    }

    async fn report_failure(
        &self,
        ctx: &Context,
        msg: &InboundMessage,
        cmd: &Command,
        message: String,
    ) -> RunOutcome {
        let err = cyborg_core::CyborgError::HandlerExecution {
            module: cmd.module.clone(),
            command: cmd.command.clone(),
            message,
        };
        error!(op = "dispatch", command = %cmd.path(), kind = err.kind(), "{}", err);
        if let Err(e) = ctx.reply(msg, err.to_string(), COLOUR_ERROR).await {
            error!(op = "dispatch", command = %cmd.path(), "failed sending error reply: {:#}", e);
        }
        RunOutcome::Failed {
            error: err.to_string(),
        }
    }
}

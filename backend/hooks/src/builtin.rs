/// Built-in hook implementations.
use anyhow::Result;
use async_trait::async_trait;
use cyborg_core::Command;
use logging::redact_sensitive_data;
use tracing::{info, warn};

use crate::registry::CommandHooks;
use crate::types::RunOutcome;

// ---------------------------------------------------------------------------
// Logging hook: logs every lifecycle event
// ---------------------------------------------------------------------------

pub struct LoggingHook {
    pub prefix: String,
}

impl LoggingHook {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

#[async_trait]
impl CommandHooks for LoggingHook {
    fn name(&self) -> &str {
        "logging_hook"
    }

    async fn handle_ready(&self, user: &str) -> Result<()> {
        info!(prefix = %self.prefix, user = %user, "connected");
        Ok(())
    }

    async fn pre_run(&self, cmd: &Command) -> Result<()> {
        info!(
            prefix = %self.prefix,
            command = %cmd.path(),
            raw = %redact_sensitive_data(&cmd.raw),
            "running command"
        );
        Ok(())
    }

    async fn post_run(&self, cmd: &Command, outcome: &RunOutcome) -> Result<()> {
        match outcome {
            RunOutcome::Completed => {
                info!(prefix = %self.prefix, command = %cmd.path(), "completed")
            }
            other => {
                warn!(prefix = %self.prefix, command = %cmd.path(), outcome = ?other, "did not complete")
            }
        }
        Ok(())
    }
}

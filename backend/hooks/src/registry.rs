/// Hook trait and registry.
///
/// Hooks observe the router lifecycle: transport ready, before resolution of a
/// parsed command, and after every dispatch attempt.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use cyborg_core::Command;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::RunOutcome;

// ---------------------------------------------------------------------------
// Hook trait
// ---------------------------------------------------------------------------

/// Router extension point. Every method has a default no-op body, so an
/// implementation overrides only what it cares about.
#[async_trait]
pub trait CommandHooks: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// The transport finished connecting.
    async fn handle_ready(&self, user: &str) -> Result<()> {
        debug!(hook = %self.name(), user = %user, "handle_ready");
        Ok(())
    }

    /// A command parsed successfully and is about to be resolved.
    async fn pre_run(&self, cmd: &Command) -> Result<()> {
        debug!(hook = %self.name(), command = %cmd.path(), "pre_run");
        Ok(())
    }

    /// A dispatch attempt ended, whatever the outcome.
    async fn post_run(&self, cmd: &Command, outcome: &RunOutcome) -> Result<()> {
        debug!(hook = %self.name(), command = %cmd.path(), ?outcome, "post_run");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type HookBox = Arc<dyn CommandHooks>;

/// Thread-safe, ordered list of hooks.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: Arc<RwLock<Vec<HookBox>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, hook: Arc<dyn CommandHooks>) {
        self.hooks.write().await.push(hook);
    }

    pub async fn len(&self) -> usize {
        self.hooks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hooks.read().await.is_empty()
    }

    /// Snapshot so hooks run without holding the lock.
    pub(crate) async fn snapshot(&self) -> Vec<HookBox> {
        self.hooks.read().await.clone()
    }
}


/// Hook pipeline executor.
///
/// The pipeline is the surface the router fires hooks through:
/// 1. Transport ready → `pipeline.ready(...)`
/// 2. Command parsed → `pipeline.pre_run(...)`
/// 3. Dispatch attempt finished (any outcome) → `pipeline.post_run(...)`
///
/// Hooks run sequentially in registration order. A hook error is logged and
/// never stops the chain or the dispatch.
use cyborg_core::Command;
use tracing::{debug, warn};

use crate::registry::HookRegistry;
use crate::types::RunOutcome;

#[derive(Clone, Default)]
pub struct HookPipeline {
    pub registry: HookRegistry,
}

impl HookPipeline {
    pub fn new(registry: HookRegistry) -> Self {
        Self { registry }
    }

    pub async fn ready(&self, user: &str) {
        debug!("[Pipeline] ready user={}", user);
        for hook in self.registry.snapshot().await {
            if let Err(e) = hook.handle_ready(user).await {
                warn!("[Hooks] {} handle_ready returned error: {}", hook.name(), e);
            }
        }
    }

    pub async fn pre_run(&self, cmd: &Command) {
        debug!("[Pipeline] pre_run command={}", cmd.path());
        for hook in self.registry.snapshot().await {
            if let Err(e) = hook.pre_run(cmd).await {
                warn!("[Hooks] {} pre_run returned error: {}", hook.name(), e);
            }
        }
    }

    pub async fn post_run(&self, cmd: &Command, outcome: &RunOutcome) {
        debug!("[Pipeline] post_run command={} outcome={:?}", cmd.path(), outcome);
        for hook in self.registry.snapshot().await {
            if let Err(e) = hook.post_run(cmd, outcome).await {
                warn!("[Hooks] {} post_run returned error: {}", hook.name(), e);
            }
        }
    }
}

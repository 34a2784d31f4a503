use std::sync::Arc;

use anyhow::Result;

use crate::message::InboundMessage;
use crate::traits::{ModuleControl, Transport};
use crate::types::{AgentInfo, ReplyPayload};

/// Handle passed to every handler invocation.
///
/// Cheap to clone; all clones share the same transport and registry.
#[derive(Clone)]
pub struct Context {
    transport: Arc<dyn Transport>,
    modules: Arc<dyn ModuleControl>,
    agent: AgentInfo,
}

impl Context {
    pub fn new(
        transport: Arc<dyn Transport>,
        modules: Arc<dyn ModuleControl>,
        agent: AgentInfo,
    ) -> Self {
        Self {
            transport,
            modules,
            agent,
        }
    }

    pub fn agent(&self) -> &AgentInfo {
        &self.agent
    }

    /// Registry lifecycle and introspection.
    pub fn modules(&self) -> &dyn ModuleControl {
        self.modules.as_ref()
    }

    pub fn build_reply(&self, text: impl Into<String>, colour: u32) -> ReplyPayload {
        self.agent.build_reply(text, colour)
    }

    /// Reply in the channel `msg` came from.
    pub async fn reply(&self, msg: &InboundMessage, text: impl Into<String>, colour: u32) -> Result<()> {
        let payload = self.build_reply(text, colour);
        self.transport.send_reply(&msg.channel_id, payload).await
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("transport", &self.transport.name())
            .field("agent", &self.agent)
            .finish()
    }
}

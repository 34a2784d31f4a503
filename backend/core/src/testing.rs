//! In-memory transport for tests in this workspace.
//!
//! Compiled for this crate's tests, and for other crates through the
//! `test-util` feature.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::message::TransportEvent;
use crate::traits::Transport;
use crate::types::ReplyPayload;

/// Records every reply instead of sending it. `start` replays `script` and
/// returns, which closes the event stream.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(String, ReplyPayload)>>,
    pub script: Mutex<Vec<TransportEvent>>,
}

impl RecordingTransport {
    /// Reply texts in send order.
    pub async fn replies(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(_, r)| r.description.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start(&self, events: mpsc::Sender<TransportEvent>) -> Result<()> {
        let script = std::mem::take(&mut *self.script.lock().await);
        for event in script {
            events.send(event).await?;
        }
        Ok(())
    }

    async fn send_reply(&self, channel_id: &str, reply: ReplyPayload) -> Result<()> {
        self.sent.lock().await.push((channel_id.to_string(), reply));
        Ok(())
    }
}

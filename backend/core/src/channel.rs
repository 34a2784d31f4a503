use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::message::TransportEvent;

/// Default buffer size for the transport → router event channel.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// Channel carrying transport events to the router.
///
/// Bounded; a full buffer back-pressures the transport.
pub struct EventBus {
    pub events_tx: mpsc::Sender<TransportEvent>,
    events_rx: Option<mpsc::Receiver<TransportEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer: usize) -> Self {
        let (events_tx, events_rx) = mpsc::channel(buffer);
        info!(buffer_size = buffer, "EventBus initialized");
        Self {
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Take the receiving end (can only be called once).
    pub fn take_events_rx(&mut self) -> Option<mpsc::Receiver<TransportEvent>> {
        debug!("Event receiver taken");
        self.events_rx.take()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

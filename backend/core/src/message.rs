use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events delivered by a transport to the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportEvent {
    /// The transport finished connecting.
    Ready { user: String },
    /// A chat message was received.
    Message(InboundMessage),
}

/// A chat message as seen by the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Transport-specific message id.
    pub id: String,
    /// Where replies to this message should go.
    pub channel_id: String,
    pub sender_id: u64,
    pub sender_name: String,
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        sender_id: u64,
        sender_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            sender_id,
            sender_name: sender_name.into(),
            content: content.into(),
            received_at: Utc::now(),
        }
    }
}

/// A parsed operator command: `<module>.<command> [args...]`.
///
/// `module` and `command` are never empty and `args` is empty rather than
/// absent when no arguments were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub module: String,
    pub command: String,
    pub args: Vec<String>,
    /// The command text as received, without the prefix.
    pub raw: String,
}

impl Command {
    /// `module.command`, as shown in replies and logs.
    pub fn path(&self) -> String {
        format!("{}.{}", self.module, self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = TransportEvent::Message(InboundMessage::new("1", "chan", 42, "op", "//a.b"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"message\""));
        let back: TransportEvent = serde_json::from_str(&json).unwrap();
        match back {
            TransportEvent::Message(msg) => {
                assert_eq!(msg.sender_id, 42);
                assert_eq!(msg.content, "//a.b");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_command_path() {
        let cmd = Command {
            module: "sys".into(),
            command: "disk.usage".into(),
            args: vec![],
            raw: "sys.disk.usage".into(),
        };
        assert_eq!(cmd.path(), "sys.disk.usage");
    }
}

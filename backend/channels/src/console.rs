//! Console transport: operator commands on stdin, replies on stdout.
//!
//! Every input line is a message from the configured operator on the
//! `console` channel, so the router's sender filter always passes.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use cyborg_core::{InboundMessage, ReplyPayload, Transport, TransportEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

pub const CONSOLE_CHANNEL: &str = "console";
const CONSOLE_USER: &str = "console";

type Input = Box<dyn AsyncBufRead + Send + Unpin>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

pub struct ConsoleTransport {
    operator_id: u64,
    input: Mutex<Option<Input>>,
    output: Mutex<Output>,
}

impl ConsoleTransport {
    pub fn new(operator_id: u64, input: Input, output: Output) -> Self {
        Self {
            operator_id,
            input: Mutex::new(Some(input)),
            output: Mutex::new(output),
        }
    }

    pub fn stdio(operator_id: u64) -> Self {
        Self::new(
            operator_id,
            Box::new(BufReader::new(tokio::io::stdin())),
            Box::new(tokio::io::stdout()),
        )
    }
}

/// How a reply is printed: `[footer] description`, one line per reply line.
pub fn format_reply(reply: &ReplyPayload) -> String {
    let mut out = String::new();
    for line in reply.description.lines() {
        out.push_str(&format!("[{}] {}\n", reply.footer, line));
    }
    if out.is_empty() {
        out.push_str(&format!("[{}]\n", reply.footer));
    }
    out
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    async fn start(&self, events: mpsc::Sender<TransportEvent>) -> Result<()> {
        let mut input = self
            .input
            .lock()
            .await
            .take()
            .context("console transport already started")?;
        info!("Console transport ready; reading commands from stdin");
        events
            .send(TransportEvent::Ready {
                user: CONSOLE_USER.to_string(),
            })
            .await
            .context("router stopped")?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = input
                .read_line(&mut line)
                .await
                .context("Failed to read from console")?;
            if read == 0 {
                debug!("Console input closed");
                return Ok(());
            }
            let content = line.trim_end_matches(['\r', '\n']);
            if content.trim().is_empty() {
                continue;
            }
            let msg = InboundMessage::new(
                Uuid::new_v4().to_string(),
                CONSOLE_CHANNEL,
                self.operator_id,
                CONSOLE_USER,
                content,
            );
            events
                .send(TransportEvent::Message(msg))
                .await
                .context("router stopped")?;
        }
    }

    async fn send_reply(&self, _channel_id: &str, reply: ReplyPayload) -> Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(format_reply(&reply).as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyborg_core::AgentInfo;

    fn transport(input: &'static str) -> ConsoleTransport {
        ConsoleTransport::new(7, Box::new(input.as_bytes()), Box::new(tokio::io::sink()))
    }

    #[tokio::test]
    async fn lines_become_operator_messages() {
        let console = transport("//greet.hello\n\n   \n//sys.df /var\r\n");
        let (tx, mut rx) = mpsc::channel(8);
        console.start(tx).await.unwrap();

        assert!(matches!(rx.recv().await, Some(TransportEvent::Ready { .. })));
        let mut contents = Vec::new();
        while let Some(TransportEvent::Message(msg)) = rx.recv().await {
            assert_eq!(msg.sender_id, 7);
            assert_eq!(msg.channel_id, CONSOLE_CHANNEL);
            contents.push(msg.content);
        }
        assert_eq!(contents, vec!["//greet.hello", "//sys.df /var"]);
    }

    #[tokio::test]
    async fn starts_only_once() {
        let console = transport("");
        let (tx, _rx) = mpsc::channel(8);
        console.start(tx.clone()).await.unwrap();
        assert!(console.start(tx).await.is_err());
    }

    #[tokio::test]
    async fn send_reply_writes() {
        let console = transport("");
        let reply = AgentInfo::default().build_reply("pong", 0);
        console.send_reply(CONSOLE_CHANNEL, reply).await.unwrap();
    }

    #[test]
    fn formats_multiline_reply() {
        let agent = AgentInfo {
            name: "Medjed.Cyborg".into(),
            version: "v1".into(),
        };
        let text = format_reply(&agent.build_reply("a\nb", 0));
        assert_eq!(text, "[Medjed.Cyborg v1] a\n[Medjed.Cyborg v1] b\n");
        assert_eq!(format_reply(&agent.build_reply("", 0)), "[Medjed.Cyborg v1]\n");
    }
}
